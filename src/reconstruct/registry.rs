//! Primary label → handler.

use std::sync::LazyLock;

use hashbrown::HashMap;

use super::handlers;
use super::mapper::NodeMapper;
use crate::model::{Node, NodeLabel};
use crate::owl::OwlObject;

/// Rebuilds the object for one node.
pub type Handler = fn(&mut NodeMapper<'_>, &Node) -> crate::Result<OwlObject>;

/// Handlers keyed on primary label.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<NodeLabel, Handler>,
}

static STANDARD: LazyLock<HandlerRegistry> = LazyLock::new(HandlerRegistry::new);

impl HandlerRegistry {
    /// Registry covering every OWL construct.
    pub fn new() -> Self {
        use NodeLabel::*;
        let mut registry = Self::empty();

        registry.register(Iri, handlers::iri);
        for label in [Class, Datatype, ObjectProperty, DataProperty, AnnotationProperty, NamedIndividual] {
            registry.register(label, handlers::entity);
        }
        registry.register(AnonymousIndividual, handlers::anonymous_individual);
        registry.register(Literal, handlers::literal);
        registry.register(LanguageTag, handlers::language_tag);
        registry.register(ObjectInverseOf, handlers::object_inverse_of);
        registry.register(FacetRestriction, handlers::facet_restriction);
        registry.register(Annotation, handlers::annotation);

        for label in NodeLabel::ALL.iter().copied() {
            if label.is_entity() {
                continue;
            }
            if label.categories().contains(&ClassExpression) {
                registry.register(label, handlers::class_expression);
            } else if label.categories().contains(&DataRange) {
                registry.register(label, handlers::data_range);
            } else if label.is_axiom() {
                registry.register(label, handlers::axiom);
            }
        }
        registry
    }

    pub fn empty() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Shared instance of [`HandlerRegistry::new`].
    pub fn standard() -> &'static HandlerRegistry {
        &STANDARD
    }

    pub fn register(&mut self, label: NodeLabel, handler: Handler) -> Option<Handler> {
        self.handlers.insert(label, handler)
    }

    pub fn get(&self, label: NodeLabel) -> Option<Handler> {
        self.handlers.get(&label).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
