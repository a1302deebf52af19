//! Entities and individuals.

use serde::{Deserialize, Serialize};

use super::Iri;

/// The six OWL2 entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Class,
    Datatype,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Class => "Class",
            EntityType::Datatype => "Datatype",
            EntityType::ObjectProperty => "ObjectProperty",
            EntityType::DataProperty => "DataProperty",
            EntityType::AnnotationProperty => "AnnotationProperty",
            EntityType::NamedIndividual => "NamedIndividual",
        }
    }
}

macro_rules! entity_newtype {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            pub struct $name(pub Iri);

            impl $name {
                pub fn new(iri: impl Into<Iri>) -> Self {
                    $name(iri.into())
                }

                pub fn iri(&self) -> &Iri {
                    &self.0
                }
            }

            impl From<$name> for Entity {
                fn from(e: $name) -> Self {
                    Entity::$name(e)
                }
            }
        )+
    };
}

entity_newtype! {
    /// Named class.
    Class,
    /// Named datatype.
    Datatype,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
}

/// An IRI-identified entity of one of the six kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Entity {
    Class(Class),
    Datatype(Datatype),
    ObjectProperty(ObjectProperty),
    DataProperty(DataProperty),
    AnnotationProperty(AnnotationProperty),
    NamedIndividual(NamedIndividual),
}

impl Entity {
    pub fn new(entity_type: EntityType, iri: impl Into<Iri>) -> Self {
        let iri = iri.into();
        match entity_type {
            EntityType::Class => Entity::Class(Class(iri)),
            EntityType::Datatype => Entity::Datatype(Datatype(iri)),
            EntityType::ObjectProperty => Entity::ObjectProperty(ObjectProperty(iri)),
            EntityType::DataProperty => Entity::DataProperty(DataProperty(iri)),
            EntityType::AnnotationProperty => Entity::AnnotationProperty(AnnotationProperty(iri)),
            EntityType::NamedIndividual => Entity::NamedIndividual(NamedIndividual(iri)),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Entity::Class(_) => EntityType::Class,
            Entity::Datatype(_) => EntityType::Datatype,
            Entity::ObjectProperty(_) => EntityType::ObjectProperty,
            Entity::DataProperty(_) => EntityType::DataProperty,
            Entity::AnnotationProperty(_) => EntityType::AnnotationProperty,
            Entity::NamedIndividual(_) => EntityType::NamedIndividual,
        }
    }

    pub fn iri(&self) -> &Iri {
        match self {
            Entity::Class(e) => &e.0,
            Entity::Datatype(e) => &e.0,
            Entity::ObjectProperty(e) => &e.0,
            Entity::DataProperty(e) => &e.0,
            Entity::AnnotationProperty(e) => &e.0,
            Entity::NamedIndividual(e) => &e.0,
        }
    }
}

/// Blank-node individual, identified by its node id within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnonymousIndividual(pub String);

impl AnonymousIndividual {
    pub fn new(node_id: impl Into<String>) -> Self {
        AnonymousIndividual(node_id.into())
    }

    pub fn node_id(&self) -> &str {
        &self.0
    }
}

/// Named or anonymous individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Individual {
    Named(NamedIndividual),
    Anonymous(AnonymousIndividual),
}

impl From<NamedIndividual> for Individual {
    fn from(i: NamedIndividual) -> Self { Individual::Named(i) }
}

impl From<AnonymousIndividual> for Individual {
    fn from(i: AnonymousIndividual) -> Self { Individual::Anonymous(i) }
}
