//! IRIs, entities, individuals and literals.

use crate::identity::canonical;
use crate::model::{EdgeLabel, NodeLabel};
use crate::owl::{
    vocab, AnonymousIndividual, DataProperty, Entity, EntityType, Individual, Iri, Literal,
    OwlObject,
};
use crate::Result;

use super::{construction, Builder, Translation, Translator};

/// Primary node label for an entity kind.
pub fn entity_label(entity_type: EntityType) -> NodeLabel {
    match entity_type {
        EntityType::Class => NodeLabel::Class,
        EntityType::Datatype => NodeLabel::Datatype,
        EntityType::ObjectProperty => NodeLabel::ObjectProperty,
        EntityType::DataProperty => NodeLabel::DataProperty,
        EntityType::AnnotationProperty => NodeLabel::AnnotationProperty,
        EntityType::NamedIndividual => NodeLabel::NamedIndividual,
    }
}

impl Translator<'_> {
    pub fn translate_iri(&self, iri: &Iri) -> Result<Translation> {
        if iri.is_empty() {
            return Err(construction("IRI", "empty IRI"));
        }
        let node = self
            .content_node(NodeLabel::Iri, canonical::iri(iri))?
            .with_property("iri", iri.as_str());
        Ok(Translation::leaf(OwlObject::Iri(iri.clone()), node))
    }

    /// Entities are leaves: their IRI link belongs to the ontology
    /// signature, not to the translation of any one axiom.
    pub fn translate_entity(&self, entity: &Entity) -> Result<Translation> {
        let kind = entity.entity_type().as_str();
        if entity.iri().is_empty() {
            return Err(construction(kind, "empty IRI"));
        }
        let node = self
            .content_node(entity_label(entity.entity_type()), canonical::entity(entity))?
            .with_property("iri", entity.iri().as_str());
        Ok(Translation::leaf(OwlObject::Entity(entity.clone()), node))
    }

    pub fn translate_data_property(&self, property: &DataProperty) -> Result<Translation> {
        self.translate_entity(&Entity::DataProperty(property.clone()))
    }

    pub fn translate_individual(&self, individual: &Individual) -> Result<Translation> {
        match individual {
            Individual::Named(named) => self.translate_entity(&Entity::NamedIndividual(named.clone())),
            Individual::Anonymous(anon) => self.translate_anonymous_individual(anon),
        }
    }

    pub fn translate_anonymous_individual(&self, individual: &AnonymousIndividual) -> Result<Translation> {
        if individual.node_id().is_empty() {
            return Err(construction("AnonymousIndividual", "empty node id"));
        }
        // Blank node labels are local to a document, so each occurrence
        // gets its own node.
        let node = self
            .private_node(NodeLabel::AnonymousIndividual)?
            .with_property("nodeId", individual.node_id());
        Ok(Translation::leaf(OwlObject::AnonymousIndividual(individual.clone()), node))
    }

    /// A tagged literal points at its language tag; any other literal
    /// points at its datatype.
    pub fn translate_literal(&self, literal: &Literal) -> Result<Translation> {
        let datatype = literal.datatype.iri().as_str();
        if datatype.is_empty() {
            return Err(construction("Literal", "empty datatype IRI"));
        }
        match &literal.language {
            Some(_) if datatype != vocab::RDF_LANG_STRING => {
                return Err(construction(
                    "Literal",
                    format!("language-tagged literal with datatype {datatype}"),
                ));
            }
            None if datatype == vocab::RDF_LANG_STRING => {
                return Err(construction("Literal", "rdf:langString literal without a language tag"));
            }
            _ => {}
        }

        let node = self
            .content_node(NodeLabel::Literal, canonical::literal(literal))?
            .with_property("lexicalForm", literal.lexical_form.as_str())
            .with_property("datatype", datatype)
            .with_property("language", literal.language.as_deref().unwrap_or(""));
        let builder = Builder::new(OwlObject::Literal(literal.clone()), node);

        let builder = match &literal.language {
            Some(language) => builder.child(EdgeLabel::LanguageTag, self.translate_language_tag(language)?),
            None => builder.child(
                EdgeLabel::Datatype,
                self.translate_entity(&Entity::Datatype(literal.datatype.clone()))?,
            ),
        };
        Ok(builder.build())
    }

    pub fn translate_language_tag(&self, language: &str) -> Result<Translation> {
        if language.is_empty() {
            return Err(construction("LanguageTag", "empty language tag"));
        }
        let node = self
            .content_node(NodeLabel::LanguageTag, canonical::language_tag(language))?
            .with_property("language", language);
        Ok(Translation::leaf(OwlObject::LanguageTag(language.to_string()), node))
    }
}
