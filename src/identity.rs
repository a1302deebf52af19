//! # Node Identity Assignor
//!
//! Every node category is either *content-addressed* (equal canonical form,
//! equal id, in every session) or *session-unique* (a fresh counter value
//! per occurrence). The split is a static table over primary labels, never
//! a per-instance decision.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use crate::model::NodeLabel;
use crate::owl::{Entity, Iri, Literal};
use crate::{Error, Result};

/// How a node category receives its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityPolicy {
    /// Id derived from the canonical form; shared by every occurrence.
    ContentAddressed,
    /// Id drawn from the session counter; private to one occurrence.
    SessionUnique,
}

impl IdentityPolicy {
    pub fn is_reusable(self) -> bool {
        self == IdentityPolicy::ContentAddressed
    }
}

/// The classification table. `None` for category labels, which are never
/// primary and so never identify a node.
pub fn policy_of(label: NodeLabel) -> Option<IdentityPolicy> {
    use NodeLabel::*;
    if label.is_category() {
        return None;
    }
    Some(match label {
        Project | Branch | OntologyDocument | Iri | Literal | LanguageTag | Class | Datatype
        | ObjectProperty | DataProperty | AnnotationProperty | NamedIndividual => {
            IdentityPolicy::ContentAddressed
        }
        _ => IdentityPolicy::SessionUnique,
    })
}

impl NodeLabel {
    pub fn identity_policy(self) -> Option<IdentityPolicy> {
        policy_of(self)
    }

    pub fn is_reusable(self) -> bool {
        policy_of(self).is_some_and(IdentityPolicy::is_reusable)
    }
}

// ============================================================================
// Digest algorithms
// ============================================================================

/// Digest used for content-addressed ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Lowercase hex digest of `input`.
    pub fn hex_digest(self, input: &str) -> String {
        match self {
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(input.as_bytes());
                format!("{:x}", hasher.finalize())
            }
            DigestAlgorithm::Sha512 => {
                let mut hasher = Sha512::new();
                hasher.update(input.as_bytes());
                format!("{:x}", hasher.finalize())
            }
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            other => Err(Error::Identity(format!("unsupported digest algorithm '{other}'"))),
        }
    }
}

/// Identity scheme for content-addressed categories, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum IdentityScheme {
    /// Hex digest of the canonical form. Stable across sessions.
    Digest {
        #[serde(default = "default_algorithm")]
        algorithm: String,
    },
    /// Interned token per canonical form. Stable within one session only.
    Interned,
}

fn default_algorithm() -> String {
    "sha256".to_string()
}

impl Default for IdentityScheme {
    fn default() -> Self {
        IdentityScheme::Digest { algorithm: default_algorithm() }
    }
}

// ============================================================================
// Canonical forms
// ============================================================================

/// Canonical strings for content-addressed objects.
///
/// Fields are joined with U+001F so no two distinct objects share a form.
pub mod canonical {
    use super::*;

    const SEP: char = '\u{1f}';

    pub fn iri(iri: &Iri) -> String {
        format!("IRI{SEP}{}", iri.as_str())
    }

    pub fn entity(entity: &Entity) -> String {
        format!("{}{SEP}{}", entity.entity_type().as_str(), entity.iri().as_str())
    }

    pub fn literal(literal: &Literal) -> String {
        format!(
            "Literal{SEP}{}{SEP}{}{SEP}{}",
            literal.lexical_form,
            literal.datatype.iri().as_str(),
            literal.language.as_deref().unwrap_or(""),
        )
    }

    pub fn language_tag(language: &str) -> String {
        format!("LanguageTag{SEP}{language}")
    }

    pub fn project(project_id: &str) -> String {
        format!("Project{SEP}{project_id}")
    }

    pub fn branch(project_id: &str, branch_id: &str) -> String {
        format!("Branch{SEP}{project_id}{SEP}{branch_id}")
    }

    pub fn ontology_document(project_id: &str, branch_id: &str, document_id: &str) -> String {
        format!("OntologyDocument{SEP}{project_id}{SEP}{branch_id}{SEP}{document_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owl::{vocab, EntityType};

    #[test]
    fn test_policy_table() {
        assert_eq!(policy_of(NodeLabel::Class), Some(IdentityPolicy::ContentAddressed));
        assert_eq!(policy_of(NodeLabel::LanguageTag), Some(IdentityPolicy::ContentAddressed));
        assert_eq!(policy_of(NodeLabel::SubClassOf), Some(IdentityPolicy::SessionUnique));
        assert_eq!(policy_of(NodeLabel::ObjectSomeValuesFrom), Some(IdentityPolicy::SessionUnique));
        assert_eq!(policy_of(NodeLabel::Annotation), Some(IdentityPolicy::SessionUnique));
        assert_eq!(policy_of(NodeLabel::AnonymousIndividual), Some(IdentityPolicy::SessionUnique));
        assert_eq!(policy_of(NodeLabel::Entity), None);
    }

    #[test]
    fn test_every_primary_label_is_classified() {
        for label in NodeLabel::ALL {
            assert_eq!(policy_of(*label).is_some(), !label.is_category(), "{label}");
        }
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            DigestAlgorithm::Sha256.hex_digest("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(DigestAlgorithm::Sha512.hex_digest("hello").len(), 128);
    }

    #[test]
    fn test_unknown_algorithm_is_identity_error() {
        let err = "md5".parse::<DigestAlgorithm>().unwrap_err();
        assert!(matches!(err, Error::Identity(_)));
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
    }

    #[test]
    fn test_canonical_forms_distinguish_kinds() {
        let iri = Iri::new("http://x/A");
        let class = Entity::new(EntityType::Class, "http://x/A");
        let individual = Entity::new(EntityType::NamedIndividual, "http://x/A");
        assert_ne!(canonical::iri(&iri), canonical::entity(&class));
        assert_ne!(canonical::entity(&class), canonical::entity(&individual));

        let typed = Literal::typed("en", vocab::XSD_STRING);
        let tagged = Literal::lang("en", "en");
        assert_ne!(canonical::literal(&typed), canonical::literal(&tagged));
    }

    #[test]
    fn test_scheme_config_shape() {
        let scheme: IdentityScheme = serde_json::from_str(r#"{"scheme":"digest"}"#).unwrap();
        assert_eq!(scheme, IdentityScheme::default());
        let scheme: IdentityScheme = serde_json::from_str(r#"{"scheme":"interned"}"#).unwrap();
        assert_eq!(scheme, IdentityScheme::Interned);
    }
}
