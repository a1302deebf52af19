//! Internationalized resource identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute IRI, kept as text. No normalization is applied: two IRIs
/// are the same object iff their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Iri(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self { Iri::new(s) }
}

impl From<String> for Iri {
    fn from(s: String) -> Self { Iri(s) }
}
