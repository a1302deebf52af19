//! Literals.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{vocab, Datatype, Iri};

/// A data value: lexical form plus either a datatype or a language tag.
///
/// A language-tagged literal always has datatype `rdf:langString`; the
/// constructors keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical_form: String,
    pub datatype: Datatype,
    pub language: Option<String>,
}

impl Literal {
    /// Typed literal, e.g. `"42"^^xsd:integer`.
    pub fn typed(lexical_form: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype: Datatype::new(datatype),
            language: None,
        }
    }

    /// Plain string literal, `xsd:string`.
    pub fn string(lexical_form: impl Into<String>) -> Self {
        Self::typed(lexical_form, vocab::XSD_STRING)
    }

    /// Language-tagged literal, e.g. `"Paris"@en`.
    pub fn lang(lexical_form: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype: Datatype::new(vocab::RDF_LANG_STRING),
            language: Some(language.into()),
        }
    }

    pub fn has_language(&self) -> bool {
        self.language.is_some()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "\"{}\"@{}", self.lexical_form, lang),
            None => write!(f, "\"{}\"^^{}", self.lexical_form, self.datatype.iri()),
        }
    }
}
