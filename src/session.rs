//! Translation session.
//!
//! A `Session` owns the state that must be shared by every translation in
//! one batch of work: the session-unique counter and the intern cache. It
//! is `Sync`, so independent axioms may be translated on worker threads
//! against one shared session.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::identity::{DigestAlgorithm, IdentityPolicy, IdentityScheme};
use crate::model::{NodeId, NodeLabel};
use crate::{Error, Result};

/// Session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub identity: IdentityScheme,
}

#[derive(Debug, Clone, Copy)]
enum ContentScheme {
    Digest(DigestAlgorithm),
    Interned,
}

/// Identity state for one translation run.
#[derive(Debug)]
pub struct Session {
    scheme: ContentScheme,
    next_unique: AtomicU64,
    next_interned: AtomicU64,
    interned: DashMap<String, NodeId>,
}

impl Session {
    /// Open a session. An unsupported digest algorithm fails here, before
    /// any object is translated.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let scheme = match &config.identity {
            IdentityScheme::Digest { algorithm } => ContentScheme::Digest(algorithm.parse()?),
            IdentityScheme::Interned => ContentScheme::Interned,
        };
        debug!(?scheme, "translation session opened");
        Ok(Self {
            scheme,
            next_unique: AtomicU64::new(1),
            next_interned: AtomicU64::new(1),
            interned: DashMap::new(),
        })
    }

    /// SHA-256 session.
    pub fn sha256() -> Self {
        Self {
            scheme: ContentScheme::Digest(DigestAlgorithm::Sha256),
            next_unique: AtomicU64::new(1),
            next_interned: AtomicU64::new(1),
            interned: DashMap::new(),
        }
    }

    /// True if content-addressed ids from this session are stable across runs.
    pub fn is_stable_across_runs(&self) -> bool {
        matches!(self.scheme, ContentScheme::Digest(_))
    }

    /// Assign an id to a node with primary label `label`. `canonical` is
    /// only evaluated for content-addressed categories.
    pub fn assign(&self, label: NodeLabel, canonical: impl FnOnce() -> String) -> Result<NodeId> {
        match label.identity_policy() {
            Some(IdentityPolicy::ContentAddressed) => Ok(self.content_id(&canonical())),
            Some(IdentityPolicy::SessionUnique) => Ok(self.unique_id()),
            None => Err(Error::Identity(format!("'{label}' is a category label, not a node kind"))),
        }
    }

    pub fn content_id(&self, canonical: &str) -> NodeId {
        match self.scheme {
            ContentScheme::Digest(algorithm) => NodeId::Content(algorithm.hex_digest(canonical)),
            ContentScheme::Interned => {
                if let Some(id) = self.interned.get(canonical) {
                    return id.clone();
                }
                self.interned
                    .entry(canonical.to_owned())
                    .or_insert_with(|| {
                        let n = self.next_interned.fetch_add(1, Ordering::Relaxed);
                        NodeId::Content(format!("i{n}"))
                    })
                    .clone()
            }
        }
    }

    pub fn unique_id(&self) -> NodeId {
        NodeId::Session(self.next_unique.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of session-unique ids handed out so far.
    pub fn unique_ids_issued(&self) -> u64 {
        self.next_unique.load(Ordering::Relaxed) - 1
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::sha256()
    }
}
