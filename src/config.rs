//! Codec configuration.
//!
//! ```json
//! {
//!   "session": { "identity": { "scheme": "digest", "algorithm": "sha256" } },
//!   "export":  { "tracker": { "policy": "bounded", "capacity": 100000 }, "format": "csv" }
//! }
//! ```
//!
//! Every section is optional; missing sections take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::{RowFormat, TrackerPolicy};
use crate::session::SessionConfig;
use crate::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub session: SessionConfig,
    pub export: ExportConfig,
}

/// Bulk export settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub tracker: TrackerPolicy,
    pub format: RowFormat,
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if let TrackerPolicy::Bounded { capacity: 0 } = self.export.tracker {
            return Err(Error::Config("bounded tracker capacity must be greater than zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityScheme;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = CodecConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.export.tracker, TrackerPolicy::Exact);
        assert_eq!(config.export.format, RowFormat::Csv);
    }

    #[test]
    fn test_full_config() {
        let config = CodecConfig::from_json_str(
            r#"{
                "session": { "identity": { "scheme": "digest", "algorithm": "sha512" } },
                "export": { "tracker": { "policy": "bounded", "capacity": 16 }, "format": "json_lines" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.session.identity,
            IdentityScheme::Digest { algorithm: "sha512".into() }
        );
        assert_eq!(config.export.tracker, TrackerPolicy::Bounded { capacity: 16 });
        assert_eq!(config.export.format, RowFormat::JsonLines);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = CodecConfig::from_json_str(r#"{"export":{"tracker":{"policy":"bounded","capacity":0}}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"session":{{"identity":{{"scheme":"interned"}}}}}}"#).unwrap();
        let config = CodecConfig::from_path(file.path()).unwrap();
        assert_eq!(config.session.identity, IdentityScheme::Interned);
    }
}
