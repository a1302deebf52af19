//! Write into a staging directory, publish by rename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result};

/// A staging directory next to `target`. [`publish`](Self::publish)
/// renames it into place; dropping it unpublished removes it, so a failed
/// export leaves nothing behind at `target`.
#[derive(Debug)]
pub struct StagedOutput {
    staging: PathBuf,
    target: PathBuf,
    published: bool,
}

impl StagedOutput {
    pub fn new(target: impl Into<PathBuf>) -> Result<Self> {
        let target = target.into();
        if target.exists() {
            return Err(Error::Config(format!("export target {} already exists", target.display())));
        }
        let name = target
            .file_name()
            .ok_or_else(|| Error::Config(format!("export target {} has no file name", target.display())))?
            .to_string_lossy()
            .into_owned();
        let staging = target.with_file_name(format!(".{name}.staging"));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;
        debug!(staging = %staging.display(), "staging directory created");
        Ok(Self { staging, target, published: false })
    }

    pub fn path(&self) -> &Path {
        &self.staging
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn publish(mut self) -> Result<PathBuf> {
        fs::rename(&self.staging, &self.target)?;
        self.published = true;
        Ok(self.target.clone())
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if !self.published {
            if let Err(e) = fs::remove_dir_all(&self.staging) {
                warn!(staging = %self.staging.display(), error = %e, "could not remove staging directory");
            }
        }
    }
}
