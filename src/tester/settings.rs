extern crate serde;
extern crate serde_yaml;

use crate::{
    config::{cache::SETTINGS_FILE, fetch::CONCURRENCY},
    downloader::Concurrency,
    error::Result,
    grade::language::Toolchain,
    types::{ProblemIdentity, Site},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// User settings, read from `settings.yaml` in the cache root.
///
/// ```yaml
/// default_site: codechef
/// workdir: /home/me/contests
/// concurrency: 8
/// cpp: g++ -std=c++17 -O2
/// compiled_timeout_ms: 1000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_site: Site,
    pub workdir: Option<PathBuf>,
    /// Simultaneous fetches in contest mode, `0` for no limit.
    pub concurrency: usize,
    #[serde(flatten)]
    pub toolchain: Toolchain,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            default_site: Site::Codeforces,
            workdir: None,
            concurrency: CONCURRENCY,
            toolchain: Toolchain::default(),
        }
    }
}

impl Settings {
    pub fn path(cache_root: &Path) -> PathBuf {
        cache_root.join(SETTINGS_FILE)
    }
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn concurrency(&self) -> Concurrency {
        Concurrency::from_jobs(self.concurrency)
    }
    pub fn site(&self, choice: Option<&str>) -> Result<Site> {
        match choice {
            Some(s) => s.parse(),
            None => Ok(self.default_site),
        }
    }

    /// Creates `<workdir>/<site>/<contest>` when a workdir is configured.
    pub fn prepare_workdir(&self, identity: &ProblemIdentity) -> Result<Option<PathBuf>> {
        match &self.workdir {
            Some(dir) => {
                let path = dir
                    .join(identity.site().name())
                    .join(identity.contest_id());
                fs::create_dir_all(&path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}
