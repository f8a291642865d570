extern crate dirs;

use crate::{
    config::cache::{DIR_NAME, INPUT_PREFIX, OUTPUT_PREFIX},
    error::{Error, Kind, Result},
    types::{ProblemIdentity, TestCase},
};
use log::debug;
use std::{
    collections::{BTreeMap, HashSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Sample tests on disk, one directory per problem:
/// `<root>/<site>/<contest>/<problem>/{Input,Output}<i>`.
pub struct Cache {
    root: PathBuf,
}

enum Half {
    Input(usize),
    Output(usize),
}
fn classify(name: &str) -> Option<Half> {
    if let Some(i) = name.strip_prefix(INPUT_PREFIX) {
        i.parse().ok().map(Half::Input)
    } else if let Some(i) = name.strip_prefix(OUTPUT_PREFIX) {
        i.parse().ok().map(Half::Output)
    } else {
        None
    }
}

impl Cache {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
    pub fn default_root() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join(DIR_NAME))
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn path(&self, identity: &ProblemIdentity) -> PathBuf {
        let contest = self
            .root
            .join(identity.site().name())
            .join(identity.contest_id());
        match identity.problem() {
            Some(p) => contest.join(p),
            None => contest,
        }
    }

    /// Problem scope: whether the directory already existed. A miss creates
    /// it, since writers expect it to be there. Contest scope only makes sure
    /// the directory exists and always reports a miss.
    pub fn exists(&self, identity: &ProblemIdentity) -> Result<bool> {
        let path = self.path(identity);
        if identity.problem().is_none() {
            fs::create_dir_all(&path)?;
            return Ok(false);
        }
        if path.is_dir() {
            Ok(true)
        } else {
            fs::create_dir_all(&path)?;
            Ok(false)
        }
    }
    pub fn ensure(&self, identity: &ProblemIdentity) -> Result<()> {
        fs::create_dir_all(self.path(identity))?;
        Ok(())
    }

    pub fn write(&self, identity: &ProblemIdentity, cases: &[TestCase]) -> Result<()> {
        if identity.problem().is_none() {
            return Err(Error::with_description(
                Kind::Identity,
                format!("can't store test cases for whole contest {}", identity),
            ));
        }
        let dir = self.path(identity);
        fs::create_dir_all(&dir)?;
        for case in cases {
            fs::write(dir.join(format!("{}{}", INPUT_PREFIX, case.index)), &case.input)?;
            fs::write(dir.join(format!("{}{}", OUTPUT_PREFIX, case.index)), &case.output)?;
        }
        // a refresh may bring fewer samples than before
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let stale = match entry.file_name().to_str().and_then(classify) {
                Some(Half::Input(i)) | Some(Half::Output(i)) => i >= cases.len(),
                None => false,
            };
            if stale {
                fs::remove_file(entry.path())?;
            }
        }
        debug!("Stored {} test cases for {} in {}", cases.len(), identity, dir.display());
        Ok(())
    }

    pub fn read(&self, identity: &ProblemIdentity) -> Result<Vec<TestCase>> {
        let dir = self.path(identity);
        let entries = match fs::read_dir(&dir) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::with_kind(Kind::CacheMiss(dir)))
            }
            Err(e) => return Err(e.into()),
        };
        let mut inputs = BTreeMap::new();
        let mut outputs = BTreeMap::new();
        for entry in entries {
            let entry = entry?;
            match entry.file_name().to_str().and_then(classify) {
                Some(Half::Input(i)) => {
                    inputs.insert(i, fs::read_to_string(entry.path())?);
                }
                Some(Half::Output(i)) => {
                    outputs.insert(i, fs::read_to_string(entry.path())?);
                }
                None => (),
            }
        }
        let contiguous = |m: &BTreeMap<usize, String>| m.keys().copied().eq(0..m.len());
        if !inputs.keys().eq(outputs.keys()) || !contiguous(&inputs) {
            return Err(Error::with_description(
                Kind::CacheIntegrity(dir),
                format!("{} inputs, {} outputs", inputs.len(), outputs.len()),
            ));
        }
        Ok(TestCase::from_pairs(
            inputs.into_iter().zip(outputs).map(|((_, i), (_, o))| (i, o)),
        ))
    }

    pub fn purge(&self, identity: &ProblemIdentity) -> Result<()> {
        match fs::remove_dir_all(self.path(identity)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Problem slugs that already have a directory under the contest.
    pub fn cached_problems(&self, identity: &ProblemIdentity) -> Result<HashSet<String>> {
        let dir = self.path(&identity.contest_scope());
        let entries = match fs::read_dir(&dir) {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => return Err(e.into()),
        };
        let mut ret = HashSet::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    ret.insert(name.to_string());
                }
            }
        }
        Ok(ret)
    }
}
