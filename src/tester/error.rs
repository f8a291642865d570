extern crate reqwest;
extern crate serde_json;
extern crate serde_yaml;

use std::{
    boxed::Box, convert::Into, error::Error as StdError, fmt, io, path::PathBuf,
    result::Result as StdResult,
};

#[derive(Debug)]
pub struct Error(Box<Inner>);

#[derive(Debug)]
pub enum Kind {
    Network(reqwest::Error),
    Status(u16),
    Parse(serde_json::Error),
    NotFoundOnJudge,
    CacheMiss(PathBuf),
    CacheIntegrity(PathBuf),
    UnsupportedLanguage(String),
    UnsupportedMode,
    MissingSolution(PathBuf),
    NoTestCases,
    Identity,
    Settings(serde_yaml::Error),
    Io(io::Error),
}

#[derive(Debug)]
struct Inner {
    kind: Kind,
    description: Option<String>,
}

pub type Result<T> = StdResult<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            Kind::Network(err) => write!(f, "Error sending request: {}", err)?,
            Kind::Status(code) => write!(f, "Judge responded with HTTP {}", code)?,
            Kind::Parse(err) => write!(f, "Error parsing judge response: {}", err)?,
            Kind::NotFoundOnJudge => write!(f, "No sample test cases found on judge")?,
            Kind::CacheMiss(path) => write!(f, "No cached test cases at {}", path.display())?,
            Kind::CacheIntegrity(path) => write!(
                f,
                "Cached test cases at {} are corrupted (input/output mismatch)",
                path.display()
            )?,
            Kind::UnsupportedLanguage(ext) => write!(f, "Unsupported language \"{}\"", ext)?,
            Kind::UnsupportedMode => write!(f, "Operation not supported by this judge")?,
            Kind::MissingSolution(path) => write!(f, "No such file: {}", path.display())?,
            Kind::NoTestCases => write!(f, "Test cases still missing after download")?,
            Kind::Identity => write!(f, "Invalid problem identity")?,
            Kind::Settings(err) => write!(f, "Error loading settings: {}", err)?,
            Kind::Io(err) => write!(f, "I/O error: {}", err)?,
        }
        self.write_description(f)
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.0.kind {
            Kind::Network(e) => Some(e),
            Kind::Parse(e) => Some(e),
            Kind::Settings(e) => Some(e),
            Kind::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl Error {
    fn new(inner: Inner) -> Self {
        Self(Box::new(inner))
    }
    pub fn with_kind(kind: Kind) -> Self {
        Self::new(Inner {
            kind,
            description: None,
        })
    }
    pub fn with_description<T: Into<String>>(kind: Kind, description: T) -> Self {
        Self::new(Inner {
            kind,
            description: Some(description.into()),
        })
    }
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }
    fn write_description(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = &self.0.description {
            write!(f, ": {}", d)
        } else {
            Ok(())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(s) => Error::with_kind(Kind::Status(s.as_u16())),
            None => Error::with_kind(Kind::Network(err)),
        }
    }
}
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::with_kind(Kind::Io(err))
    }
}
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_kind(Kind::Parse(err))
    }
}
impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::with_kind(Kind::Settings(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_appended() {
        let err = Error::with_description(Kind::UnsupportedLanguage("java".to_string()), "a.java");
        assert_eq!(err.to_string(), "Unsupported language \"java\": a.java");
    }

    #[test]
    fn io_error_keeps_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::Other, "disk"));
        assert!(matches!(err.kind(), Kind::Io(_)));
        assert!(err.source().is_some());
    }
}
