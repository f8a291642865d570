extern crate serde;
extern crate tokio;

use crate::{
    config::grade::{
        COMPILED_TIMEOUT, CPP_COMPILER, C_COMPILER, INTERPRETED_TIMEOUT, PYTHON, RUST_COMPILER,
    },
    error::{Error, Kind, Result},
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::process::Command;

/// Commands used to run or build solutions. Each command may carry extra
/// flags, e.g. `g++ -std=c++17 -O2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    pub python: String,
    pub c: String,
    pub cpp: String,
    pub rust: String,
    pub interpreted_timeout_ms: u64,
    pub compiled_timeout_ms: u64,
}
impl Default for Toolchain {
    fn default() -> Self {
        Self {
            python: PYTHON.to_string(),
            c: C_COMPILER.to_string(),
            cpp: CPP_COMPILER.to_string(),
            rust: RUST_COMPILER.to_string(),
            interpreted_timeout_ms: INTERPRETED_TIMEOUT.as_millis() as u64,
            compiled_timeout_ms: COMPILED_TIMEOUT.as_millis() as u64,
        }
    }
}
impl Toolchain {
    pub fn timeout(&self, language: Language) -> Duration {
        Duration::from_millis(if language.is_compiled() {
            self.compiled_timeout_ms
        } else {
            self.interpreted_timeout_ms
        })
    }
    fn command(&self, language: Language) -> &str {
        match language {
            Language::Python => &self.python,
            Language::C => &self.c,
            Language::Cpp => &self.cpp,
            Language::Rust => &self.rust,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    C,
    Cpp,
    Rust,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub program: OsString,
    pub args: Vec<OsString>,
}

pub enum Build {
    Ready(Program),
    Failed(String),
}

fn split_command(language: Language, toolchain: &Toolchain) -> Result<(OsString, Vec<OsString>)> {
    let mut parts = toolchain
        .command(language)
        .split_whitespace()
        .map(OsString::from);
    match parts.next() {
        Some(program) => Ok((program, parts.collect())),
        None => Err(Error::with_description(
            Kind::UnsupportedLanguage(language.name().to_string()),
            "no command configured",
        )),
    }
}

impl Language {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "py" => Ok(Language::Python),
            "c" => Ok(Language::C),
            "cpp" | "cc" | "cxx" => Ok(Language::Cpp),
            "rs" => Ok(Language::Rust),
            _ => Err(Error::with_description(
                Kind::UnsupportedLanguage(ext),
                "supported: py, c, cpp, rs",
            )),
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
        }
    }
    pub fn is_compiled(self) -> bool {
        self != Language::Python
    }

    /// The compiler invocation, `None` for interpreted languages.
    pub fn compile_command(
        self,
        toolchain: &Toolchain,
        source: &Path,
        binary: &Path,
    ) -> Result<Option<Program>> {
        if !self.is_compiled() {
            return Ok(None);
        }
        let (program, mut args) = split_command(self, toolchain)?;
        args.push(source.as_os_str().to_owned());
        args.push("-o".into());
        args.push(binary.as_os_str().to_owned());
        Ok(Some(Program { program, args }))
    }

    pub async fn build(self, toolchain: &Toolchain, source: &Path, scratch: &Path) -> Result<Build> {
        let binary: PathBuf = scratch.join("solution");
        let compile = match self.compile_command(toolchain, source, &binary)? {
            Some(c) => c,
            None => {
                let (program, mut args) = split_command(self, toolchain)?;
                args.push(source.as_os_str().to_owned());
                return Ok(Build::Ready(Program { program, args }));
            }
        };
        debug!("Compiling: {:?} {:?}", compile.program, compile.args);
        let output = Command::new(&compile.program)
            .args(&compile.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::with_description(
                    Kind::Io(e),
                    format!("can't run {}", compile.program.to_string_lossy()),
                )
            })?;
        if output.status.success() {
            Ok(Build::Ready(Program {
                program: binary.into_os_string(),
                args: Vec::new(),
            }))
        } else {
            Ok(Build::Failed(String::from_utf8_lossy(&output.stderr).into_owned()))
        }
    }
}
