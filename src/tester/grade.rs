extern crate tempfile;

use crate::{
    config::grade::{SCRATCH_PREFIX, TIMEOUT_EXIT_CODE},
    error::{Error, Kind, Result},
    types::TestCase,
};
use language::{Build, Language, Toolchain};
use log::{debug, info};
use run::Status;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

pub mod language;
mod run;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    CompileError,
}
impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Accepted => "Accepted",
            Outcome::WrongAnswer => "WrongAnswer",
            Outcome::TimeLimitExceeded => "TimeLimitExceeded",
            Outcome::RuntimeError => "RuntimeError",
            Outcome::CompileError => "CompileError",
        }
    }
}
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub index: usize,
    pub input: String,
    pub expected: String,
    /// Only present for Accepted and WrongAnswer.
    pub actual: Option<String>,
    pub outcome: Outcome,
}
impl CaseResult {
    pub fn serial(&self) -> usize {
        self.index + 1
    }
    pub fn actual_or_na(&self) -> &str {
        self.actual.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug)]
pub enum Grading {
    Finished(Vec<CaseResult>),
    CompileError(String),
}
impl Grading {
    pub fn all_accepted(&self) -> bool {
        match self {
            Grading::Finished(v) => v.iter().all(|c| c.outcome == Outcome::Accepted),
            Grading::CompileError(_) => false,
        }
    }
}

/// Trailing whitespace of the blob and of every line is insignificant.
pub fn normalize(text: &str) -> String {
    text.trim_end()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Grader {
    toolchain: Toolchain,
    scratch_root: Option<PathBuf>,
}
impl Grader {
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain,
            scratch_root: None,
        }
    }
    /// Create scratch directories under `root` instead of the system
    /// temporary directory.
    pub fn scratch_in<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.scratch_root = Some(root.into());
        self
    }
    fn scratch(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        Ok(match &self.scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        })
    }

    pub async fn grade(&self, solution: &Path, cases: &[TestCase]) -> Result<Grading> {
        let language = Language::from_path(solution)?;
        if !solution.is_file() {
            return Err(Error::with_kind(Kind::MissingSolution(solution.to_path_buf())));
        }
        let scratch = self.scratch()?;
        debug!("Scratch directory {}", scratch.path().display());

        let program = match language.build(&self.toolchain, solution, scratch.path()).await? {
            Build::Ready(p) => p,
            Build::Failed(log) => {
                info!("Compilation of {} failed", solution.display());
                return Ok(Grading::CompileError(log));
            }
        };
        let limit = self.toolchain.timeout(language);

        let mut ret = Vec::with_capacity(cases.len());
        for case in cases {
            let output = scratch.path().join(format!("output{}", case.index));
            let status = run::execute(&program, &case.input, &output, limit).await?;
            let expected = normalize(&case.output);
            let (outcome, actual) = match status {
                Status::TimedOut => (Outcome::TimeLimitExceeded, None),
                Status::Exited(code) if code == TIMEOUT_EXIT_CODE => {
                    (Outcome::TimeLimitExceeded, None)
                }
                Status::Exited(0) => {
                    let actual = normalize(&String::from_utf8_lossy(&fs::read(&output)?));
                    let outcome = if actual == expected {
                        Outcome::Accepted
                    } else {
                        Outcome::WrongAnswer
                    };
                    (outcome, Some(actual))
                }
                Status::Exited(_) | Status::Signaled => (Outcome::RuntimeError, None),
            };
            debug!("Case {}: {:?} -> {}", case.index, status, outcome);
            ret.push(CaseResult {
                index: case.index,
                input: case.input.clone(),
                expected,
                actual,
                outcome,
            });
        }
        Ok(Grading::Finished(ret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_trailing_whitespace() {
        assert_eq!(normalize("1 2  \n3\t\n\n\n"), "1 2\n3");
        assert_eq!(normalize("a\r\nb\r\n"), "a\nb");
        assert_eq!(normalize("  x"), "  x");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn labels_are_single_words() {
        let labels: Vec<_> = [
            Outcome::Accepted,
            Outcome::WrongAnswer,
            Outcome::TimeLimitExceeded,
            Outcome::RuntimeError,
            Outcome::CompileError,
        ]
        .iter()
        .map(|o| o.to_string())
        .collect();
        assert_eq!(
            labels,
            vec![
                "Accepted",
                "WrongAnswer",
                "TimeLimitExceeded",
                "RuntimeError",
                "CompileError"
            ]
        );
    }

    #[test]
    fn na_unless_compared() {
        let r = CaseResult {
            index: 0,
            input: String::new(),
            expected: "1".to_string(),
            actual: None,
            outcome: Outcome::RuntimeError,
        };
        assert_eq!(r.serial(), 1);
        assert_eq!(r.actual_or_na(), "N/A");
    }

    #[cfg(unix)]
    mod process {
        use super::super::*;
        use std::time::Duration;
        use tempfile::{tempdir, TempDir};

        // `sh` stands in for the interpreter so the scripts are portable
        fn grader(scratch: &Path, timeout: Duration) -> Grader {
            let toolchain = Toolchain {
                python: "sh".to_string(),
                cpp: "false".to_string(),
                interpreted_timeout_ms: timeout.as_millis() as u64,
                ..Toolchain::default()
            };
            Grader::new(toolchain).scratch_in(scratch)
        }
        fn solution(dir: &TempDir, name: &str, script: &str) -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, script).unwrap();
            path
        }
        fn sum_case() -> Vec<TestCase> {
            TestCase::from_pairs(vec![("3\n1 2 3\n".to_string(), "6\n".to_string())])
        }
        async fn grade_one(script: &str, timeout: Duration) -> CaseResult {
            let work = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let path = solution(&work, "A.py", script);
            match grader(scratch.path(), timeout)
                .grade(&path, &sum_case())
                .await
                .unwrap()
            {
                Grading::Finished(mut v) => {
                    assert_eq!(v.len(), 1);
                    v.remove(0)
                }
                Grading::CompileError(log) => panic!("unexpected compile error {}", log),
            }
        }
        const LONG: Duration = Duration::from_secs(10);

        #[tokio::test]
        async fn accepted() {
            let r = grade_one("read n\nread a b c\necho $((a + b + c))\n", LONG).await;
            assert_eq!(r.outcome, Outcome::Accepted);
            assert_eq!(r.actual.as_deref(), Some("6"));
            assert_eq!(r.expected, "6");
        }

        #[tokio::test]
        async fn trailing_whitespace_is_accepted() {
            let r = grade_one("printf '6   \\n\\n\\n'\n", LONG).await;
            assert_eq!(r.outcome, Outcome::Accepted);
        }

        #[tokio::test]
        async fn wrong_answer_keeps_output() {
            let r = grade_one("echo 7\n", LONG).await;
            assert_eq!(r.outcome, Outcome::WrongAnswer);
            assert_eq!(r.actual_or_na(), "7");
        }

        #[tokio::test]
        async fn nonzero_exit_is_runtime_error() {
            let r = grade_one("echo 6\nexit 3\n", LONG).await;
            assert_eq!(r.outcome, Outcome::RuntimeError);
            assert_eq!(r.actual, None);
        }

        #[tokio::test]
        async fn exit_124_is_time_limit() {
            let r = grade_one("echo 6\nexit 124\n", LONG).await;
            assert_eq!(r.outcome, Outcome::TimeLimitExceeded);
        }

        #[tokio::test]
        async fn deadline_is_enforced() {
            let r = grade_one("echo 6\nsleep 5\n", Duration::from_millis(300)).await;
            assert_eq!(r.outcome, Outcome::TimeLimitExceeded);
            assert_eq!(r.actual, None);
        }

        #[tokio::test]
        async fn every_case_is_graded_in_order() {
            let work = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let path = solution(&work, "A.py", "read x\necho $((x * 2))\n");
            let cases = TestCase::from_pairs(vec![
                ("1\n".to_string(), "2\n".to_string()),
                ("2\n".to_string(), "5\n".to_string()),
                ("3\n".to_string(), "6\n".to_string()),
            ]);
            let grading = grader(scratch.path(), LONG).grade(&path, &cases).await.unwrap();
            let outcomes: Vec<_> = match &grading {
                Grading::Finished(v) => v.iter().map(|r| (r.serial(), r.outcome)).collect(),
                Grading::CompileError(_) => panic!(),
            };
            assert_eq!(
                outcomes,
                vec![
                    (1, Outcome::Accepted),
                    (2, Outcome::WrongAnswer),
                    (3, Outcome::Accepted)
                ]
            );
            assert!(!grading.all_accepted());
            assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
        }

        #[tokio::test]
        async fn compile_failure_has_no_cases() {
            let work = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let path = solution(&work, "A.cpp", "int main() {");
            let grading = grader(scratch.path(), LONG)
                .grade(&path, &sum_case())
                .await
                .unwrap();
            assert!(matches!(grading, Grading::CompileError(_)));
            assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
        }

        #[tokio::test]
        async fn unsupported_and_missing_solutions() {
            let work = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let java = solution(&work, "A.java", "class A {}");
            let err = grader(scratch.path(), LONG)
                .grade(&java, &sum_case())
                .await
                .unwrap_err();
            assert!(matches!(err.kind(), Kind::UnsupportedLanguage(_)));

            let missing = work.path().join("B.py");
            let err = grader(scratch.path(), LONG)
                .grade(&missing, &sum_case())
                .await
                .unwrap_err();
            assert!(matches!(err.kind(), Kind::MissingSolution(_)));
        }
    }
}
