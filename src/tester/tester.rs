use crate::{
    cache::Cache,
    downloader::Downloader,
    error::{Error, Kind, Result},
    grade::{Grader, Grading},
    session::Session,
    settings::Settings,
    types::{ProblemIdentity, TestCase},
};
use log::info;
use std::{env, path::Path};

/// Grades a solution file against the cached samples of the problem its
/// location names, downloading them first when absent.
pub struct Tester<'a> {
    cache: &'a Cache,
    session: &'a Session,
    settings: &'a Settings,
    grader: Grader,
    base_url: Option<String>,
}

fn cached_cases(cache: &Cache, identity: &ProblemIdentity) -> Result<Option<Vec<TestCase>>> {
    match cache.read(identity) {
        Ok(v) if v.is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(e) if matches!(e.kind(), Kind::CacheMiss(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

impl<'a> Tester<'a> {
    pub fn new(cache: &'a Cache, session: &'a Session, settings: &'a Settings) -> Self {
        Self {
            cache,
            session,
            settings,
            grader: Grader::new(settings.toolchain.clone()),
            base_url: None,
        }
    }
    /// Download missing samples from `base` instead of the judge's public host.
    pub fn with_base_url<T: Into<String>>(mut self, base: T) -> Self {
        self.base_url = Some(base.into());
        self
    }

    pub async fn test_cases(&self, identity: &ProblemIdentity) -> Result<Vec<TestCase>> {
        if let Some(v) = cached_cases(self.cache, identity)? {
            return Ok(v);
        }
        info!("No cached test cases for {}, downloading", identity);
        let mut downloader = Downloader::new(self.session, self.cache, self.settings.concurrency());
        if let Some(base) = &self.base_url {
            downloader = downloader.with_base_url(base.as_str());
        }
        downloader.download_problem(identity, true).await?;
        cached_cases(self.cache, identity)?.ok_or_else(|| {
            Error::with_description(Kind::NoTestCases, identity.to_string())
        })
    }

    /// Grades `solution` against the samples of `identity`, wherever the
    /// file lives.
    pub async fn run_as(&self, solution: &Path, identity: &ProblemIdentity) -> Result<Grading> {
        if !solution.is_file() {
            return Err(Error::with_kind(Kind::MissingSolution(solution.to_path_buf())));
        }
        let cases = self.test_cases(identity).await?;
        info!("Running {} against {} test cases", solution.display(), cases.len());
        self.grader.grade(solution, &cases).await
    }

    pub async fn run_solution(&self, solution: &Path) -> Result<(ProblemIdentity, Grading)> {
        self.run_solution_in(&env::current_dir()?, solution).await
    }

    /// Like [`Tester::run_solution`], with relative paths taken from `cwd`.
    pub async fn run_solution_in(
        &self,
        cwd: &Path,
        solution: &Path,
    ) -> Result<(ProblemIdentity, Grading)> {
        let solution = cwd.join(solution);
        if !solution.is_file() {
            return Err(Error::with_kind(Kind::MissingSolution(solution)));
        }
        let identity = ProblemIdentity::from_solution_path(&solution)?;
        let grading = self.run_as(&solution, &identity).await?;
        Ok((identity, grading))
    }
}
