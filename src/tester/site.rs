use crate::{
    error::{Error, Kind, Result},
    types::{ProblemIdentity, Site, TestCase},
};

/// What every judge has to provide: where its pages live and how to turn
/// them into test cases. Fetching itself goes through [`crate::session::Session`].
pub trait Platform: Send + Sync {
    fn site(&self) -> Site;
    fn problem_url(&self, identity: &ProblemIdentity) -> Result<String>;
    /// `None` when the judge has no contest-wide mode.
    fn contest_url(&self, identity: &ProblemIdentity) -> Option<String>;
    /// An empty vector means the page has no samples, which is not an error.
    fn parse_problem(&self, body: &str) -> Result<Vec<TestCase>>;
    /// Problem links in listing order.
    fn parse_contest(&self, identity: &ProblemIdentity, body: &str) -> Result<Vec<String>>;
    fn normalize_problem(&self, raw: &str) -> String {
        self.site().normalize_problem(raw)
    }
}

impl Site {
    pub fn platform(self) -> Box<dyn Platform> {
        match self {
            Site::Codeforces => Box::new(codeforces::Codeforces::new()),
            Site::Codechef => Box::new(codechef::Codechef::new()),
            Site::Spoj => Box::new(spoj::Spoj::new()),
            Site::Hackerrank => Box::new(hackerrank::Hackerrank::new()),
        }
    }
    /// The judge's adapter, talking to `base` (scheme and host) instead of
    /// the public site.
    pub fn platform_at(self, base: &str) -> Box<dyn Platform> {
        match self {
            Site::Codeforces => Box::new(codeforces::Codeforces::with_base(base)),
            Site::Codechef => Box::new(codechef::Codechef::with_base(base)),
            Site::Spoj => Box::new(spoj::Spoj::with_base(base)),
            Site::Hackerrank => Box::new(hackerrank::Hackerrank::with_base(base)),
        }
    }
    pub fn normalize_problem(self, problem: &str) -> String {
        match self {
            Site::Hackerrank => problem
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .to_lowercase(),
            _ => problem.trim().to_string(),
        }
    }
}

fn require_problem(identity: &ProblemIdentity) -> Result<&str> {
    identity.problem().ok_or_else(|| {
        Error::with_description(Kind::Identity, format!("no problem given for {}", identity))
    })
}

fn pair_up(site: Site, inputs: Vec<String>, outputs: Vec<String>) -> Vec<TestCase> {
    if inputs.len() != outputs.len() {
        log::warn!(
            "{}: found {} sample inputs but {} outputs, keeping complete pairs",
            site,
            inputs.len(),
            outputs.len()
        );
    }
    TestCase::from_pairs(inputs.into_iter().zip(outputs))
}

pub mod codechef;
pub mod codeforces;
pub mod hackerrank;
mod markup;
pub mod spoj;
