use super::{markup::Markup, require_problem, Platform};
use crate::{
    error::{Error, Kind, Result},
    types::{ProblemIdentity, Site, TestCase},
};

const BASE_URL: &str = "https://www.spoj.com";

pub struct Spoj {
    base: String,
    markup: Markup,
}
impl Spoj {
    pub fn new() -> Self {
        Self::with_base(BASE_URL)
    }
    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            markup: Markup::new(),
        }
    }
}
impl Default for Spoj {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for Spoj {
    fn site(&self) -> Site {
        Site::Spoj
    }
    fn problem_url(&self, identity: &ProblemIdentity) -> Result<String> {
        Ok(format!(
            "{}/problems/{}/",
            self.base,
            require_problem(identity)?
        ))
    }
    fn contest_url(&self, _identity: &ProblemIdentity) -> Option<String> {
        None
    }
    fn parse_problem(&self, body: &str) -> Result<Vec<TestCase>> {
        Ok(TestCase::from_pairs(self.markup.split_marked(body)))
    }
    fn parse_contest(&self, _identity: &ProblemIdentity, _body: &str) -> Result<Vec<String>> {
        Err(Error::with_description(
            Kind::UnsupportedMode,
            "spoj has no contest listing",
        ))
    }
}
