extern crate regex;
extern crate serde;
extern crate serde_json;

use super::{
    markup::{clean_blob, search_all, Markup},
    require_problem, Platform,
};
use crate::{
    error::Result,
    types::{terminal_segment, ProblemIdentity, Site, TestCase},
};
use regex::Regex;
use serde::Deserialize;

const BASE_URL: &str = "https://www.codechef.com";

#[derive(Deserialize)]
struct ProblemResponse {
    #[serde(default)]
    body: Option<String>,
    #[serde(rename = "problemComponents", default)]
    components: Option<Components>,
}
#[derive(Deserialize)]
struct Components {
    #[serde(rename = "sampleTestCases", default)]
    samples: Vec<Sample>,
}
#[derive(Deserialize)]
struct Sample {
    input: String,
    output: String,
}

pub struct Codechef {
    base: String,
    markup: Markup,
    problem_name: Regex,
}
impl Codechef {
    pub fn new() -> Self {
        Self::with_base(BASE_URL)
    }
    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            markup: Markup::new(),
            problem_name: Regex::new(r#"(?is)<div class="problemname">\s*<a href="([^"]+)""#)
                .unwrap(),
        }
    }
    fn contest_link(&self, contest: &str) -> String {
        format!("{}/api/contests/{}", self.base, contest)
    }
    fn problem_link(&self, contest: &str, code: &str) -> String {
        format!("{}/problems/{}", self.contest_link(contest), code)
    }
}
impl Default for Codechef {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for Codechef {
    fn site(&self) -> Site {
        Site::Codechef
    }
    fn problem_url(&self, identity: &ProblemIdentity) -> Result<String> {
        Ok(self.problem_link(
            identity.contest_id(),
            require_problem(identity)?,
        ))
    }
    fn contest_url(&self, identity: &ProblemIdentity) -> Option<String> {
        Some(self.contest_link(identity.contest_id()))
    }
    fn parse_problem(&self, body: &str) -> Result<Vec<TestCase>> {
        let response: ProblemResponse = serde_json::from_str(body)?;
        let samples = response.components.map(|c| c.samples).unwrap_or_default();
        if !samples.is_empty() {
            return Ok(TestCase::from_pairs(
                samples
                    .into_iter()
                    .map(|s| (clean_blob(&s.input), clean_blob(&s.output))),
            ));
        }
        Ok(TestCase::from_pairs(
            self.markup
                .split_marked(response.body.as_deref().unwrap_or_default()),
        ))
    }
    fn parse_contest(&self, identity: &ProblemIdentity, body: &str) -> Result<Vec<String>> {
        let contest = identity.contest_id();
        let codes: Vec<String> = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("problems")
                .and_then(|p| p.as_object())
                // listing order, which needs serde_json's preserve_order
                .map(|problems| problems.keys().cloned().collect())
                .unwrap_or_default(),
            // the contest page itself is HTML
            Err(_) => search_all(body, &self.problem_name)
                .iter()
                .map(|href| terminal_segment(href).to_string())
                .collect(),
        };
        Ok(codes
            .iter()
            .filter(|code| !code.is_empty())
            .map(|code| self.problem_link(contest, code))
            .collect())
    }
}
