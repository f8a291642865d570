extern crate regex;
extern crate serde;
extern crate serde_json;

use super::{
    markup::{clean_blob, search_all, Markup},
    pair_up, require_problem, Platform,
};
use crate::{
    error::Result,
    types::{ProblemIdentity, Site, TestCase},
};
use regex::Regex;
use serde::Deserialize;

const BASE_URL: &str = "https://www.hackerrank.com";

#[derive(Deserialize)]
struct ChallengeResponse {
    model: Challenge,
}
#[derive(Deserialize)]
struct Challenge {
    #[serde(default)]
    body_html: Option<String>,
}
#[derive(Deserialize)]
struct ChallengeList {
    models: Vec<ChallengeEntry>,
}
#[derive(Deserialize)]
struct ChallengeEntry {
    slug: String,
}

pub struct Hackerrank {
    base: String,
    markup: Markup,
    input: Regex,
    output: Regex,
    code: Regex,
}
impl Hackerrank {
    pub fn new() -> Self {
        Self::with_base(BASE_URL)
    }
    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            markup: Markup::new(),
            input: Regex::new(
                r#"(?is)class="[^"]*challenge_sample_input[^"]*"[^>]*>.*?<pre(?:\s[^>]*)?>(.*?)</pre>"#,
            )
            .unwrap(),
            output: Regex::new(
                r#"(?is)class="[^"]*challenge_sample_output[^"]*"[^>]*>.*?<pre(?:\s[^>]*)?>(.*?)</pre>"#,
            )
            .unwrap(),
            code: Regex::new(r"(?is)^\s*<code[^>]*>|</code>\s*$").unwrap(),
        }
    }
    fn challenges(&self, contest: &str) -> String {
        format!("{}/rest/contests/{}/challenges", self.base, contest)
    }
    fn block_text(&self, pre: &str) -> String {
        // stripping the tags of a span-per-line block would glue the lines together
        let text = match self.markup.span_lines(pre) {
            Some(lines) => lines,
            None => self.markup.to_text(&self.code.replace_all(pre, "")),
        };
        clean_blob(&text)
    }
}
impl Default for Hackerrank {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for Hackerrank {
    fn site(&self) -> Site {
        Site::Hackerrank
    }
    fn problem_url(&self, identity: &ProblemIdentity) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.challenges(identity.contest_id()),
            require_problem(identity)?
        ))
    }
    fn contest_url(&self, identity: &ProblemIdentity) -> Option<String> {
        Some(self.challenges(identity.contest_id()))
    }
    fn parse_problem(&self, body: &str) -> Result<Vec<TestCase>> {
        let response: ChallengeResponse = serde_json::from_str(body)?;
        let html = response.model.body_html.unwrap_or_default();
        let texts = |regex: &Regex| -> Vec<String> {
            search_all(&html, regex)
                .iter()
                .map(|pre| self.block_text(pre))
                .collect()
        };
        Ok(pair_up(self.site(), texts(&self.input), texts(&self.output)))
    }
    fn parse_contest(&self, identity: &ProblemIdentity, body: &str) -> Result<Vec<String>> {
        let list: ChallengeList = serde_json::from_str(body)?;
        let challenges = self.challenges(identity.contest_id());
        Ok(list
            .models
            .into_iter()
            .map(|m| format!("{}/{}", challenges, m.slug))
            .collect())
    }
}
