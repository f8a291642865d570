extern crate regex;

use super::{
    markup::{clean_blob, search_all, Markup},
    pair_up, require_problem, Platform,
};
use crate::{
    error::Result,
    types::{ProblemIdentity, Site, TestCase},
};
use regex::Regex;

const BASE_URL: &str = "https://codeforces.com";

pub struct Codeforces {
    base: String,
    markup: Markup,
    input: Regex,
    output: Regex,
    line: Regex,
    table: Regex,
    link: Regex,
}
impl Codeforces {
    pub fn new() -> Self {
        Self::with_base(BASE_URL)
    }
    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            markup: Markup::new(),
            input: Regex::new(r#"(?is)<div class="input">.*?<pre(?:\s[^>]*)?>(.*?)</pre>"#).unwrap(),
            output: Regex::new(r#"(?is)<div class="output">.*?<pre(?:\s[^>]*)?>(.*?)</pre>"#)
                .unwrap(),
            line: Regex::new(r"(?i)</div\s*>").unwrap(),
            table: Regex::new(r#"(?is)<table class="problems"[^>]*>(.*?)</table>"#).unwrap(),
            link: Regex::new(r#"(?is)<td class="id[^"]*"[^>]*>\s*<a href="([^"]+)""#).unwrap(),
        }
    }
    fn block_text(&self, pre: &str) -> String {
        // newer statements wrap each sample line in its own div
        clean_blob(&self.markup.to_text(&self.line.replace_all(pre, "\n")))
    }
}
impl Default for Codeforces {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for Codeforces {
    fn site(&self) -> Site {
        Site::Codeforces
    }
    fn problem_url(&self, identity: &ProblemIdentity) -> Result<String> {
        Ok(format!(
            "{}/contest/{}/problem/{}",
            self.base,
            identity.contest_id(),
            require_problem(identity)?
        ))
    }
    fn contest_url(&self, identity: &ProblemIdentity) -> Option<String> {
        Some(format!("{}/contest/{}", self.base, identity.contest_id()))
    }
    fn parse_problem(&self, body: &str) -> Result<Vec<TestCase>> {
        let texts = |regex: &Regex| -> Vec<String> {
            search_all(body, regex)
                .iter()
                .map(|pre| self.block_text(pre))
                .collect()
        };
        Ok(pair_up(self.site(), texts(&self.input), texts(&self.output)))
    }
    fn parse_contest(&self, _identity: &ProblemIdentity, body: &str) -> Result<Vec<String>> {
        let table = match self.table.captures(body).and_then(|c| c.get(1)) {
            Some(t) => t.as_str(),
            None => return Ok(Vec::new()),
        };
        Ok(search_all(table, &self.link)
            .into_iter()
            .map(|href| {
                if href.starts_with("http") {
                    href
                } else {
                    format!("{}{}", self.base, href)
                }
            })
            .collect())
    }
}
