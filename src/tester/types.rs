extern crate serde;

use crate::error::{Error, Kind, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Codeforces,
    Codechef,
    Spoj,
    Hackerrank,
}
impl Site {
    pub const ALL: [Site; 4] = [Site::Codeforces, Site::Codechef, Site::Spoj, Site::Hackerrank];

    pub fn name(self) -> &'static str {
        match self {
            Site::Codeforces => "codeforces",
            Site::Codechef => "codechef",
            Site::Spoj => "spoj",
            Site::Hackerrank => "hackerrank",
        }
    }
}
impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Site {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Site::ALL
            .iter()
            .copied()
            .find(|site| site.name() == lower)
            .ok_or_else(|| Error::with_description(Kind::Identity, format!("unknown site {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProblemIdentity {
    site: Site,
    contest: String,
    problem: Option<String>,
}
fn check_segment(what: &str, value: &str) -> Result<()> {
    let separator = |c: char| c == '/' || c == '\\';
    if value.is_empty() || value == "." || value == ".." || value.contains(separator) {
        Err(Error::with_description(
            Kind::Identity,
            format!("invalid {} \"{}\"", what, value),
        ))
    } else {
        Ok(())
    }
}
impl ProblemIdentity {
    pub fn new(site: Site, contest: &str, problem: Option<&str>) -> Result<Self> {
        check_segment("contest", contest)?;
        let problem = match problem {
            Some(p) => {
                let slug = site.normalize_problem(p);
                check_segment("problem", &slug)?;
                Some(slug)
            }
            None => None,
        };
        Ok(Self {
            site,
            contest: contest.to_string(),
            problem,
        })
    }
    pub fn contest(site: Site, contest: &str) -> Result<Self> {
        Self::new(site, contest, None)
    }
    /// Infers the identity from `<dir>/<site>/<contest>/<problem>.<ext>`.
    pub fn from_solution_path(path: &Path) -> Result<Self> {
        let segment = |p: Option<&Path>| -> Option<String> {
            p.and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .map(str::to_string)
        };
        let problem = path.file_stem().and_then(|s| s.to_str());
        let contest_dir = path.parent();
        let site_dir = contest_dir.and_then(Path::parent);
        match (segment(site_dir), segment(contest_dir), problem) {
            (Some(site), Some(contest), Some(problem)) => {
                Self::new(site.parse()?, &contest, Some(problem))
            }
            _ => Err(Error::with_description(
                Kind::Identity,
                format!("can't infer site/contest/problem from {}", path.display()),
            )),
        }
    }
    pub fn site(&self) -> Site {
        self.site
    }
    pub fn contest_id(&self) -> &str {
        &self.contest
    }
    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }
    pub fn with_problem(&self, problem: &str) -> Result<Self> {
        Self::new(self.site, &self.contest, Some(problem))
    }
    pub fn contest_scope(&self) -> Self {
        Self {
            site: self.site,
            contest: self.contest.clone(),
            problem: None,
        }
    }
}
impl fmt::Display for ProblemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Some(p) => write!(f, "{} {}-{}", self.site, self.contest, p),
            None => write!(f, "{} {}", self.site, self.contest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub index: usize,
    pub input: String,
    pub output: String,
}
impl TestCase {
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Vec<TestCase> {
        pairs
            .into_iter()
            .enumerate()
            .map(|(index, (input, output))| TestCase {
                index,
                input,
                output,
            })
            .collect()
    }
}

pub struct FetchResult {
    pub url: String,
    pub status: u16,
    pub body: String,
}
impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
    pub fn slug(&self) -> &str {
        terminal_segment(&self.url)
    }
}

pub fn terminal_segment(link: &str) -> &str {
    let end = link.find(|c: char| c == '?' || c == '#').unwrap_or(link.len());
    link[..end]
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
}
