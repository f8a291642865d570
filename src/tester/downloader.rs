extern crate futures;

use crate::{
    cache::Cache,
    config::fetch::CONCURRENCY,
    error::{Error, Kind, Result},
    session::Session,
    site::Platform,
    types::{terminal_segment, FetchResult, ProblemIdentity, Site},
};
use futures::stream::{self, FuturesUnordered, StreamExt};
use log::{info, warn};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    Bounded(usize),
    /// Every link of a contest in flight at once.
    Unbounded,
}
impl Concurrency {
    pub fn from_jobs(jobs: usize) -> Self {
        if jobs == 0 {
            Concurrency::Unbounded
        } else {
            Concurrency::Bounded(jobs)
        }
    }
}
impl Default for Concurrency {
    fn default() -> Self {
        Concurrency::Bounded(CONCURRENCY)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Fetched {
    Cached,
    Stored(usize),
}

#[derive(Debug, Default)]
pub struct Retrieval {
    pub stored: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct Downloader<'a> {
    session: &'a Session,
    cache: &'a Cache,
    concurrency: Concurrency,
    base_url: Option<String>,
}

fn check_status(response: &FetchResult) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(Error::with_description(
            Kind::Status(response.status),
            response.url.clone(),
        ))
    }
}

impl<'a> Downloader<'a> {
    pub fn new(session: &'a Session, cache: &'a Cache, concurrency: Concurrency) -> Self {
        Downloader {
            session,
            cache,
            concurrency,
            base_url: None,
        }
    }
    /// Talk to `base` (e.g. a mirror) instead of the judge's public host.
    pub fn with_base_url<T: Into<String>>(mut self, base: T) -> Self {
        self.base_url = Some(base.into());
        self
    }
    fn platform(&self, site: Site) -> Box<dyn Platform> {
        match &self.base_url {
            Some(base) => site.platform_at(base),
            None => site.platform(),
        }
    }

    fn store(
        &self,
        platform: &dyn Platform,
        identity: &ProblemIdentity,
        response: &FetchResult,
    ) -> Result<usize> {
        let cases = platform.parse_problem(&response.body)?;
        if cases.is_empty() {
            warn!("{}: {}", identity, Error::with_kind(Kind::NotFoundOnJudge));
        }
        self.cache.write(identity, &cases)?;
        Ok(cases.len())
    }

    pub async fn download_problem(&self, identity: &ProblemIdentity, force: bool) -> Result<Fetched> {
        let platform = self.platform(identity.site());
        if self.cache.exists(identity)? && !force {
            info!("Test cases for {} found in cache", identity);
            return Ok(Fetched::Cached);
        }
        let url = platform.problem_url(identity)?;
        info!("Fetching problem {}", identity);
        let response = self.session.get(&url).await?;
        check_status(&response)?;
        Ok(Fetched::Stored(self.store(
            platform.as_ref(),
            identity,
            &response,
        )?))
    }

    pub async fn download_contest(
        &self,
        identity: &ProblemIdentity,
        force: bool,
    ) -> Result<Retrieval> {
        let contest = identity.contest_scope();
        let platform = self.platform(contest.site());
        self.cache.exists(&contest)?;
        let url = platform.contest_url(&contest).ok_or_else(|| {
            Error::with_description(
                Kind::UnsupportedMode,
                format!("{} has no contest listing", contest.site()),
            )
        })?;
        info!("Checking problems available for contest {}", contest);
        let response = self.session.get(&url).await?;
        check_status(&response)?;
        let links = platform.parse_contest(&contest, &response.body)?;
        info!("Found {} problems", links.len());
        self.retrieve_contest(&contest, links, force).await
    }

    /// Fetches `links` concurrently and stores each page under the problem
    /// named by its final url. Failed links are logged and reported, never
    /// raised.
    pub async fn retrieve_contest(
        &self,
        identity: &ProblemIdentity,
        links: Vec<String>,
        force: bool,
    ) -> Result<Retrieval> {
        let contest = identity.contest_scope();
        let platform = self.platform(contest.site());
        let cached = if force {
            HashSet::new()
        } else {
            self.cache.cached_problems(&contest)?
        };
        let (skipped, pending): (Vec<String>, Vec<String>) = links
            .into_iter()
            .partition(|link| cached.contains(terminal_segment(link)));
        let mut ret = Retrieval {
            skipped,
            ..Retrieval::default()
        };

        let session = self.session;
        let fetches = pending.into_iter().map(|link| async move {
            let response = session.get(&link).await;
            (link, response)
        });
        let mut completed = match self.concurrency {
            Concurrency::Unbounded => fetches.collect::<FuturesUnordered<_>>().boxed_local(),
            Concurrency::Bounded(n) => stream::iter(fetches).buffer_unordered(n.max(1)).boxed_local(),
        };
        while let Some((link, response)) = completed.next().await {
            let stored = response.and_then(|response| {
                check_status(&response)?;
                // completion order is arbitrary, the page names its own problem
                let identity = contest.with_problem(response.slug())?;
                self.store(platform.as_ref(), &identity, &response)?;
                Ok(identity.problem().unwrap_or_default().to_string())
            });
            match stored {
                Ok(slug) => ret.stored.push(slug),
                Err(e) => {
                    warn!("Skipping {}: {}", link, e);
                    ret.failed.push(link);
                }
            }
        }
        info!(
            "Contest {}: {} stored, {} failed, {} already cached",
            contest,
            ret.stored.len(),
            ret.failed.len(),
            ret.skipped.len()
        );
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Site, TestCase};
    use httpmock::prelude::*;
    use tempfile::tempdir;

    fn page(input: &str, output: &str) -> String {
        format!(
            r#"<div class="input"><pre>{}</pre></div><div class="output"><pre>{}</pre></div>"#,
            input, output
        )
    }
    fn contest() -> ProblemIdentity {
        ProblemIdentity::contest(Site::Codeforces, "1").unwrap()
    }
    fn problem(p: &str) -> ProblemIdentity {
        contest().with_problem(p).unwrap()
    }

    async fn partial_failure(concurrency: Concurrency) {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/A");
                then.status(200).body(page("1 2", "3"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/B");
                then.status(200).body(page("5<br>5", "10"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/C");
                then.status(404);
            })
            .await;

        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let session = Session::new().unwrap();
        let downloader = Downloader::new(&session, &cache, concurrency);
        let links = vec![
            server.url("/contest/1/problem/A"),
            server.url("/contest/1/problem/B"),
            server.url("/contest/1/problem/C"),
            "http://127.0.0.1:1/contest/1/problem/D".to_string(),
        ];
        let ret = downloader
            .retrieve_contest(&contest(), links, false)
            .await
            .unwrap();

        let mut stored = ret.stored.clone();
        stored.sort();
        assert_eq!(stored, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(ret.failed.len(), 2);
        assert_eq!(
            cache.read(&problem("B")).unwrap(),
            vec![TestCase {
                index: 0,
                input: "5\n5\n".to_string(),
                output: "10\n".to_string()
            }]
        );
        assert!(!cache.path(&problem("C")).exists());
        assert!(!cache.path(&problem("D")).exists());
    }

    #[tokio::test]
    async fn failures_do_not_block_siblings() {
        partial_failure(Concurrency::Bounded(2)).await;
    }

    #[tokio::test]
    async fn unbounded_fan_out() {
        partial_failure(Concurrency::Unbounded).await;
    }

    #[tokio::test]
    async fn cached_problems_are_skipped_unless_forced() {
        let server = MockServer::start_async().await;
        let a = server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/A");
                then.status(200).body(page("1", "1"));
            })
            .await;
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        cache
            .write(&problem("A"), &TestCase::from_pairs(vec![("old\n".into(), "old\n".into())]))
            .unwrap();
        let session = Session::new().unwrap();
        let downloader = Downloader::new(&session, &cache, Concurrency::default());
        let links = vec![server.url("/contest/1/problem/A")];

        let ret = downloader
            .retrieve_contest(&contest(), links.clone(), false)
            .await
            .unwrap();
        assert_eq!(ret.skipped.len(), 1);
        a.assert_hits_async(0).await;

        let ret = downloader
            .retrieve_contest(&contest(), links, true)
            .await
            .unwrap();
        assert_eq!(ret.stored, vec!["A".to_string()]);
        a.assert_hits_async(1).await;
        assert_eq!(cache.read(&problem("A")).unwrap()[0].input, "1\n");
    }

    #[tokio::test]
    async fn response_names_its_problem() {
        let server = MockServer::start_async().await;
        let target = server.url("/contest/1/problem/B");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/b-old");
                then.status(302).header("Location", target.as_str());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/B");
                then.status(200).body(page("7", "49"));
            })
            .await;
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let session = Session::new().unwrap();
        let downloader = Downloader::new(&session, &cache, Concurrency::Bounded(1));
        let ret = downloader
            .retrieve_contest(&contest(), vec![server.url("/contest/1/problem/b-old")], false)
            .await
            .unwrap();
        assert_eq!(ret.stored, vec!["B".to_string()]);
        assert_eq!(cache.read(&problem("B")).unwrap()[0].output, "49\n");
        assert!(!cache.path(&problem("b-old")).exists());
    }

    #[tokio::test]
    async fn spoj_has_no_contest_mode() {
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let session = Session::new().unwrap();
        let downloader = Downloader::new(&session, &cache, Concurrency::default());
        let id = ProblemIdentity::contest(Site::Spoj, "classical").unwrap();
        let err = downloader.download_contest(&id, false).await.unwrap_err();
        assert!(matches!(err.kind(), Kind::UnsupportedMode));
    }

    #[tokio::test]
    async fn single_problem_is_fetched_and_stored() {
        let server = MockServer::start_async().await;
        let a = server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/A");
                then.status(200).body(page("1 2<br>3 4", "3<br>7"));
            })
            .await;
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let session = Session::new().unwrap();
        let downloader =
            Downloader::new(&session, &cache, Concurrency::default()).with_base_url(server.base_url());

        assert_eq!(
            downloader.download_problem(&problem("A"), false).await.unwrap(),
            Fetched::Stored(1)
        );
        a.assert_hits_async(1).await;
        assert_eq!(
            cache.read(&problem("A")).unwrap(),
            vec![TestCase {
                index: 0,
                input: "1 2\n3 4\n".to_string(),
                output: "3\n7\n".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn single_problem_http_error_is_fatal() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/Z");
                then.status(404);
            })
            .await;
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let session = Session::new().unwrap();
        let downloader =
            Downloader::new(&session, &cache, Concurrency::default()).with_base_url(server.base_url());

        let err = downloader.download_problem(&problem("Z"), false).await.unwrap_err();
        assert!(matches!(err.kind(), Kind::Status(404)));
        assert!(cache.read(&problem("Z")).unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn contest_listing_drives_retrieval() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1");
                then.status(200).body(
                    r#"<table class="problems"><tr><td class="id"><a href="/contest/1/problem/A">A</a></td></tr></table>"#,
                );
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/contest/1/problem/A");
                then.status(200).body(page("4", "16"));
            })
            .await;
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        let session = Session::new().unwrap();
        let downloader =
            Downloader::new(&session, &cache, Concurrency::default()).with_base_url(server.base_url());

        let ret = downloader.download_contest(&contest(), false).await.unwrap();
        assert_eq!(ret.stored, vec!["A".to_string()]);
        assert_eq!(cache.read(&problem("A")).unwrap()[0].output, "16\n");
    }

    #[tokio::test]
    async fn cached_problem_is_not_fetched() {
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        cache.ensure(&problem("A")).unwrap();
        let session = Session::new().unwrap();
        let downloader = Downloader::new(&session, &cache, Concurrency::default());
        assert_eq!(
            downloader.download_problem(&problem("A"), false).await.unwrap(),
            Fetched::Cached
        );
    }
}
