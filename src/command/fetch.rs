extern crate termcolor;
extern crate tokio;

use cp_tester::{
    cache::Cache,
    downloader::{Downloader, Fetched, Retrieval},
    error::Result,
    settings::Settings,
    types::ProblemIdentity,
};
use termcolor::StandardStream;
use tokio::signal;

enum Done {
    Problem(Fetched),
    Contest(Retrieval),
}

/// Downloads one problem, or a whole contest when `identity` names no
/// problem. Returns `false` if interrupted, after dropping whatever the
/// interrupted download had stored.
pub async fn fetch(
    stdout: &mut StandardStream,
    downloader: &Downloader<'_>,
    cache: &Cache,
    settings: &Settings,
    identity: &ProblemIdentity,
    force: bool,
) -> Result<bool> {
    if let Some(dir) = settings.prepare_workdir(identity)? {
        write_info!(stdout, "Workdir", "{}", dir.display());
    }
    write_progress!(stdout, "Fetching", "{}", identity);
    let job = async {
        match identity.problem() {
            Some(_) => downloader
                .download_problem(identity, force)
                .await
                .map(Done::Problem),
            None => downloader
                .download_contest(identity, force)
                .await
                .map(Done::Contest),
        }
    };
    let done = tokio::select! {
        ret = job => Some(ret?),
        _ = signal::ctrl_c() => None,
    };

    match done {
        None => {
            cache.purge(identity)?;
            write_warn!(stdout, "Abort", "Interrupted, removed cache of {}", identity);
            return Ok(false);
        }
        Some(Done::Problem(Fetched::Cached)) => {
            write_info!(stdout, "Cached", "{}, use --force to download again", identity)
        }
        Some(Done::Problem(Fetched::Stored(0))) => {
            write_warn!(stdout, "Empty", "No sample test cases found for {}", identity)
        }
        Some(Done::Problem(Fetched::Stored(n))) => {
            write_ok!(stdout, "Fetched", "{} test cases for {}", n, identity)
        }
        Some(Done::Contest(ret)) => {
            for link in &ret.failed {
                write_warn!(stdout, "Failed", "{}", link);
            }
            if !ret.skipped.is_empty() {
                write_info!(stdout, "Cached", "{} problems skipped", ret.skipped.len());
            }
            write_ok!(
                stdout,
                "Fetched",
                "{} problems of {}: {}",
                ret.stored.len(),
                identity,
                ret.stored.join(" ")
            );
        }
    }
    Ok(true)
}
