extern crate clap;
extern crate pretty_env_logger;
extern crate termcolor;
extern crate tokio;

use clap::{crate_description, crate_name, value_parser, Arg, ArgMatches, Command};
use cp_tester::{
    cache::Cache,
    downloader::{Concurrency, Downloader},
    error::{Error, Kind, Result},
    session::Session,
    settings::Settings,
    tester::Tester,
    types::ProblemIdentity,
};
use pretty_env_logger::init_timed;
use std::{io, path::Path, path::PathBuf, process::exit};
use termcolor::{ColorChoice, StandardStream};

#[macro_use]
mod color;
mod command {
    pub mod fetch;
    pub mod run;
}
mod report;

const INTERRUPTED: i32 = 130;

fn cli() -> Command<'static> {
    Command::new(crate_name!())
        .about(crate_description!())
        .version(get_version!("version"))
        .long_version(get_version!("long_version"))
        .arg(
            Arg::new("site")
                .short('s')
                .long("site")
                .takes_value(true)
                .help("Judge to use: codeforces, codechef, spoj or hackerrank"),
        )
        .arg(
            Arg::new("contest")
                .short('c')
                .long("contest")
                .takes_value(true)
                .required_unless_present("run")
                .help("Contest code, or problem category on spoj"),
        )
        .arg(
            Arg::new("problem")
                .short('p')
                .long("problem")
                .takes_value(true)
                .help("Problem code; the whole contest is fetched without it"),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Download again even if test cases are cached"),
        )
        .arg(
            Arg::new("run")
                .short('r')
                .long("run")
                .takes_value(true)
                .value_name("SOURCE")
                .conflicts_with_all(&["contest", "problem"])
                .help("Check a solution at <dir>/<site>/<contest>/<problem>.<ext>"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .takes_value(true)
                .value_parser(value_parser!(usize))
                .help("Simultaneous downloads in contest mode, 0 for no limit"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .takes_value(true)
                .help("Where test cases and settings.yaml are kept"),
        )
}

fn cache_root(matches: &ArgMatches) -> Result<PathBuf> {
    match matches.value_of("cache-dir") {
        Some(d) => Ok(PathBuf::from(d)),
        None => Cache::default_root().ok_or_else(|| {
            Error::with_description(
                Kind::Io(io::Error::new(io::ErrorKind::NotFound, "no cache directory")),
                "use --cache-dir",
            )
        }),
    }
}

async fn launch(stdout: &mut StandardStream, matches: &ArgMatches) -> Result<bool> {
    let cache = Cache::new(cache_root(matches)?);
    let settings = Settings::load(&Settings::path(cache.root()))?;
    let session = Session::new()?;

    if let Some(solution) = matches.value_of("run") {
        let tester = Tester::new(&cache, &session, &settings);
        command::run::run(stdout, &tester, Path::new(solution)).await?;
        return Ok(true);
    }

    let site = settings.site(matches.value_of("site"))?;
    let contest = matches.value_of("contest").unwrap_or_default();
    let identity = ProblemIdentity::new(site, contest, matches.value_of("problem"))?;
    let concurrency = match matches.get_one::<usize>("jobs") {
        Some(&jobs) => Concurrency::from_jobs(jobs),
        None => settings.concurrency(),
    };
    let downloader = Downloader::new(&session, &cache, concurrency);
    command::fetch::fetch(
        stdout,
        &downloader,
        &cache,
        &settings,
        &identity,
        matches.is_present("force"),
    )
    .await
}

#[tokio::main]
async fn main() {
    init_timed();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let matches = cli().get_matches();
    match launch(&mut stdout, &matches).await {
        Ok(true) => (),
        Ok(false) => exit(INTERRUPTED),
        Err(e) => {
            write_error!(&mut stdout, "Error", "{}", e);
            exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contest_is_required_outside_run_mode() {
        assert!(cli().try_get_matches_from(&["cp-tester"]).is_err());
        assert!(cli()
            .try_get_matches_from(&["cp-tester", "-r", "a/codeforces/1/A.py"])
            .is_ok());
        assert!(cli()
            .try_get_matches_from(&["cp-tester", "-r", "A.py", "-c", "1"])
            .is_err());
    }

    #[test]
    fn jobs_must_be_a_number() {
        let m = cli()
            .try_get_matches_from(&["cp-tester", "-c", "1", "-j", "0"])
            .unwrap();
        assert_eq!(m.get_one::<usize>("jobs"), Some(&0));
        assert!(cli()
            .try_get_matches_from(&["cp-tester", "-c", "1", "-j", "many"])
            .is_err());
    }

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }
}
