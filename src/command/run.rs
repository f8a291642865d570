extern crate termcolor;

use crate::report;
use cp_tester::{
    error::Result,
    grade::{Grading, Outcome},
    tester::Tester,
};
use std::{io::Write, path::Path};
use termcolor::StandardStream;

pub async fn run(stdout: &mut StandardStream, tester: &Tester<'_>, solution: &Path) -> Result<()> {
    write_progress!(stdout, "Running", "{}", solution.display());
    let (identity, grading) = tester.run_solution(solution).await?;
    match grading {
        Grading::CompileError(log) => {
            write_error!(
                stdout,
                Outcome::CompileError.label(),
                "{} failed to compile",
                solution.display()
            );
            writeln!(stdout, "{}", log.trim_end())?;
        }
        Grading::Finished(results) => {
            writeln!(stdout, "{}", report::table(&results))?;
            let passed = results
                .iter()
                .filter(|r| r.outcome == Outcome::Accepted)
                .count();
            if passed == results.len() {
                write_ok!(stdout, "Passed", "{}: all {} test cases", identity, passed);
            } else {
                write_warn!(
                    stdout,
                    "Failed",
                    "{}: {} of {} test cases passed",
                    identity,
                    passed,
                    results.len()
                );
            }
        }
    }
    Ok(())
}
