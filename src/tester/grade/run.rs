extern crate tokio;

use super::language::Program;
use crate::error::Result;
use log::debug;
use std::{fs::File, path::Path, process::Stdio, time::Duration};
use tokio::{io::AsyncWriteExt, process::Command, time::timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Status {
    Exited(i32),
    Signaled,
    TimedOut,
}

/// Runs `program` once, feeding `input` on stdin and sending stdout to
/// `output`. The whole run, including the stdin write, is bounded by `limit`.
pub(super) async fn execute(
    program: &Program,
    input: &str,
    output: &Path,
    limit: Duration,
) -> Result<Status> {
    let stdout = File::create(output)?;
    let mut command = Command::new(&program.program);
    command
        .args(&program.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::null())
        .kill_on_drop(true);
    // own group, so whatever the program forks goes down with it
    #[cfg(unix)]
    command.process_group(0);
    let mut child = command.spawn()?;
    let mut stdin = child.stdin.take();

    let waited = timeout(limit, async {
        if let Some(pipe) = stdin.as_mut() {
            // programs may exit without reading all of their input
            if let Err(e) = pipe.write_all(input.as_bytes()).await {
                debug!("Writing stdin: {}", e);
            }
        }
        drop(stdin.take());
        child.wait().await
    })
    .await;

    match waited {
        Ok(status) => Ok(match status?.code() {
            Some(code) => Status::Exited(code),
            None => Status::Signaled,
        }),
        Err(_) => {
            debug!("Killing {:?} after {:?}", program.program, limit);
            #[cfg(unix)]
            if let Some(id) = child.id() {
                kill_group(id);
            }
            if let Err(e) = child.kill().await {
                debug!("Kill failed: {}", e);
            }
            Ok(Status::TimedOut)
        }
    }
}

#[cfg(unix)]
fn kill_group(leader: u32) {
    use nix::{
        sys::signal::{killpg, Signal},
        unistd::Pid,
    };
    if let Err(e) = killpg(Pid::from_raw(leader as i32), Signal::SIGKILL) {
        debug!("Killing process group {}: {}", leader, e);
    }
}
