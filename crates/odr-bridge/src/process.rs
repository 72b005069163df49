//! Blocking subprocess execution with a wall-clock limit.

use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::{BridgeError, BridgeResult};

const POLL: Duration = Duration::from_millis(20);

/// Run `cmd` to completion, sending stdout and stderr to `console`.
///
/// After `timeout` the child is killed and reaped.  A non-zero exit status
/// is an error carrying the last console line.
pub fn run_with_timeout(cmd: &mut Command, console: &Path, timeout: Duration) -> BridgeResult<()> {
    let out = File::create(console)?;
    let err = out.try_clone()?;
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::from(out))
        .stderr(Stdio::from(err))
        .spawn()
        .map_err(|source| BridgeError::Spawn {
            program: cmd.get_program().to_string_lossy().into_owned(),
            source,
        })?;

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            if status.success() {
                return Ok(());
            }
            let detail = fs::read_to_string(console)
                .ok()
                .and_then(|s| s.lines().rev().find(|l| !l.trim().is_empty()).map(str::to_owned))
                .map(|l| format!(": {l}"))
                .unwrap_or_default();
            return Err(BridgeError::Exit { status: status.to_string(), detail });
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BridgeError::Timeout { millis: timeout.as_millis() });
        }
        thread::sleep(POLL);
    }
}
