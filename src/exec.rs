use std::io;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use log::debug;

use crate::errors::BenchError;
use crate::types::{Invocation, Measurement};

/// Serializes every execution in the process. The timing primitive below is
/// the process-wide cumulative child counter, so a second in-flight child
/// would leak its CPU time into whichever measurement window is open.
static EXEC_LOCK: Mutex<()> = Mutex::new(());

/// Run one invocation to completion and measure the user CPU time its child
/// consumed, as the delta of `getrusage(RUSAGE_CHILDREN)` around the run.
///
/// Stdout is discarded. The exit status is captured but not interpreted
/// here; the caller decides what a failed run means.
pub fn execute(invocation: &Invocation) -> Result<Measurement, BenchError> {
    let _guard = EXEC_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let before = children_cpu_seconds()?;

    let status = Command::new(&invocation.executable)
        .args(&invocation.arguments)
        .stdout(Stdio::null())
        .status()
        .map_err(|source| BenchError::Spawn {
            executable: invocation.executable.clone(),
            source,
        })?;

    let after = children_cpu_seconds()?;
    let cpu_seconds = (after - before).max(0.0);

    debug!("{}: {cpu_seconds}s child cpu", invocation.command_line());

    Ok(Measurement {
        test_case: invocation.test_case.clone(),
        threads: invocation.threads,
        cpu_seconds,
        status,
    })
}

/// Cumulative user CPU time, in seconds, charged to all children of this
/// process that have been waited on so far.
fn children_cpu_seconds() -> Result<f64, BenchError> {
    // SAFETY: rusage is a plain-old-data struct; zeroing all bytes is a
    // valid initial state.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: getrusage writes process-level resource usage into a
    // stack-allocated struct we own.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_CHILDREN, &mut usage) };
    if ret != 0 {
        return Err(BenchError::ResourceSampling {
            source: io::Error::last_os_error(),
        });
    }
    Ok(usage.ru_utime.tv_sec as f64 + usage.ru_utime.tv_usec as f64 / 1_000_000.0)
}
