use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::errors::BenchError;
use crate::types::{BenchmarkProfile, Measurement, ToolKind};

/// Format one report line for a measurement.
///
/// The wording is the historical report format and analysis scripts key off
/// it, so successful runs reproduce it exactly. A run whose child did not
/// exit cleanly additionally carries the exit status at the end of the
/// line, so failed runs can be told apart later.
pub fn format_line(measurement: &Measurement, profile: &BenchmarkProfile) -> String {
    let mut line = match profile.kind {
        ToolKind::UnderTest { .. } => format!(
            "File: {} Threads Used: {} Time it took: {}",
            measurement.test_case,
            measurement.threads.unwrap_or(1),
            measurement.cpu_seconds,
        ),
        ToolKind::Reference => format!(
            "Run With: {} File: {} Time it took: {}",
            profile.executable.display(),
            measurement.test_case,
            measurement.cpu_seconds,
        ),
    };

    if !measurement.status.success() {
        match measurement.status.code() {
            Some(code) => line.push_str(&format!(" Exit Status: {code}")),
            // Killed by a signal; ExitStatus renders e.g. "signal: 9 (SIGKILL)".
            None => line.push_str(&format!(" Exit Status: {}", measurement.status)),
        }
    }

    line.push('\n');
    line
}

/// Append one measurement line to an already-open sink.
pub fn record<W: Write>(
    measurement: &Measurement,
    profile: &BenchmarkProfile,
    sink: &mut W,
) -> Result<(), BenchError> {
    sink.write_all(format_line(measurement, profile).as_bytes())
        .map_err(|source| BenchError::ReportWrite {
            path: profile.output.clone(),
            source,
        })
}

/// Open the profile's report sink.
///
/// An under-test pass starts a fresh report, truncating whatever a previous
/// session left behind; reference passes append so their rows land under
/// the primary tool's in a shared report.
pub fn open_report(profile: &BenchmarkProfile) -> Result<File, BenchError> {
    let mut options = OpenOptions::new();
    match profile.kind {
        ToolKind::UnderTest { .. } => options.write(true).create(true).truncate(true),
        ToolKind::Reference => options.append(true).create(true),
    };
    options
        .open(&profile.output)
        .map_err(|source| BenchError::ReportOpen {
            path: profile.output.clone(),
            source,
        })
}
