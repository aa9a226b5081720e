use std::io::Write;
use std::path::Path;

use log::{error, info, warn};

use crate::errors::BenchError;
use crate::exec;
use crate::matrix;
use crate::report;
use crate::types::BenchmarkProfile;

/// Outcome of one profile's pass.
#[derive(Debug, Default)]
pub struct ProfileSummary {
    pub runs: usize,
    /// Runs whose child exited non-zero or was killed. Still recorded.
    pub failed_runs: usize,
}

/// Outcome of a whole session.
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub profiles_run: usize,
    pub profiles_skipped: usize,
    pub runs: usize,
    pub failed_runs: usize,
}

impl SessionSummary {
    pub fn clean(&self) -> bool {
        self.profiles_skipped == 0 && self.failed_runs == 0
    }
}

/// Check everything a profile needs before any child is spawned.
///
/// Runs before the report sink is opened, so a misconfigured under-test
/// profile cannot truncate an existing report.
pub fn validate(profile: &BenchmarkProfile) -> Result<(), BenchError> {
    // A bare executable name is resolved through PATH at spawn time; only
    // an explicit path can be checked up front.
    if profile.executable.components().count() > 1 && !profile.executable.is_file() {
        return Err(BenchError::ExecutableNotFound {
            path: profile.executable.clone(),
        });
    }

    if !profile.input.is_file() {
        return Err(BenchError::InputNotFound {
            path: profile.input.clone(),
        });
    }

    for case in &profile.test_cases {
        let path = Path::new(case);
        if !path.is_file() {
            return Err(BenchError::TestCaseNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Drive one profile: validate, acquire the report sink, run the command
/// matrix strictly in order, record one line per run.
///
/// The sink is a scoped `File`; every early return drops and closes it.
pub fn run_profile(profile: &BenchmarkProfile) -> Result<ProfileSummary, BenchError> {
    validate(profile)?;

    let invocations = matrix::build(profile);
    let mut sink = report::open_report(profile)?;
    let mut summary = ProfileSummary::default();

    info!(
        "benchmarking {}: {} runs -> {}",
        profile.executable.display(),
        invocations.len(),
        profile.output.display()
    );

    for invocation in &invocations {
        info!("running: {}", invocation.command_line());
        let measurement = exec::execute(invocation)?;

        if !measurement.status.success() {
            warn!(
                "{} exited with {}; recording the run anyway",
                invocation.command_line(),
                measurement.status
            );
            summary.failed_runs += 1;
        }

        report::record(&measurement, profile, &mut sink)?;
        summary.runs += 1;
    }

    sink.flush().map_err(|source| BenchError::ReportWrite {
        path: profile.output.clone(),
        source,
    })?;

    Ok(summary)
}

/// Run profiles strictly one after another.
///
/// A profile that fails (validation, spawn, sampling, or report I/O) aborts
/// the session by default; with `keep_going` it is reported and skipped and
/// the remaining profiles still run.
pub fn run_session(
    profiles: &[BenchmarkProfile],
    keep_going: bool,
) -> Result<SessionSummary, BenchError> {
    let mut summary = SessionSummary::default();

    for profile in profiles {
        match run_profile(profile) {
            Ok(p) => {
                summary.profiles_run += 1;
                summary.runs += p.runs;
                summary.failed_runs += p.failed_runs;
            }
            Err(err) if keep_going => {
                error!("skipping {}: {}", profile.executable.display(), err);
                summary.profiles_skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolKind;
    use std::fs;
    use std::path::PathBuf;

    /// Build a profile whose input and test cases exist under `dir`.
    /// Test-case identifiers are absolute paths so the tests do not depend
    /// on the working directory.
    fn profile_in(dir: &Path, kind: ToolKind, executable: &Path) -> BenchmarkProfile {
        let input = dir.join("mybigdata.txt");
        fs::write(&input, "alpha 1 2\nbeta 3 4\n").unwrap();

        let mut test_cases = Vec::new();
        for name in ["tt.01", "tt.02"] {
            let case = dir.join(name);
            fs::write(&case, "{ print $1 }\n").unwrap();
            test_cases.push(case.to_string_lossy().into_owned());
        }

        BenchmarkProfile {
            kind,
            executable: executable.to_path_buf(),
            input,
            output: dir.join("results.txt"),
            test_cases,
        }
    }

    /// A stand-in awk that accepts any arguments and exits with `code`.
    #[cfg(unix)]
    fn stub_tool(dir: &Path, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fakeawk");
        fs::write(&path, format!("#!/bin/sh\nexit {code}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn validate_rejects_missing_input() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let mut p = profile_in(tmp.path(), ToolKind::Reference, Path::new("mawk"));
        p.input = tmp.path().join("gone.txt");

        match validate(&p) {
            Err(BenchError::InputNotFound { path }) => assert_eq!(path, p.input),
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_missing_test_case() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let mut p = profile_in(tmp.path(), ToolKind::Reference, Path::new("mawk"));
        let missing = tmp.path().join("tt.99");
        p.test_cases.push(missing.to_string_lossy().into_owned());

        match validate(&p) {
            Err(BenchError::TestCaseNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected TestCaseNotFound, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_missing_executable_path() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let exe = tmp.path().join("no-such-awk");
        let p = profile_in(tmp.path(), ToolKind::Reference, &exe);

        match validate(&p) {
            Err(BenchError::ExecutableNotFound { path }) => assert_eq!(path, exe),
            other => panic!("expected ExecutableNotFound, got {other:?}"),
        }
    }

    #[test]
    fn validate_defers_bare_names_to_spawn() {
        // "surely-not-installed-awk" has no path separator; resolution is
        // the OS's job at spawn time, so validation passes.
        let tmp = assert_fs::TempDir::new().unwrap();
        let p = profile_in(
            tmp.path(),
            ToolKind::Reference,
            Path::new("surely-not-installed-awk"),
        );
        assert!(validate(&p).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn run_profile_records_one_line_per_invocation() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let tool = stub_tool(tmp.path(), 0);
        let p = profile_in(tmp.path(), ToolKind::UnderTest { max_threads: 3 }, &tool);

        let summary = run_profile(&p).unwrap();
        assert_eq!(summary.runs, 6);
        assert_eq!(summary.failed_runs, 0);

        let text = fs::read_to_string(&p.output).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().all(|l| l.starts_with("File: ")));
        assert!(text.lines().all(|l| !l.contains("Exit Status")));
    }

    #[cfg(unix)]
    #[test]
    fn run_profile_truncates_previous_under_test_report() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let tool = stub_tool(tmp.path(), 0);
        let p = profile_in(tmp.path(), ToolKind::UnderTest { max_threads: 1 }, &tool);

        fs::write(&p.output, "stale content from an earlier session\n").unwrap();
        run_profile(&p).unwrap();

        let text = fs::read_to_string(&p.output).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("stale content"));
    }

    #[cfg(unix)]
    #[test]
    fn run_profile_appends_reference_report() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let tool = stub_tool(tmp.path(), 0);
        let p = profile_in(tmp.path(), ToolKind::Reference, &tool);

        fs::write(&p.output, "earlier line\n").unwrap();
        run_profile(&p).unwrap();

        let text = fs::read_to_string(&p.output).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("earlier line\n"));
        assert!(text.lines().skip(1).all(|l| l.starts_with("Run With: ")));
    }

    #[cfg(unix)]
    #[test]
    fn failed_children_are_counted_and_still_recorded() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let tool = stub_tool(tmp.path(), 3);
        let p = profile_in(tmp.path(), ToolKind::UnderTest { max_threads: 1 }, &tool);

        let summary = run_profile(&p).unwrap();
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.failed_runs, 2);

        let text = fs::read_to_string(&p.output).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.ends_with("Exit Status: 3")));
    }

    #[test]
    fn broken_profile_does_not_touch_the_report() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let mut p = profile_in(tmp.path(), ToolKind::UnderTest { max_threads: 2 }, Path::new("./pawk"));
        p.input = tmp.path().join("gone.txt");

        fs::write(&p.output, "previous results\n").unwrap();
        assert!(run_profile(&p).is_err());
        assert_eq!(
            fs::read_to_string(&p.output).unwrap(),
            "previous results\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn session_aborts_on_first_error_by_default() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let tool = stub_tool(tmp.path(), 0);

        let mut broken = profile_in(tmp.path(), ToolKind::Reference, &tool);
        broken.input = tmp.path().join("gone.txt");
        let good = profile_in(tmp.path(), ToolKind::Reference, &tool);

        assert!(run_session(&[broken, good.clone()], false).is_err());
        // The good profile never ran, so no report was produced.
        assert!(!good.output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn session_keep_going_skips_and_continues() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let tool = stub_tool(tmp.path(), 0);

        let mut broken = profile_in(tmp.path(), ToolKind::Reference, &tool);
        broken.input = tmp.path().join("gone.txt");
        let good = profile_in(tmp.path(), ToolKind::Reference, &tool);

        let summary = run_session(&[broken, good.clone()], true).unwrap();
        assert_eq!(summary.profiles_skipped, 1);
        assert_eq!(summary.profiles_run, 1);
        assert_eq!(summary.runs, 2);
        assert!(!summary.clean());

        let text = fs::read_to_string(&good.output).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
