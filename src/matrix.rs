use crate::types::{BenchmarkProfile, Invocation, ToolKind};

/// Expand a profile into the ordered command matrix.
///
/// Under-test profiles run every test case at every thread count from 1 to
/// the ceiling, concurrency-major: all cases at `-n 1` before any at `-n 2`.
/// Reference profiles run each test case exactly once, with no thread flag.
/// The input file is always the final positional argument.
pub fn build(profile: &BenchmarkProfile) -> Vec<Invocation> {
    let input = profile.input.to_string_lossy().into_owned();

    match profile.kind {
        ToolKind::UnderTest { max_threads } => {
            let mut matrix =
                Vec::with_capacity(max_threads as usize * profile.test_cases.len());
            for threads in 1..=max_threads {
                for case in &profile.test_cases {
                    matrix.push(Invocation {
                        executable: profile.executable.clone(),
                        arguments: vec![
                            "-n".to_string(),
                            threads.to_string(),
                            "-f".to_string(),
                            case.clone(),
                            input.clone(),
                        ],
                        threads: Some(threads),
                        test_case: case.clone(),
                    });
                }
            }
            matrix
        }
        ToolKind::Reference => profile
            .test_cases
            .iter()
            .map(|case| Invocation {
                executable: profile.executable.clone(),
                arguments: vec!["-f".to_string(), case.clone(), input.clone()],
                threads: None,
                test_case: case.clone(),
            })
            .collect(),
    }
}
