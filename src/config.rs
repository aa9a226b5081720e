use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::BenchError;
use crate::types::{BenchmarkProfile, ToolKind};

/// Thread ceiling used when an under-test profile does not set one.
const DEFAULT_MAX_THREADS: u32 = 8;

/// On-disk session file, before validation. Top-level keys are session-wide
/// defaults; each `[[profiles]]` entry may override them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct SessionFile {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    test_cases: Option<Vec<String>>,
    #[serde(default)]
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ProfileEntry {
    kind: KindName,
    executable: PathBuf,
    max_threads: Option<u32>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    test_cases: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum KindName {
    UnderTest,
    Reference,
}

/// Load a session file and resolve it into runnable profiles.
pub fn load(path: &Path) -> Result<Vec<BenchmarkProfile>, BenchError> {
    let text = std::fs::read_to_string(path).map_err(|source| BenchError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<Vec<BenchmarkProfile>, BenchError> {
    let file: SessionFile = toml::from_str(text).map_err(|source| BenchError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    if file.profiles.is_empty() {
        return Err(BenchError::NoProfiles {
            path: path.to_path_buf(),
        });
    }

    let mut profiles = Vec::with_capacity(file.profiles.len());
    for entry in file.profiles {
        let executable = entry.executable.display().to_string();

        let kind = match entry.kind {
            KindName::UnderTest => {
                let max_threads = entry.max_threads.unwrap_or(DEFAULT_MAX_THREADS);
                if max_threads == 0 {
                    return Err(BenchError::ZeroThreads { executable });
                }
                ToolKind::UnderTest { max_threads }
            }
            KindName::Reference => {
                if entry.max_threads.is_some() {
                    return Err(BenchError::ThreadsOnReference { executable });
                }
                ToolKind::Reference
            }
        };

        let input = entry
            .input
            .or_else(|| file.input.clone())
            .ok_or_else(|| BenchError::MissingKey {
                executable: executable.clone(),
                key: "input",
            })?;
        let output = entry
            .output
            .or_else(|| file.output.clone())
            .ok_or_else(|| BenchError::MissingKey {
                executable: executable.clone(),
                key: "output",
            })?;
        let test_cases = entry
            .test_cases
            .or_else(|| file.test_cases.clone())
            .ok_or_else(|| BenchError::MissingKey {
                executable: executable.clone(),
                key: "test-cases",
            })?;

        if test_cases.is_empty() {
            return Err(BenchError::NoTestCases { executable });
        }

        profiles.push(BenchmarkProfile {
            kind,
            executable: entry.executable,
            input,
            output,
            test_cases,
        });
    }

    Ok(profiles)
}
