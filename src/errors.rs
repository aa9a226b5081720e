use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file {path} defines no profiles")]
    NoProfiles { path: PathBuf },

    #[error("Profile '{executable}': no {key} given (set it on the profile or at the top of the config)")]
    MissingKey {
        executable: String,
        key: &'static str,
    },

    #[error("Profile '{executable}': test-cases must not be empty")]
    NoTestCases { executable: String },

    #[error("Profile '{executable}': max-threads must be at least 1")]
    ZeroThreads { executable: String },

    #[error("Profile '{executable}': max-threads is only valid for kind = \"under-test\"")]
    ThreadsOnReference { executable: String },

    #[error("Executable {path} does not exist")]
    ExecutableNotFound { path: PathBuf },

    #[error("Input file {path} does not exist or is not a regular file")]
    InputNotFound { path: PathBuf },

    #[error("Test case file {path} does not exist")]
    TestCaseNotFound { path: PathBuf },

    #[error("Failed to spawn {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to sample child CPU usage: {source}")]
    ResourceSampling { source: std::io::Error },

    #[error("Failed to open report file {path}: {source}")]
    ReportOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report file {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
