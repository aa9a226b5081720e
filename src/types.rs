use std::path::PathBuf;
use std::process::ExitStatus;

/// Which side of the comparison a profile drives.
///
/// The thread ceiling lives inside `UnderTest` because it has no meaning
/// for a stock awk: the command matrix and the report format both switch on
/// this tag and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// The parallel awk build; runs every test case once per thread count
    /// from 1 up to `max_threads`.
    UnderTest { max_threads: u32 },
    /// A reference awk used as a baseline; no thread flag.
    Reference,
}

/// Immutable configuration for one benchmark pass.
#[derive(Debug, Clone)]
pub struct BenchmarkProfile {
    pub kind: ToolKind,
    pub executable: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Awk program files, resolved relative to the working directory.
    pub test_cases: Vec<String>,
}

/// One fully-formed child command line. Built once, executed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub executable: PathBuf,
    pub arguments: Vec<String>,
    pub threads: Option<u32>,
    pub test_case: String,
}

impl Invocation {
    /// Render the command the way a user would type it in a shell, quoting
    /// only the arguments that need it. Used for logs and `--dry-run`.
    pub fn command_line(&self) -> String {
        let mut out = quote_arg(&self.executable.to_string_lossy());
        for arg in &self.arguments {
            out.push(' ');
            out.push_str(&quote_arg(arg));
        }
        out
    }
}

fn quote_arg(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=".contains(c));
    if plain {
        s.to_string()
    } else {
        shell_escape_single_quote(s)
    }
}

/// The recorded outcome of executing one invocation.
#[derive(Debug)]
pub struct Measurement {
    pub test_case: String,
    pub threads: Option<u32>,
    /// User CPU seconds charged to the child, clamped to >= 0.
    pub cpu_seconds: f64,
    pub status: ExitStatus,
}

/// Wraps a string in single quotes, escaping internal single quotes as `'\''`.
pub fn shell_escape_single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}
