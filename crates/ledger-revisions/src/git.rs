//! Git CLI implementation of [`RevisionSource`].

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::RevisionError;
use crate::source::RevisionSource;

const ENV_GIT_BIN: &str = "BENCH_GIT_BIN";

/// Process execution seam, so tests can substitute canned output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<std::process::Output>;
}

/// Default runner that spawns real processes.
#[derive(Debug, Default)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<std::process::Output> {
        Command::new(program).args(args).output()
    }
}

/// Revision source backed by the `git` command-line tool.
///
/// The binary defaults to `git` on PATH and can be overridden with the
/// `BENCH_GIT_BIN` environment variable.
pub struct GitCli<R: CommandRunner = ProcessCommandRunner> {
    runner: R,
    repo: PathBuf,
    binary: PathBuf,
}

impl GitCli<ProcessCommandRunner> {
    /// Wrap the repository at `repo` using the real git binary.
    pub fn new(repo: PathBuf) -> Self {
        let binary = std::env::var_os(ENV_GIT_BIN)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("git"));
        Self::with_runner(ProcessCommandRunner, repo, binary)
    }
}

impl<R: CommandRunner> GitCli<R> {
    pub fn with_runner(runner: R, repo: PathBuf, binary: PathBuf) -> Self {
        Self {
            runner,
            repo,
            binary,
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, RevisionError> {
        let mut full_args: Vec<OsString> = vec![OsString::from("-C"), self.repo.clone().into()];
        full_args.extend(args.iter().map(OsString::from));

        let program = self.binary.to_string_lossy();
        debug!(binary = %program, ?args, "Running git");

        let output = self
            .runner
            .run(&program, &full_args)
            .map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => RevisionError::GitUnavailable(format!(
                    "`{program}` was not found; install git or set {ENV_GIT_BIN}"
                )),
                _ => RevisionError::GitUnavailable(format!("failed to execute `{program}`: {error}")),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            let detail = if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            };
            return Err(RevisionError::CommandFailed {
                command: format!("{program} {}", args.join(" ")),
                detail,
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RevisionError::InvalidOutput(format!("non-UTF-8 git output: {e}")))
    }
}

impl<R: CommandRunner> RevisionSource for GitCli<R> {
    fn list_commits(&self, branch: &str) -> Result<Vec<String>, RevisionError> {
        let stdout = self.run_git(&["rev-list", branch])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn commit_timestamp(&self, sha: &str) -> Result<DateTime<Utc>, RevisionError> {
        let stdout = self.run_git(&["show", "-s", "--format=%cI", sha])?;
        let text = stdout.trim();
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                RevisionError::InvalidOutput(format!("commit timestamp {text:?} for {sha}: {e}"))
            })
    }

    fn resolve_head(&self) -> Result<String, RevisionError> {
        let stdout = self.run_git(&["rev-parse", "HEAD"])?;
        let sha = stdout.trim();
        if sha.is_empty() || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RevisionError::Unresolved(format!("HEAD -> {sha:?}")));
        }
        Ok(sha.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct StubRunner {
        calls: Mutex<Vec<(String, Vec<OsString>)>>,
        results: Mutex<VecDeque<io::Result<std::process::Output>>>,
    }

    impl StubRunner {
        fn with_results(results: Vec<io::Result<std::process::Output>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                results: Mutex::new(results.into()),
            }
        }
    }

    impl CommandRunner for StubRunner {
        fn run(&self, program: &str, args: &[OsString]) -> io::Result<std::process::Output> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_owned(), args.to_vec()));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "missing stubbed command output",
                    ))
                })
        }
    }

    fn output_with_status(code: i32, stdout: &[u8], stderr: &[u8]) -> std::process::Output {
        use std::os::unix::process::ExitStatusExt;
        std::process::Output {
            status: std::process::ExitStatus::from_raw(code),
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
        }
    }

    fn git_with(results: Vec<io::Result<std::process::Output>>) -> GitCli<StubRunner> {
        GitCli::with_runner(
            StubRunner::with_results(results),
            PathBuf::from("/src/server"),
            PathBuf::from("git"),
        )
    }

    #[test]
    fn test_list_commits_parses_lines_newest_first() {
        let git = git_with(vec![Ok(output_with_status(
            0,
            b"c3c3c3\nc2c2c2\nc1c1c1\n",
            &[],
        ))]);

        let commits = git.list_commits("unstable").unwrap();
        assert_eq!(commits, vec!["c3c3c3", "c2c2c2", "c1c1c1"]);

        let calls = git.runner.calls.lock().unwrap();
        assert_eq!(calls[0].0, "git");
        assert_eq!(
            calls[0].1,
            vec![
                OsString::from("-C"),
                OsString::from("/src/server"),
                OsString::from("rev-list"),
                OsString::from("unstable"),
            ]
        );
    }

    #[test]
    fn test_commit_timestamp_parses_iso8601() {
        let git = git_with(vec![Ok(output_with_status(
            0,
            b"2024-01-15T10:30:00+02:00\n",
            &[],
        ))]);

        let ts = git.commit_timestamp("abc123").unwrap();
        assert_eq!(ts, "2024-01-15T08:30:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_commit_timestamp_rejects_garbage() {
        let git = git_with(vec![Ok(output_with_status(0, b"not a date\n", &[]))]);
        let err = git.commit_timestamp("abc123").unwrap_err();
        assert!(matches!(err, RevisionError::InvalidOutput(_)));
    }

    #[test]
    fn test_resolve_head() {
        let sha = "f".repeat(40);
        let git = git_with(vec![Ok(output_with_status(
            0,
            format!("{sha}\n").as_bytes(),
            &[],
        ))]);
        assert_eq!(git.resolve_head().unwrap(), sha);
    }

    #[test]
    fn test_failed_command_carries_stderr() {
        let git = git_with(vec![Ok(output_with_status(
            1 << 8,
            &[],
            b"fatal: bad revision 'nope'\n",
        ))]);

        let err = git.list_commits("nope").unwrap_err();
        match err {
            RevisionError::CommandFailed { command, detail } => {
                assert!(command.contains("rev-list"));
                assert!(detail.contains("bad revision"));
            }
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let git = git_with(vec![Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no such file",
        ))]);

        let err = git.resolve_head().unwrap_err();
        assert!(matches!(err, RevisionError::GitUnavailable(_)));
    }
}
