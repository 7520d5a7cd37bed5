//! Command executor — spawns a DNS tool, merges its stderr into stdout, waits
//! for it to exit and hands the captured text back as a chat reply.
//!
//! `ProcessRunner` is the seam between the handlers and the OS: `SystemRunner`
//! spawns real processes, tests substitute recording fakes. `execute` is the
//! single place where a launch failure is turned into user-facing text.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::error::{DnsUtilsError, Result};

/// Launches an external program and returns its combined output.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and block until it exits.
    ///
    /// A non-zero exit status is not an error. Only failing to start the
    /// process yields `DnsUtilsError::ProcessLaunch`.
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runs programs resolved on the host's `PATH`, never through a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let start = Instant::now();
        let launch_err = |source: std::io::Error| DnsUtilsError::ProcessLaunch {
            tool: program.to_string(),
            source,
        };

        // stdout and stderr share one pipe so interleaving is preserved.
        let (mut reader, writer) = std::io::pipe().map_err(launch_err)?;
        let stderr_writer = writer.try_clone().map_err(launch_err)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer);
        let spawned = command.spawn();
        // Command still owns the write ends; EOF only arrives once they are closed.
        drop(command);
        let mut child = spawned.map_err(launch_err)?;

        let mut captured = Vec::new();
        let read_result = reader.read_to_end(&mut captured);
        let status = child.wait();
        read_result.map_err(launch_err)?;
        let status = status.map_err(launch_err)?;

        tracing::info!(
            command = %program,
            args = ?args,
            exit_code = %status.code().unwrap_or(-1),
            duration_ms = %start.elapsed().as_millis(),
            "DNS tool invocation"
        );

        Ok(String::from_utf8_lossy(&captured).into_owned())
    }
}

/// Run `tool` with `args` and return its output, or a failure message.
///
/// Never fails: launch errors are logged and rendered as
/// `Failed to run <tool>: <error detail>`.
pub fn execute(runner: &dyn ProcessRunner, tool: &str, args: &[String]) -> String {
    match runner.run(tool, args) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(tool = %tool, args = ?args, error = %e, "failed to run DNS tool");
            format!("Failed to run {}: {}", tool, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingRunner, RecordingRunner, capture_logs};

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_system_runner_captures_stdout() {
        let out = SystemRunner.run("echo", &strings(&["hello", "world"])).unwrap();
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn test_system_runner_merges_stderr_in_order() {
        let script = "echo one; echo two >&2; echo three";
        let out = SystemRunner.run("sh", &strings(&["-c", script])).unwrap();
        assert_eq!(out, "one\ntwo\nthree\n");
    }

    #[test]
    fn test_system_runner_nonzero_exit_is_not_an_error() {
        let out = SystemRunner
            .run("sh", &strings(&["-c", "echo 'no servers could be reached' >&2; exit 9"]))
            .unwrap();
        assert_eq!(out, "no servers could be reached\n");
    }

    #[test]
    fn test_system_runner_does_not_interpret_shell_metacharacters() {
        let out = SystemRunner
            .run("echo", &strings(&["a;", "rm", "-rf", "/", "|", "$(id)", ">out"]))
            .unwrap();
        assert_eq!(out, "a; rm -rf / | $(id) >out\n");
    }

    #[test]
    fn test_system_runner_missing_program_is_launch_error() {
        let result = SystemRunner.run("definitely-not-a-real-dns-tool", &[]);
        assert!(
            matches!(result, Err(DnsUtilsError::ProcessLaunch { ref tool, .. }) if tool == "definitely-not-a-real-dns-tool")
        );
    }

    #[test]
    fn test_execute_missing_program_returns_failure_text() {
        let reply = execute(&SystemRunner, "definitely-not-a-real-dns-tool", &[]);
        assert!(
            reply.starts_with("Failed to run definitely-not-a-real-dns-tool: "),
            "unexpected reply: {}",
            reply
        );
    }

    #[test]
    fn test_execute_returns_output_verbatim() {
        let runner = RecordingRunner::with_output(";; ANSWER SECTION:\n");
        let reply = execute(&runner, "dig", &strings(&["example.com", "A"]));
        assert_eq!(reply, ";; ANSWER SECTION:\n");
        assert_eq!(
            runner.calls(),
            vec![("dig".to_string(), strings(&["example.com", "A"]))]
        );
    }

    #[test]
    fn test_execute_formats_launch_failure() {
        let runner = FailingRunner::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let reply = execute(&runner, "host", &strings(&["example.com"]));
        assert_eq!(reply, "Failed to run host: Permission denied");
    }

    #[test]
    fn test_execute_logs_launch_failure_at_error_level() {
        let runner = FailingRunner::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let (reply, logs) = capture_logs(|| execute(&runner, "dig", &strings(&["example.com"])));

        assert_eq!(reply, "Failed to run dig: No such file or directory");
        let line = logs
            .lines()
            .find(|l| l.contains("failed to run DNS tool"))
            .unwrap_or_else(|| panic!("no launch failure event in logs: {}", logs));
        assert!(line.contains("ERROR"), "wrong level: {}", line);
        assert!(line.contains("tool=dig"), "missing tool: {}", line);
        assert!(line.contains("error=No such file or directory"), "missing OS error: {}", line);
    }

    #[test]
    fn test_execute_success_logs_no_error() {
        let runner = RecordingRunner::with_output("ok\n");
        let (_, logs) = capture_logs(|| execute(&runner, "host", &strings(&["example.com"])));
        assert!(!logs.contains("ERROR"), "unexpected error event: {}", logs);
    }
}
