//! External command execution with a bounded wait.
//!
//! Resolvers hand an exact command line to an [`Executor`] and get back the
//! captured standard output. A command that does not exist is an expected
//! condition and yields empty output; a command that outlives its timeout is
//! killed and reported as [`ExecutionError::Timeout`].

use std::io::{self, Read};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

/// Default upper bound on a single command's run time.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Exit status `sh` reports when the command could not be found.
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Failures running an external command.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("command `{command}` timed out after {}s", timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },

    #[error("failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Runs command lines and captures their standard output.
pub trait Executor: Send + Sync {
    /// Executes `command` and returns its standard output with trailing
    /// whitespace removed.
    ///
    /// `timeout` overrides the executor's default bound when set.
    fn execute(&self, command: &str, timeout: Option<Duration>) -> Result<String, ExecutionError>;
}

/// Executes commands through `sh -c`.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl Executor for ShellExecutor {
    fn execute(&self, command: &str, timeout: Option<Duration>) -> Result<String, ExecutionError> {
        let timeout = timeout.unwrap_or(self.timeout);
        debug!("executing command: {}", command);

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a timeout can kill everything the shell started.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("could not spawn shell for `{}`: {}", command, e);
                return Ok(String::new());
            }
            Err(source) => {
                return Err(ExecutionError::Io {
                    command: command.to_string(),
                    source,
                });
            }
        };

        // Drain both pipes on their own threads so a chatty child can't block
        // on a full pipe while we poll it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let timed_out = |child: &mut Child| {
            kill_group(child);
            ExecutionError::Timeout {
                command: command.to_string(),
                timeout,
            }
        };

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        return Err(timed_out(&mut child));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(source) => {
                    kill_group(&mut child);
                    return Err(ExecutionError::Io {
                        command: command.to_string(),
                        source,
                    });
                }
            }
        };

        // Background processes started by the shell may still hold the pipes.
        let (Some(out), Some(err)) = (collect(&stdout, deadline), collect(&stderr, deadline)) else {
            return Err(timed_out(&mut child));
        };
        let out = String::from_utf8_lossy(&out).into_owned();
        let err = String::from_utf8_lossy(&err).into_owned();

        if status.code() == Some(EXIT_COMMAND_NOT_FOUND) {
            debug!("command not found: {}", command);
            return Ok(String::new());
        }
        if !status.success() {
            debug!("command `{}` exited with {}: {}", command, status, err.trim());
        }

        Ok(out.trim_end().to_string())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Waits for a drained pipe until `deadline`; `None` when it is still open.
fn collect(pipe: &Receiver<Vec<u8>>, deadline: Instant) -> Option<Vec<u8>> {
    match pipe.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// Kills the child's whole process group and reaps the child.
#[cfg(unix)]
fn kill_group(child: &mut Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Err(e) = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
        debug!("killpg({}) failed: {}", child.id(), e);
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
