use super::{DatabaseTool, DumpRequest, RestoreRequest, ToolError};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Environment variable carrying the catalog directory to the tool
pub const CATALOG_DIR_ENV: &str = "BACKUP_CATALOG_DIR";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a timed-out tool gets between SIGTERM and SIGKILL
const TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// Program and base arguments; request flags are appended after `args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: None,
        }
    }
}

/// [`DatabaseTool`] that shells out to configured commands.
pub struct CommandTool {
    dump: CommandSpec,
    restore: CommandSpec,
    timeout: Duration,
}

impl CommandTool {
    pub fn new(dump: CommandSpec, restore: CommandSpec, timeout: Duration) -> Self {
        Self {
            dump,
            restore,
            timeout,
        }
    }

    fn run(&self, spec: &CommandSpec, extra_args: &[String], catalog_dir: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .args(extra_args)
            .env(CATALOG_DIR_ENV, catalog_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0);

        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(
            program = %spec.program,
            args = ?spec.args.iter().chain(extra_args).collect::<Vec<_>>(),
            timeout_secs = self.timeout.as_secs(),
            "Invoking database tool"
        );

        let mut child = command.spawn().map_err(|e| ToolError::Spawn {
            program: spec.program.clone(),
            source: e,
        })?;

        // Helpers the tool forks share its pipes; the deadline covers them too
        let deadline = Instant::now() + self.timeout;

        // Drain both pipes so a chatty tool never blocks on a full buffer
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                tracing::warn!(
                    program = %spec.program,
                    pid = child.id(),
                    "Database tool timed out, terminating"
                );
                terminate(&mut child);
                return Err(ToolError::TimedOut {
                    program: spec.program.clone(),
                    timeout: self.timeout,
                });
            }
            Err(e) => {
                terminate(&mut child);
                return Err(ToolError::Io {
                    program: spec.program.clone(),
                    source: e,
                });
            }
        };

        let (Some(stdout), Some(stderr)) = (collect(&stdout, deadline), collect(&stderr, deadline)) else {
            tracing::warn!(
                program = %spec.program,
                pid = child.id(),
                "Database tool exited but left processes holding its output open, terminating"
            );
            terminate(&mut child);
            return Err(ToolError::TimedOut {
                program: spec.program.clone(),
                timeout: self.timeout,
            });
        };

        if !stdout.trim().is_empty() {
            tracing::debug!(program = %spec.program, output = %stdout.trim(), "Database tool output");
        }

        if !status.success() {
            return Err(ToolError::Failed {
                program: spec.program.clone(),
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

impl DatabaseTool for CommandTool {
    fn dump(&self, request: &DumpRequest<'_>) -> Result<(), ToolError> {
        self.run(&self.dump, &request.to_args(), request.catalog_dir)
    }

    fn restore(&self, request: &RestoreRequest<'_>) -> Result<(), ToolError> {
        self.run(&self.restore, &request.to_args(), request.catalog_dir)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Output of a drained pipe, or `None` if it is still open at `deadline`
fn collect(output: &Receiver<String>, deadline: Instant) -> Option<String> {
    match output.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(text) => Some(text),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// Poll the child until it exits or `deadline` passes (`Ok(None)`)
fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// SIGTERM the tool's process group, SIGKILL whatever is left after the grace period
fn terminate(child: &mut Child) {
    let group = Pid::from_raw(child.id() as i32);

    if let Err(e) = killpg(group, Signal::SIGTERM) {
        tracing::warn!(pid = child.id(), error = %e, "Failed to send SIGTERM to database tool");
    }

    match wait_until(child, Instant::now() + TERMINATE_GRACE) {
        Ok(Some(_)) => {}
        Ok(None) => tracing::warn!(pid = child.id(), "Database tool ignored SIGTERM, sending SIGKILL"),
        Err(e) => tracing::warn!(pid = child.id(), error = %e, "Failed to wait for database tool"),
    }

    // Stragglers in the group; ESRCH once everything is gone
    let _ = killpg(group, Signal::SIGKILL);
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
