//! External command runner with timeout and output cap.
//!
//! Facts such as the distribution description, driver versions and uptime
//! come from external tools. A tool that is missing or hangs must not stop
//! the report, so [`ToolRunner::run_or_empty`] turns those failures into empty
//! output after logging them at debug level. A non-zero exit still yields
//! whatever the tool printed.
//!
//! - Per-command timeout with SIGTERM then SIGKILL
//! - Output size cap per stream
//! - Cleared environment with `LC_ALL=C` for stable parsing

use sfr_common::Error;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, trace};

/// Default timeout per command in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum output size per stream in bytes (1MB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Grace period between SIGTERM and SIGKILL in milliseconds.
const SIGTERM_GRACE_MS: u64 = 500;

const CHUNK_SIZE: usize = 8192;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("command failed to spawn: {0}")]
    SpawnFailed(String),

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    #[error("command exited with non-zero status: {code}")]
    NonZeroExit { code: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid command path: {0}")]
    InvalidPath(String),
}

/// Output from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub command: String,
    pub args: Vec<String>,
    /// Standard output (may be truncated).
    pub stdout: Vec<u8>,
    /// Standard error (may be truncated).
    pub stderr: Vec<u8>,
    pub exit_code: Option<i32>,
    /// Whether either stream hit the output cap.
    pub truncated: bool,
    pub duration: Duration,
    pub timed_out: bool,
}

impl ToolOutput {
    /// Stdout as a string (lossy UTF-8 conversion).
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr as a string (lossy UTF-8 conversion).
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Exit code 0 and no timeout.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Configuration for the tool runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Default timeout per command.
    pub default_timeout: Duration,
    /// Maximum output size per stream in bytes.
    pub max_output_bytes: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Specification for a tool to run.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub command: String,
    pub args: Vec<String>,
}

impl ToolSpec {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn display(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Bounded capture buffer for one output stream.
struct Capture {
    buf: Vec<u8>,
    limit: usize,
    truncated: bool,
}

impl Capture {
    fn new(limit: usize) -> Self {
        Capture {
            buf: Vec::with_capacity(limit.min(CHUNK_SIZE)),
            limit,
            truncated: false,
        }
    }

    fn push(&mut self, data: &[u8]) {
        let space = self.limit.saturating_sub(self.buf.len());
        let take = data.len().min(space);
        self.buf.extend_from_slice(&data[..take]);
        if take < data.len() {
            self.truncated = true;
        }
    }

    /// Read whatever is available now. Returns whether anything was read.
    fn poll<R: Read + std::os::unix::io::AsRawFd>(
        &mut self,
        stream: &mut R,
        chunk: &mut [u8],
    ) -> bool {
        match try_read_nonblocking(stream, chunk) {
            Ok(n) if n > 0 => {
                self.push(&chunk[..n]);
                true
            }
            _ => false,
        }
    }

    /// Drain what is immediately available after the child exited.
    ///
    /// Non-blocking so a grandchild holding the pipe open cannot hang us.
    fn drain<R: Read + std::os::unix::io::AsRawFd>(&mut self, stream: &mut R, chunk: &mut [u8]) {
        while !self.truncated && self.poll(stream, chunk) {}
    }
}

/// Runs external tools one at a time.
#[derive(Debug, Clone, Default)]
pub struct ToolRunner {
    config: ToolConfig,
}

impl ToolRunner {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Run a command with the default timeout.
    pub fn run_tool(&self, cmd: &str, args: &[&str]) -> Result<ToolOutput, ToolError> {
        self.run(&ToolSpec::new(cmd, args.iter().copied()))
    }

    /// Run a command and return its stdout.
    ///
    /// A missing or hung command yields an empty string. A non-zero exit
    /// keeps the captured stdout. Neither is propagated; both are logged at
    /// debug level.
    pub fn run_or_empty(&self, cmd: &str, args: &[&str]) -> String {
        let spec = ToolSpec::new(cmd, args.iter().copied());
        let result = self.run(&spec).and_then(|output| {
            if output.timed_out {
                return Err(ToolError::Timeout(output.duration));
            }
            if let Some(code) = output.exit_code.filter(|c| *c != 0) {
                let err = ToolError::NonZeroExit { code };
                debug!(
                    command = %spec.display(),
                    stderr = %output.stderr_str().trim_end(),
                    "{}",
                    err
                );
            }
            Ok(output.stdout_str())
        });
        result.unwrap_or_else(|e| {
            let err = Error::source_unavailable(spec.display(), &e);
            debug!(code = err.code(), category = %err.category(), "{}", err);
            String::new()
        })
    }

    /// Run a tool from a specification.
    #[instrument(level = "trace", skip(self), fields(cmd = %spec.command))]
    pub fn run(&self, spec: &ToolSpec) -> Result<ToolOutput, ToolError> {
        validate_command(&spec.command)?;

        let timeout = self.config.default_timeout;
        debug!(
            command = %spec.command,
            args = ?spec.args,
            timeout_ms = timeout.as_millis() as u64,
            "running tool"
        );

        let start = Instant::now();
        let mut child = build_command(&spec.command, &spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ToolError::CommandNotFound(spec.command.clone()),
                _ => ToolError::SpawnFailed(e.to_string()),
            })?;

        let (stdout, stderr, exit_code, timed_out) =
            self.execute_with_timeout(&mut child, timeout)?;
        let duration = start.elapsed();

        trace!(
            command = %spec.command,
            duration_ms = duration.as_millis() as u64,
            exit_code = ?exit_code,
            timed_out,
            "tool finished"
        );

        Ok(ToolOutput {
            command: spec.command.clone(),
            args: spec.args.clone(),
            truncated: stdout.truncated || stderr.truncated,
            stdout: stdout.buf,
            stderr: stderr.buf,
            exit_code,
            duration,
            timed_out,
        })
    }

    fn execute_with_timeout(
        &self,
        child: &mut Child,
        timeout: Duration,
    ) -> Result<(Capture, Capture, Option<i32>, bool), ToolError> {
        let deadline = Instant::now() + timeout;
        let mut stdout_cap = Capture::new(self.config.max_output_bytes);
        let mut stderr_cap = Capture::new(self.config.max_output_bytes);
        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let mut chunk = vec![0u8; CHUNK_SIZE];

        loop {
            if Instant::now() >= deadline {
                debug!(timeout_ms = timeout.as_millis() as u64, "command timed out");
                kill_with_grace(child);
                let exit_code = child.wait().ok().and_then(|s| s.code());
                return Ok((stdout_cap, stderr_cap, exit_code, true));
            }

            let mut did_read = false;
            if let Some(out) = stdout.as_mut() {
                did_read |= stdout_cap.poll(out, &mut chunk);
            }
            if let Some(err) = stderr.as_mut() {
                did_read |= stderr_cap.poll(err, &mut chunk);
            }

            match child.try_wait()? {
                Some(status) => {
                    if let Some(out) = stdout.as_mut() {
                        stdout_cap.drain(out, &mut chunk);
                    }
                    if let Some(err) = stderr.as_mut() {
                        stderr_cap.drain(err, &mut chunk);
                    }
                    return Ok((stdout_cap, stderr_cap, status.code(), false));
                }
                None if !did_read => thread::sleep(Duration::from_millis(10)),
                None => {}
            }
        }
    }
}

/// Reject commands that would need a shell to interpret.
fn validate_command(cmd: &str) -> Result<(), ToolError> {
    if cmd.is_empty() {
        return Err(ToolError::InvalidPath("empty command".to_string()));
    }
    if cmd.contains(['|', '&', ';', '$', '`', '\n', '\r']) {
        return Err(ToolError::InvalidPath(format!(
            "command contains shell metacharacters: {}",
            cmd
        )));
    }
    if cmd.starts_with('/') && !Path::new(cmd).exists() {
        return Err(ToolError::CommandNotFound(cmd.to_string()));
    }
    Ok(())
}

fn build_command(cmd: &str, args: &[String]) -> Command {
    let mut command = Command::new(cmd);
    command.args(args);
    command.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        command.env("PATH", path);
    }
    command.env("LC_ALL", "C");
    command.env("LANG", "C");
    command
}

/// SIGTERM, then SIGKILL if the child survives the grace period.
fn kill_with_grace(child: &mut Child) {
    let pid = child.id() as libc::pid_t;

    // SAFETY: pid belongs to a child we spawned and have not reaped.
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
    debug!(pid, "sent SIGTERM");
    thread::sleep(Duration::from_millis(SIGTERM_GRACE_MS));

    match child.try_wait() {
        Ok(Some(_)) => trace!(pid, "process exited after SIGTERM"),
        Ok(None) => {
            trace!(pid, "process ignored SIGTERM, sending SIGKILL");
            // SAFETY: as above, the child has not been reaped yet.
            unsafe {
                libc::kill(pid, libc::SIGKILL);
            }
        }
        Err(e) => debug!(pid, error = %e, "failed to check process status"),
    }
}

/// Read from a pipe without blocking.
///
/// Sets O_NONBLOCK for the duration of one read and restores the original
/// flags. Returns Ok(0) when nothing is available.
fn try_read_nonblocking<R: Read + std::os::unix::io::AsRawFd>(
    stream: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let fd = stream.as_raw_fd();

    // SAFETY: fd is a valid descriptor owned by `stream` for this call.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }

    let was_nonblocking = (flags & libc::O_NONBLOCK) != 0;
    if !was_nonblocking {
        // SAFETY: same descriptor, only the status flags change.
        let result = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
        if result < 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    let result = stream.read(buf);

    if !was_nonblocking {
        // SAFETY: restores the flags read above.
        unsafe {
            libc::fcntl(fd, libc::F_SETFL, flags);
        }
    }

    match result {
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(0),
        other => other,
    }
}

/// Builder for a tool runner with custom configuration.
#[derive(Debug, Default)]
pub struct ToolRunnerBuilder {
    config: ToolConfig,
}

impl ToolRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    /// Set the per-stream output cap.
    pub fn max_output(mut self, max_bytes: usize) -> Self {
        self.config.max_output_bytes = max_bytes;
        self
    }

    pub fn build(self) -> ToolRunner {
        ToolRunner::new(self.config)
    }
}
