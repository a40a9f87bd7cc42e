//! stdio transport: spawn a local MCP server and drive the handshake over
//! its standard streams.

use crate::error::{ProbeError, tail};
use crate::frame::LineDecoder;
use crate::handshake::{Handshake, Outbound, Outcome};
use crate::lookup;
use mcpswitch_core::{ServerDescriptor, ToolSummary};
use serde_json::Value;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStderr, ChildStdin, ChildStdout, Command};

/// How much captured stderr is included in timeout/exit diagnostics.
const STDERR_TAIL_CHARS: usize = 500;

/// A spawned MCP server process with its three byte streams.
///
/// Diagnostic output is accumulated by a background reader so the tail is
/// available on every exit path, including timeout.
struct StdioChild {
    child: tokio::process::Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
    stderr_buf: Arc<Mutex<String>>,
}

impl StdioChild {
    /// Send the opening request. A failure here is reported; the child may
    /// have died immediately (bad interpreter, missing module).
    async fn write_initial(&mut self, payload: &Value) -> Result<(), ProbeError> {
        self.write_line(payload)
            .await
            .map_err(|e| ProbeError::StdinWrite(e.to_string()))
    }

    /// Send a follow-up payload, suppressing failures: the child may
    /// legitimately exit between a successful handshake and a late flush.
    async fn write_best_effort(&mut self, payload: &Value) {
        if let Err(e) = self.write_line(payload).await {
            tracing::debug!(error = %e, "Suppressing stdin write failure after first exchange");
        }
    }

    async fn write_line(&mut self, payload: &Value) -> std::io::Result<()> {
        let mut line = payload.to_string();
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await
    }

    /// Last 500 characters of accumulated diagnostic output.
    fn stderr_tail(&self) -> String {
        self.stderr_buf
            .lock()
            .map(|buf| tail(&buf, STDERR_TAIL_CHARS))
            .unwrap_or_default()
    }

    async fn exit_code(&mut self) -> Option<i32> {
        self.child.wait().await.ok().and_then(|status| status.code())
    }

    /// Forcefully terminate and reap the child. Safe to call repeatedly and
    /// after natural exit.
    async fn shutdown(&mut self) {
        let _ = self.child.start_kill();
        let _ = self.child.wait().await;
    }
}

/// Start the configured command with the extended PATH and descriptor env.
///
/// A failure to even start short-circuits immediately without consuming the
/// probe deadline.
fn launch(descriptor: &ServerDescriptor, extra_paths: &[String]) -> Result<StdioChild, ProbeError> {
    let command = descriptor.command.as_deref().ok_or(ProbeError::NoCommand)?;

    let mut cmd = base_command(command, &descriptor.args);
    cmd.env("PATH", lookup::extended_path(extra_paths));
    for (key, value) in &descriptor.env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| ProbeError::Spawn(format!("'{command}': {e}")))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| ProbeError::Spawn("stdin not available".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ProbeError::Spawn("stdout not available".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ProbeError::Spawn("stderr not available".to_string()))?;

    let stderr_buf = Arc::new(Mutex::new(String::new()));
    spawn_stderr_reader(stderr, Arc::clone(&stderr_buf));

    Ok(StdioChild {
        child,
        stdin,
        stdout,
        stderr_buf,
    })
}

/// On platforms where commands resolve through a shell, launch through the
/// shell; otherwise exec directly.
#[cfg(not(windows))]
fn base_command(command: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(command);
    cmd.args(args);
    cmd
}

#[cfg(windows)]
fn base_command(command: &str, args: &[String]) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command).args(args);
    cmd
}

fn spawn_stderr_reader(mut stderr: ChildStderr, buf: Arc<Mutex<String>>) {
    tokio::spawn(async move {
        let mut chunk = vec![0u8; 1024];
        loop {
            match stderr.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let text = String::from_utf8_lossy(&chunk[..n]).to_string();
                    if let Ok(mut guard) = buf.lock() {
                        guard.push_str(&text);
                    }
                }
            }
        }
    });
}

/// Run the full stdio probe under one hard deadline.
pub(crate) async fn probe_stdio(
    descriptor: &ServerDescriptor,
    extra_paths: &[String],
    deadline: Duration,
) -> Result<Vec<ToolSummary>, ProbeError> {
    let mut child = launch(descriptor, extra_paths)?;

    let result = match tokio::time::timeout(deadline, drive(&mut child)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout {
            seconds: deadline.as_secs(),
            stderr_tail: child.stderr_tail(),
        }),
    };

    // Release the transport on every exit path
    child.shutdown().await;
    result
}

/// Read child output, feed the frame decoder and state machine, and settle
/// exactly once. Runs as one sequential task, so concurrent completion
/// triggers cannot race: once the handshake settles we stop consuming the
/// stream entirely.
async fn drive(child: &mut StdioChild) -> Result<Vec<ToolSummary>, ProbeError> {
    let (mut handshake, init) = Handshake::start();
    child.write_initial(&init).await?;

    let mut decoder = LineDecoder::new();
    let mut buf = vec![0u8; 4096];

    loop {
        let read = match child.stdout.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "stdout read failed, treating as process exit");
                0
            }
        };

        if read == 0 {
            // EOF before settling: crash, command misbehaving, or clean
            // exit without answering
            let code = child.exit_code().await;
            return Err(ProbeError::ProcessExited {
                code,
                stderr_tail: child.stderr_tail(),
            });
        }

        let chunk = String::from_utf8_lossy(&buf[..read]).to_string();
        for msg in decoder.push(&chunk) {
            for outbound in handshake.on_message(&msg) {
                let (Outbound::Request(payload) | Outbound::Notification(payload)) = outbound;
                child.write_best_effort(&payload).await;
            }

            if let Some(outcome) = handshake.outcome() {
                return match outcome {
                    Outcome::Success(tools) => Ok(tools.clone()),
                    Outcome::Error(message) => Err(ProbeError::Protocol(message.clone())),
                };
            }
        }
    }
}
