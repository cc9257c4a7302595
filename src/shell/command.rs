//! External command execution.

use crate::error::Result;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use super::path::prepend_to_path;

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Directories searched before the inherited `PATH`.
    pub path_prepend: Vec<PathBuf>,
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The line text regardless of stream.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(line) | Self::Stderr(line) => line,
        }
    }
}

/// Execute a program with arguments, streaming output lines to `callback`.
///
/// Both streams are read on helper threads; `callback` runs on the calling
/// thread, which returns only once the process has exited.
pub fn execute_streaming<F>(
    program: &Path,
    args: &[String],
    options: &CommandOptions,
    callback: F,
) -> Result<CommandResult>
where
    F: FnMut(OutputLine),
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    let command_line = display_command(&program.to_string_lossy(), args);
    run_streaming(cmd, &command_line, options, callback)
}

/// Execute a command line through the platform shell, streaming output.
pub fn execute_shell_streaming<F>(
    command: &str,
    options: &CommandOptions,
    callback: F,
) -> Result<CommandResult>
where
    F: FnMut(OutputLine),
{
    let mut cmd = Command::new(shell_program());
    cmd.arg(shell_flag());
    cmd.arg(command);
    run_streaming(cmd, command, options, callback)
}

/// Render a program and its arguments the way a user would type them.
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_streaming<F>(
    mut cmd: Command,
    command_line: &str,
    options: &CommandOptions,
    mut callback: F,
) -> Result<CommandResult>
where
    F: FnMut(OutputLine),
{
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if !options.path_prepend.is_empty() {
        let current = std::env::var_os("PATH").unwrap_or_else(OsString::new);
        let path = prepend_to_path(&options.path_prepend, &current)?;
        cmd.env("PATH", path);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Spawning: {}", command_line);

    let mut child = cmd
        .spawn()
        .map_err(|e| anyhow::anyhow!("cannot run '{}': {}", command_line, e))?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(out), Some(err)) => (out, err),
        _ => {
            let message = format!("output of '{}' was not captured", command_line);
            return Err(anyhow::anyhow!(message).into());
        }
    };

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        forward_lines(stdout, |line| tx_stdout.send(OutputLine::Stdout(line)))
    });
    let stderr_handle = thread::spawn(move || {
        forward_lines(stderr, |line| tx_stderr.send(OutputLine::Stderr(line)))
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child
        .wait()
        .map_err(|e| anyhow::anyhow!("cannot wait for '{}': {}", command_line, e))?;

    Ok(CommandResult {
        exit_code: status.code(),
        stdout: stdout_output,
        stderr: stderr_output,
        success: status.success(),
    })
}

/// Read `reader` to EOF, sending each line without its terminator.
///
/// Invalid UTF-8 is replaced lossily; reading always continues to EOF.
fn forward_lines<R, S, E>(reader: R, mut send: S) -> String
where
    R: Read,
    S: FnMut(String) -> std::result::Result<(), E>,
{
    let mut reader = BufReader::new(reader);
    let mut output = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!("Stopped reading command output: {}", e);
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches('\n').trim_end_matches('\r');
        output.push_str(line);
        output.push('\n');
        let _ = send(line.to_string());
    }

    output
}

fn shell_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd"
    } else {
        "sh"
    }
}

fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-c"
    }
}
