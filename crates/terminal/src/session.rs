//! Shell sessions over a PTY.

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::path::Path;
use uuid::Uuid;

/// Receives dispatched command text.
///
/// `hold = false` types the text and submits it; `hold = true` withholds
/// the trailing carriage return so the command sits in the session waiting
/// for manual confirmation.
pub trait CommandSink {
    fn send(&mut self, text: &str, hold: bool) -> Result<()>;
}

/// Bytes written to the PTY for one dispatch: the text verbatim, plus a
/// carriage return unless the send is held.
pub fn payload(text: &str, hold: bool) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    if !hold {
        bytes.push(b'\r');
    }
    bytes
}

/// The user's shell: `$SHELL` with a platform fallback.
pub fn default_shell() -> String {
    #[cfg(windows)]
    {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    }
    #[cfg(not(windows))]
    {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string())
    }
}

/// A live shell running on a PTY.
///
/// A detached reader thread pumps session output to stdout for the session's
/// lifetime. Dropping the session kills the child shell.
pub struct TerminalSession {
    id: Uuid,
    name: String,
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send>,
}

impl TerminalSession {
    /// Spawn the user's shell in a fresh PTY, working directory `cwd` when
    /// given.
    pub fn spawn(name: impl Into<String>, cwd: Option<&Path>) -> Result<Self> {
        let name = name.into();
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open PTY")?;

        let shell = default_shell();
        let mut builder = CommandBuilder::new(&shell);
        builder.env("TERM", "xterm-256color");
        if let Some(cwd) = cwd {
            builder.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(builder)
            .with_context(|| format!("Failed to spawn shell: {}", shell))?;
        let writer = pair
            .master
            .take_writer()
            .context("Failed to open PTY writer")?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .context("Failed to open PTY reader")?;

        let id = Uuid::new_v4();
        tracing::info!(session = %id, shell = %shell, "Spawned terminal session '{}'", name);

        // Pump session output until the PTY closes.
        std::thread::spawn(move || {
            let mut buffer = [0u8; 4096];
            let mut stdout = std::io::stdout();
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if stdout
                            .write_all(&buffer[..n])
                            .and_then(|_| stdout.flush())
                            .is_err()
                        {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(session = %id, "Session output closed");
        });

        Ok(Self {
            id,
            name,
            master: pair.master,
            writer,
            child,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the child shell is still alive.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to resize PTY")
    }
}

impl CommandSink for TerminalSession {
    fn send(&mut self, text: &str, hold: bool) -> Result<()> {
        self.writer
            .write_all(&payload(text, hold))
            .with_context(|| format!("Failed to write to session '{}'", self.name))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush session '{}'", self.name))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(e) = self.child.kill() {
                tracing::warn!(session = %self.id, "Failed to kill session shell: {}", e);
            }
        }
    }
}
