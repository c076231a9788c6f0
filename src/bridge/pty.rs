//! # PTY-backed Programs
//!
//! Runs an external command inside a pseudo-terminal as a bridged program.
//!
//! - `portable-pty` spawns the command and carries keystrokes to it
//! - a reader thread forwards raw output chunks over a channel
//! - `vt100` keeps the virtual screen; each change is presented as a frame

use super::keys::{ForeignKey, ForeignKeyCode};
use super::{ForeignMsg, ForeignProgram, Input, ProgramContext};
use anyhow::{Context, Result};
use portable_pty::{CommandBuilder, NativePtySystem, PtySize, PtySystem};
use std::io::{Read, Write};
use std::sync::mpsc;
use std::time::Duration;
use tracing::debug;

/// Poll interval of the program loop (~60fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// How long to wait for the host's first size message before spawning.
const FIRST_SIZE_WAIT: Duration = Duration::from_millis(100);
/// Grace period for output still in flight when the child exits.
const DRAIN_WAIT: Duration = Duration::from_millis(50);
const DEFAULT_SIZE: (u16, u16) = (80, 24);
const SCROLLBACK: usize = 1000;

/// An external command run as a bridged program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProgram {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandProgram {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command line as it would be typed into a shell.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn pty_size(cols: u16, rows: u16) -> PtySize {
    PtySize {
        rows: rows.max(1),
        cols: cols.max(1),
        pixel_width: 0,
        pixel_height: 0,
    }
}

fn screen_text(parser: &vt100::Parser) -> String {
    let (_, cols) = parser.screen().size();
    let rows: Vec<Vec<u8>> = parser.screen().rows_formatted(0, cols).collect();
    String::from_utf8_lossy(&rows.join(&b'\n')).into_owned()
}

impl ForeignProgram for CommandProgram {
    fn run(&mut self, ctx: &mut ProgramContext) -> Result<()> {
        let (mut cols, mut rows) = DEFAULT_SIZE;
        let mut pending_key = None;
        match ctx.next_input(FIRST_SIZE_WAIT) {
            Input::Message(ForeignMsg::Resize { cols: c, rows: r }) => {
                cols = c.max(1);
                rows = r.max(1);
            }
            Input::Message(ForeignMsg::Key(key)) => pending_key = Some(key),
            Input::Idle => {}
            Input::Closed => return Ok(()),
        }

        let pty_pair = NativePtySystem::default()
            .openpty(pty_size(cols, rows))
            .context("Failed to open PTY")?;

        let mut cmd = CommandBuilder::new(&self.program);
        for arg in &self.args {
            cmd.arg(arg);
        }
        if let Ok(dir) = std::env::current_dir() {
            cmd.cwd(dir);
        }

        let mut child = pty_pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn `{}`", self.command_line()))?;
        // Only the master side is needed for I/O.
        drop(pty_pair.slave);

        let mut reader = pty_pair
            .master
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;
        let mut writer = pty_pair
            .master
            .take_writer()
            .context("Failed to take PTY writer")?;

        let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<u8>>();
        std::thread::Builder::new()
            .name(format!("pty-{}", self.name))
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if chunk_tx.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                    }
                }
            })
            .context("Failed to spawn PTY reader thread")?;

        let mut parser = vt100::Parser::new(rows, cols, SCROLLBACK);
        if let Some(key) = pending_key {
            writer.write_all(&encode_key(&key))?;
            writer.flush()?;
        }

        loop {
            let mut dirty = false;
            for chunk in chunk_rx.try_iter() {
                parser.process(&chunk);
                dirty = true;
            }
            if dirty {
                ctx.output().present(&screen_text(&parser))?;
            }

            if let Some(status) = child.try_wait().context("Failed to poll child")? {
                while let Ok(chunk) = chunk_rx.recv_timeout(DRAIN_WAIT) {
                    parser.process(&chunk);
                }
                ctx.output().present(&screen_text(&parser))?;
                if status.success() {
                    return Ok(());
                }
                anyhow::bail!(
                    "`{}` exited with code {}",
                    self.command_line(),
                    status.exit_code()
                );
            }

            match ctx.next_input(FRAME_INTERVAL) {
                Input::Message(ForeignMsg::Key(key)) => {
                    writer
                        .write_all(&encode_key(&key))
                        .context("Failed to write to PTY")?;
                    writer.flush().context("Failed to flush PTY writer")?;
                }
                Input::Message(ForeignMsg::Resize { cols, rows }) => {
                    let size = pty_size(cols, rows);
                    pty_pair
                        .master
                        .resize(size)
                        .context("Failed to resize PTY")?;
                    parser.screen_mut().set_size(size.rows, size.cols);
                }
                Input::Idle => {}
                Input::Closed => {
                    debug!(command = %self.command_line(), "killing PTY child");
                    let _ = child.kill();
                    return Ok(());
                }
            }
        }
    }
}

/// Bytes a terminal would send for `key`. Alt prefixes `ESC`.
pub fn encode_key(key: &ForeignKey) -> Vec<u8> {
    let mut bytes = Vec::new();
    if key.alt {
        bytes.push(0x1b);
    }
    match key.code {
        ForeignKeyCode::Enter => bytes.push(b'\r'),
        ForeignKeyCode::Tab => bytes.push(b'\t'),
        ForeignKeyCode::Backspace => bytes.push(0x7f),
        ForeignKeyCode::Escape => bytes.push(0x1b),
        ForeignKeyCode::Delete => bytes.extend_from_slice(b"\x1b[3~"),
        ForeignKeyCode::Insert => bytes.extend_from_slice(b"\x1b[2~"),
        ForeignKeyCode::PageUp => bytes.extend_from_slice(b"\x1b[5~"),
        ForeignKeyCode::PageDown => bytes.extend_from_slice(b"\x1b[6~"),
        ForeignKeyCode::Up => bytes.extend_from_slice(b"\x1b[A"),
        ForeignKeyCode::Down => bytes.extend_from_slice(b"\x1b[B"),
        ForeignKeyCode::Right => bytes.extend_from_slice(b"\x1b[C"),
        ForeignKeyCode::Left => bytes.extend_from_slice(b"\x1b[D"),
        ForeignKeyCode::Home => bytes.extend_from_slice(b"\x1b[H"),
        ForeignKeyCode::End => bytes.extend_from_slice(b"\x1b[F"),
        ForeignKeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_named_keys() {
        assert_eq!(encode_key(&ForeignKey::new(ForeignKeyCode::Enter)), b"\r");
        assert_eq!(encode_key(&ForeignKey::new(ForeignKeyCode::Up)), b"\x1b[A");
        assert_eq!(encode_key(&ForeignKey::new(ForeignKeyCode::Delete)), b"\x1b[3~");
    }

    #[test]
    fn test_encode_alt_char() {
        let key = ForeignKey {
            code: ForeignKeyCode::Char('ß'),
            alt: true,
        };
        assert_eq!(encode_key(&key), "\x1bß".as_bytes());
    }

    #[test]
    fn test_command_line() {
        let program = CommandProgram::new("Tree", "ls", vec!["-la".to_string(), "/tmp".to_string()]);
        assert_eq!(program.name(), "Tree");
        assert_eq!(program.command_line(), "ls -la /tmp");
    }

    #[test]
    fn test_screen_text_is_plain_after_strip() {
        let mut parser = vt100::Parser::new(2, 10, 0);
        parser.process(b"\x1b[31mhi\x1b[0m\r\nthere");
        let text = super::super::strip_escapes(&screen_text(&parser));
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        assert_eq!(lines, vec!["hi", "there"]);
    }
}
