//! A program with its own loop and timer that draws straight to "a terminal",
//! escape sequences included. It only runs behind the bridge.

use crate::bridge::{ForeignKeyCode, ForeignMsg, ForeignProgram, Input, ProgramContext};
use anyhow::Result;
use std::io::Write;
use std::time::{Duration, Instant};

const SLOWEST: Duration = Duration::from_millis(1000);
const FASTEST: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct Ticker {
    ticks: u64,
    interval: Duration,
    paused: bool,
    size: (u16, u16),
    last_key: Option<String>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self {
            ticks: 0,
            interval: Duration::from_millis(250),
            paused: false,
            size: (0, 0),
            last_key: None,
        }
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw(&self, ctx: &mut ProgramContext) -> Result<()> {
        let out = ctx.output();
        // Clear, home and set the window title, as a standalone program would.
        write!(out, "\x1b[2J\x1b[H\x1b]0;ticker\x07")?;
        write!(out, "\x1b[1mTicks: {}\x1b[0m", self.ticks)?;
        if self.paused {
            write!(out, "  \x1b[33m(paused)\x1b[0m")?;
        }
        write!(
            out,
            "\n\nInterval: {}ms\nViewport: {}x{}\nLast key: {}\n\n",
            self.interval.as_millis(),
            self.size.0,
            self.size.1,
            self.last_key.as_deref().unwrap_or("-"),
        )?;
        write!(out, "(p pause, + faster, - slower, x crash)")?;
        out.flush()?;
        Ok(())
    }
}

impl ForeignProgram for Ticker {
    fn run(&mut self, ctx: &mut ProgramContext) -> Result<()> {
        // The viewport is queued before the program starts.
        if let Input::Message(ForeignMsg::Resize { cols, rows }) = ctx.try_input() {
            self.size = (cols, rows);
        }
        let mut next_tick = Instant::now() + self.interval;
        self.draw(ctx)?;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match ctx.next_input(wait) {
                Input::Closed => return Ok(()),
                Input::Idle => {
                    if !self.paused {
                        self.ticks += 1;
                    }
                    next_tick = Instant::now() + self.interval;
                }
                Input::Message(ForeignMsg::Resize { cols, rows }) => self.size = (cols, rows),
                Input::Message(ForeignMsg::Key(key)) => {
                    self.last_key = Some(key.to_string());
                    match key.code {
                        ForeignKeyCode::Char('p') => self.paused = !self.paused,
                        ForeignKeyCode::Char('+') => {
                            self.interval = (self.interval / 2).max(FASTEST);
                        }
                        ForeignKeyCode::Char('-') => {
                            self.interval = (self.interval * 2).min(SLOWEST);
                        }
                        ForeignKeyCode::Char('x') => anyhow::bail!("ticker crashed on request"),
                        _ => {}
                    }
                }
            }
            self.draw(ctx)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeEventKind, BridgeHandle};
    use crate::host::SessionId;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_first_frame_knows_viewport() {
        let (tx, mut rx) = unbounded_channel();
        let first = ForeignMsg::Resize { cols: 40, rows: 10 };
        let _handle = BridgeHandle::start(SessionId(1), Box::new(Ticker::new()), tx, Some(first))
            .expect("start");

        let deadline = Instant::now() + Duration::from_secs(5);
        let frame = loop {
            match rx.try_recv() {
                Ok(event) => break event.kind,
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(5));
                }
                Err(err) => panic!("no frame: {err}"),
            }
        };
        match frame {
            BridgeEventKind::Frame(text) => {
                assert!(text.contains("Viewport: 40x10"), "got {text:?}");
                assert!(text.starts_with("Ticks: 0"));
            }
            other => panic!("expected a frame, got {other:?}"),
        }
    }
}
