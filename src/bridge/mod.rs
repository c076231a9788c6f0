//! # Cross-Framework Bridge
//!
//! Runs a program with its own event loop on a dedicated thread and drives it
//! from the host loop:
//!
//! - input goes in as [`ForeignMsg`] values over a channel the program polls;
//! - output comes back as text frames, stripped of CSI/OSC sequences, queued on
//!   the host's [`BridgeEvent`] channel and applied by the host loop only;
//! - [`BridgeHandle::stop`] marks the session stale, closes the input channel
//!   and discards every later write. An exit after a stop is never reported.

pub mod keys;
pub mod pty;
pub mod strip;

use crate::host::isolate::isolate;
use crate::host::SessionId;
use anyhow::{Context, Result};
use keys::ForeignKey;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub use keys::{translate_key, ForeignKeyCode};
pub use strip::strip_escapes;

/// A message in the bridged program's own input vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignMsg {
    Key(ForeignKey),
    Resize { cols: u16, rows: u16 },
}

/// A program driven through the bridge.
///
/// `run` owns the program's loop. It should return once
/// [`ProgramContext::next_input`] yields [`Input::Closed`]; returning `Err`
/// without having been stopped shows the error in place of the program.
pub trait ForeignProgram: Send + 'static {
    fn run(&mut self, ctx: &mut ProgramContext) -> Result<()>;
}

/// Result of polling the program's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Message(ForeignMsg),
    /// Nothing arrived before the timeout.
    Idle,
    /// The host stopped the session; the program should wind down.
    Closed,
}

/// What a bridged program sees of the host.
pub struct ProgramContext {
    inbox: Receiver<ForeignMsg>,
    output: FrameWriter,
}

impl ProgramContext {
    /// Wait up to `timeout` for the next message.
    pub fn next_input(&mut self, timeout: Duration) -> Input {
        if self.is_stopped() {
            return Input::Closed;
        }
        match self.inbox.recv_timeout(timeout) {
            Ok(message) => Input::Message(message),
            Err(RecvTimeoutError::Timeout) => Input::Idle,
            Err(RecvTimeoutError::Disconnected) => Input::Closed,
        }
    }

    /// Take a queued message without waiting.
    pub fn try_input(&mut self) -> Input {
        if self.is_stopped() {
            return Input::Closed;
        }
        match self.inbox.try_recv() {
            Ok(message) => Input::Message(message),
            Err(TryRecvError::Empty) => Input::Idle,
            Err(TryRecvError::Disconnected) => Input::Closed,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.output.stopped.load(Ordering::SeqCst)
    }

    /// The program's terminal. Bytes written are sent as one frame per flush.
    pub fn output(&mut self) -> &mut FrameWriter {
        &mut self.output
    }
}

/// Output from a bridged session, tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeEvent {
    pub session: SessionId,
    pub kind: BridgeEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEventKind {
    /// A redraw, already stripped of control sequences.
    Frame(String),
    /// The program returned. `Some` carries the failure text.
    Exited(Option<String>),
}

/// Terminal-like sink for a bridged program.
///
/// Writes accumulate until `flush`, which strips escape sequences and queues
/// the result as a single frame. After a stop every write succeeds and is
/// thrown away.
pub struct FrameWriter {
    session: SessionId,
    buffer: Vec<u8>,
    events: UnboundedSender<BridgeEvent>,
    stopped: Arc<AtomicBool>,
}

impl FrameWriter {
    /// Replace the displayed frame with `frame`.
    pub fn present(&mut self, frame: &str) -> io::Result<()> {
        self.buffer.clear();
        io::Write::write_all(self, frame.as_bytes())?;
        io::Write::flush(self)
    }

    fn discarding(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl io::Write for FrameWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.discarding() {
            self.buffer.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let raw = std::mem::take(&mut self.buffer);
        if self.discarding() || raw.is_empty() {
            return Ok(());
        }
        let frame = strip_escapes(&String::from_utf8_lossy(&raw));
        let event = BridgeEvent {
            session: self.session,
            kind: BridgeEventKind::Frame(frame),
        };
        if self.events.send(event).is_err() {
            // Host loop is gone; nothing left to draw on.
            debug!(session = %self.session, "bridge output dropped, host closed");
        }
        Ok(())
    }
}

/// The host's end of a running bridged program.
pub struct BridgeHandle {
    session: SessionId,
    input: Option<Sender<ForeignMsg>>,
    stopped: Arc<AtomicBool>,
}

impl BridgeHandle {
    /// Spawn `program` on its own thread, reporting to `events`.
    ///
    /// `first` is queued before the thread starts, so the program sees it on
    /// its first read.
    pub fn start(
        session: SessionId,
        mut program: Box<dyn ForeignProgram>,
        events: UnboundedSender<BridgeEvent>,
        first: Option<ForeignMsg>,
    ) -> Result<Self> {
        let (input_tx, input_rx) = mpsc::channel();
        if let Some(message) = first {
            input_tx
                .send(message)
                .context("Failed to queue first bridge message")?;
        }
        let stopped = Arc::new(AtomicBool::new(false));

        let mut ctx = ProgramContext {
            inbox: input_rx,
            output: FrameWriter {
                session,
                buffer: Vec::new(),
                events: events.clone(),
                stopped: Arc::clone(&stopped),
            },
        };
        let thread_stopped = Arc::clone(&stopped);

        std::thread::Builder::new()
            .name(format!("bridge-{}", session.0))
            .spawn(move || {
                let outcome = isolate(|| program.run(&mut ctx));
                if thread_stopped.load(Ordering::SeqCst) {
                    debug!(%session, "bridged program returned after stop");
                    return;
                }
                // Anything written but never flushed still counts as the last frame.
                let _ = io::Write::flush(ctx.output());
                let failure = match outcome {
                    Ok(Ok(())) => None,
                    Ok(Err(err)) => Some(format!("{err:#}")),
                    Err(panic) => Some(panic),
                };
                let _ = events.send(BridgeEvent {
                    session,
                    kind: BridgeEventKind::Exited(failure),
                });
            })
            .context("Failed to spawn bridge thread")?;

        info!(%session, "bridge started");
        Ok(Self {
            session,
            input: Some(input_tx),
            stopped,
        })
    }

    /// Queue a message for the program. `false` once stopped or after the
    /// program has returned.
    pub fn send(&self, message: ForeignMsg) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.input
            .as_ref()
            .is_some_and(|input| input.send(message).is_ok())
    }

    /// Ask the program to stop and mark its output stale. Idempotent.
    pub fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            info!(session = %self.session, "bridge stopped");
        }
        self.input.take();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn writer(stopped: bool) -> (FrameWriter, UnboundedReceiver<BridgeEvent>) {
        let (tx, rx) = unbounded_channel();
        let writer = FrameWriter {
            session: SessionId(1),
            buffer: Vec::new(),
            events: tx,
            stopped: Arc::new(AtomicBool::new(stopped)),
        };
        (writer, rx)
    }

    fn wait_for(rx: &mut UnboundedReceiver<BridgeEvent>) -> Option<BridgeEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            match rx.try_recv() {
                Ok(event) => return Some(event),
                Err(_) => std::thread::sleep(Duration::from_millis(5)),
            }
        }
        None
    }

    #[test]
    fn test_flush_emits_one_stripped_frame() {
        let (mut out, mut rx) = writer(false);
        write!(out, "\x1b[2J\x1b[H").expect("write");
        write!(out, "Count: 1").expect("write");
        out.flush().expect("flush");

        assert_eq!(
            rx.try_recv().ok().map(|e| e.kind),
            Some(BridgeEventKind::Frame("Count: 1".to_string()))
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_flush_sends_nothing() {
        let (mut out, mut rx) = writer(false);
        out.flush().expect("flush");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_writes_after_stop_are_discarded() {
        let (mut out, mut rx) = writer(true);
        out.present("late frame").expect("present succeeds");
        assert!(rx.try_recv().is_err());
    }

    struct Echo;

    impl ForeignProgram for Echo {
        fn run(&mut self, ctx: &mut ProgramContext) -> Result<()> {
            loop {
                match ctx.next_input(Duration::from_millis(10)) {
                    Input::Message(ForeignMsg::Key(key)) => {
                        ctx.output().present(&format!("got {key}"))?;
                    }
                    Input::Message(ForeignMsg::Resize { .. }) | Input::Idle => {}
                    Input::Closed => return Ok(()),
                }
            }
        }
    }

    /// Reports what its very first non-blocking read returned.
    struct FirstRead;

    impl ForeignProgram for FirstRead {
        fn run(&mut self, ctx: &mut ProgramContext) -> Result<()> {
            let seen = match ctx.try_input() {
                Input::Message(ForeignMsg::Resize { cols, rows }) => format!("{cols}x{rows}"),
                _ => "nothing".to_string(),
            };
            ctx.output().present(&seen)?;
            Ok(())
        }
    }

    struct Failing;

    impl ForeignProgram for Failing {
        fn run(&mut self, _ctx: &mut ProgramContext) -> Result<()> {
            anyhow::bail!("lost connection")
        }
    }

    #[test]
    fn test_round_trip_key_to_frame() {
        let (tx, mut rx) = unbounded_channel();
        let handle = BridgeHandle::start(SessionId(3), Box::new(Echo), tx, None).expect("start");
        assert!(handle.send(ForeignMsg::Key(ForeignKey::new(ForeignKeyCode::Char('a')))));

        let event = wait_for(&mut rx).expect("frame");
        assert_eq!(event.session, SessionId(3));
        assert_eq!(event.kind, BridgeEventKind::Frame("got a".to_string()));
    }

    #[test]
    fn test_stop_is_idempotent_and_silent() {
        let (tx, mut rx) = unbounded_channel();
        let mut handle = BridgeHandle::start(SessionId(4), Box::new(Echo), tx, None).expect("start");
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
        assert!(!handle.send(ForeignMsg::Resize { cols: 1, rows: 1 }));

        std::thread::sleep(Duration::from_millis(100));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unrequested_failure_is_reported() {
        let (tx, mut rx) = unbounded_channel();
        let _handle = BridgeHandle::start(SessionId(5), Box::new(Failing), tx, None).expect("start");
        let event = wait_for(&mut rx).expect("exit");
        assert_eq!(
            event.kind,
            BridgeEventKind::Exited(Some("lost connection".to_string()))
        );
    }

    #[test]
    fn test_first_message_is_queued_before_start() {
        let (tx, mut rx) = unbounded_channel();
        let first = ForeignMsg::Resize { cols: 64, rows: 22 };
        let _handle =
            BridgeHandle::start(SessionId(6), Box::new(FirstRead), tx, Some(first)).expect("start");
        let event = wait_for(&mut rx).expect("frame");
        assert_eq!(event.kind, BridgeEventKind::Frame("64x22".to_string()));
    }
}
