//! # Preview Host
//!
//! Owns the one live component session and its lifecycle:
//!
//! ```text
//! load(factory) ──> construct ──> Resize(viewport) ──> init ──> Running
//!                                                        │
//!          forward / deliver / resize ◄──────────────────┤
//!                                                        ├──> Finished (Effect::Quit, clean exit)
//!                                                        └──> Faulted  (error or panic)
//! ```
//!
//! Loading a new component discards the old session before the new one is
//! built; bridged sessions are told to stop first so none of their late
//! output can land on the new session. Nothing is forwarded to a session that
//! is not `Running`.

use super::isolate::isolate;
use super::SessionId;
use crate::bridge::keys::translate_key;
use crate::bridge::{BridgeEvent, BridgeEventKind, BridgeHandle, ForeignMsg};
use crate::component::{Component, Effect, Message};
use crate::registry::Factory;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Shown when nothing has been loaded yet.
pub const EMPTY_STATE: &str =
    "No component selected\n\nSelect a component from the list to preview it here.";

const HINT_FOCUSED: &str = "Press ESC to return to list • Press ? for help • Press q to quit";
const HINT_UNFOCUSED: &str = "Press TAB to focus preview • Press ? for help";

/// Columns taken by the pane border and horizontal padding.
pub const INSET_X: u16 = 6;
/// Rows taken by the border, vertical padding, title and hint lines.
pub const INSET_Y: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// The component asked to quit or its program exited cleanly.
    Finished,
    /// The component failed; the message replaces its view.
    Faulted(String),
}

enum Body {
    Direct(Box<dyn Component>),
    Bridged(BridgeHandle),
    /// Construction failed; there is nothing to drive.
    Broken,
}

struct Session {
    id: SessionId,
    name: String,
    body: Body,
    status: SessionStatus,
    view: String,
}

impl Session {
    fn new(id: SessionId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            body: Body::Broken,
            status: SessionStatus::Running,
            view: String::new(),
        }
    }

    fn fault(&mut self, message: String) {
        warn!(session = %self.id, component = %self.name, %message, "component fault");
        self.status = SessionStatus::Faulted(message);
    }

    fn init(&mut self) -> Option<Effect> {
        if self.status != SessionStatus::Running {
            return None;
        }
        let outcome = match &mut self.body {
            Body::Direct(component) => isolate(|| component.init()),
            Body::Bridged(_) | Body::Broken => return None,
        };
        match outcome {
            Ok(effect) => {
                self.refresh_view();
                effect
            }
            Err(panic) => {
                self.fault(panic);
                None
            }
        }
    }

    fn update(&mut self, message: &Message) -> Option<Effect> {
        if self.status != SessionStatus::Running {
            return None;
        }
        let outcome = match &mut self.body {
            Body::Direct(component) => isolate(|| component.update(message)),
            Body::Bridged(handle) => {
                if let Some(foreign) = to_foreign(message) {
                    handle.send(foreign);
                }
                return None;
            }
            Body::Broken => return None,
        };
        match outcome {
            Ok(Ok(effect)) => {
                self.refresh_view();
                effect
            }
            Ok(Err(err)) => {
                self.fault(format!("{err:#}"));
                None
            }
            Err(panic) => {
                self.fault(panic);
                None
            }
        }
    }

    fn refresh_view(&mut self) {
        let rendered = match &self.body {
            Body::Direct(component) => isolate(|| component.view()),
            Body::Bridged(_) | Body::Broken => return,
        };
        match rendered {
            Ok(view) => self.view = view,
            Err(panic) => self.fault(panic),
        }
    }
}

fn to_foreign(message: &Message) -> Option<ForeignMsg> {
    match message {
        Message::Key(key) => translate_key(key).map(ForeignMsg::Key),
        Message::Resize { width, height } => Some(ForeignMsg::Resize {
            cols: *width,
            rows: *height,
        }),
        Message::Mouse(_) | Message::Tick(_) => None,
    }
}

pub struct PreviewHost {
    session: Option<Session>,
    last_id: u64,
    width: u16,
    height: u16,
    focused: bool,
    bridge_tx: UnboundedSender<BridgeEvent>,
}

impl PreviewHost {
    /// `bridge_tx` is the host's output queue handed to every bridged program.
    pub fn new(bridge_tx: UnboundedSender<BridgeEvent>) -> Self {
        Self {
            session: None,
            last_id: 0,
            width: 0,
            height: 0,
            focused: false,
            bridge_tx,
        }
    }

    /// Replace the active session with a new instance built by `factory`.
    ///
    /// The new component sees a viewport-size message before anything else;
    /// the returned effect combines whatever that message and `init` asked for.
    pub fn load(&mut self, factory: &Factory, name: &str) -> Option<Effect> {
        self.unload();

        self.last_id += 1;
        let id = SessionId(self.last_id);
        let (width, height) = self.viewport();
        let resize = Message::Resize { width, height };
        let mut session = Session::new(id, name);
        let mut effect = None;

        match factory {
            Factory::Direct(make) => match isolate(|| make()) {
                Ok(component) => {
                    session.body = Body::Direct(component);
                    let sized = session.update(&resize);
                    let init = session.init();
                    effect = Effect::merge(sized, init);
                }
                Err(panic) => session.fault(panic),
            },
            Factory::Bridged(make) => match isolate(|| make()) {
                Ok(program) => {
                    let first = to_foreign(&resize);
                    match BridgeHandle::start(id, program, self.bridge_tx.clone(), first) {
                        Ok(handle) => session.body = Body::Bridged(handle),
                        Err(err) => session.fault(format!("{err:#}")),
                    }
                }
                Err(panic) => session.fault(panic),
            },
        }

        info!(session = %id, component = name, width, height, "loaded component");
        self.session = Some(session);
        effect
    }

    /// Drop the active session. Bridged programs are told to stop first.
    pub fn unload(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Body::Bridged(handle) = &mut session.body {
                handle.stop();
            }
            debug!(session = %session.id, component = %session.name, "unloaded component");
        }
    }

    /// Deliver `message` to the active session, if any.
    pub fn forward(&mut self, message: &Message) -> Option<Effect> {
        self.session.as_mut()?.update(message)
    }

    /// Deliver a message that was queued on behalf of `session`.
    /// Dropped unless that session is still the live one.
    pub fn deliver(&mut self, session: SessionId, message: &Message) -> Option<Effect> {
        if self.session_id() != Some(session) {
            debug!(%session, ?message, "dropping message for stale session");
            return None;
        }
        self.forward(message)
    }

    /// Mark `session` finished; it keeps its last view but receives nothing more.
    pub fn finish(&mut self, session: SessionId) {
        if let Some(active) = self.session.as_mut().filter(|s| s.id == session) {
            if active.status == SessionStatus::Running {
                info!(session = %session, component = %active.name, "component finished");
                active.status = SessionStatus::Finished;
            }
        }
    }

    /// Apply output or an exit notice from a bridged program.
    ///
    /// Returns `false` when the event belongs to a session that is no longer live.
    pub fn apply_bridge_event(&mut self, event: BridgeEvent) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.id == event.session) else {
            debug!(session = %event.session, "dropping output from stale bridge session");
            return false;
        };
        match event.kind {
            BridgeEventKind::Frame(frame) => session.view = frame,
            BridgeEventKind::Exited(None) => {
                if session.status == SessionStatus::Running {
                    info!(session = %session.id, component = %session.name, "program exited");
                    session.status = SessionStatus::Finished;
                }
            }
            BridgeEventKind::Exited(Some(err)) => session.fault(err),
        }
        true
    }

    /// Store new pane dimensions and tell the active session about its new viewport.
    pub fn resize(&mut self, width: u16, height: u16) -> Option<Effect> {
        self.width = width;
        self.height = height;
        let (width, height) = self.viewport();
        self.forward(&Message::Resize { width, height })
    }

    /// Pane size.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Area available to the component inside the pane chrome.
    pub fn viewport(&self) -> (u16, u16) {
        (
            self.width.saturating_sub(INSET_X),
            self.height.saturating_sub(INSET_Y),
        )
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn has_component(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn component_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.name.as_str())
    }

    pub fn status(&self) -> Option<&SessionStatus> {
        self.session.as_ref().map(|s| &s.status)
    }

    /// Whether the active session runs behind the bridge.
    pub fn is_bridged(&self) -> bool {
        matches!(
            self.session.as_ref().map(|s| &s.body),
            Some(Body::Bridged(_))
        )
    }

    /// Latest rendered output of the active session; `None` before the first load.
    pub fn content(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.view.as_str())
    }

    /// Context line shown under the component.
    pub fn hint(&self) -> &'static str {
        if self.focused {
            HINT_FOCUSED
        } else {
            HINT_UNFOCUSED
        }
    }
}

impl Drop for PreviewHost {
    fn drop(&mut self) {
        self.unload();
    }
}
