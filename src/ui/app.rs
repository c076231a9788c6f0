//! # Shell Controller
//!
//! Top-level state: which pane has focus, whether help is showing, and the
//! routing of every terminal event to the navigator or the preview host.
//! Global keys are checked first, in this order: quit, help, focus switch,
//! back. A selection change in the navigator is the only thing (besides
//! startup) that loads a new component.

use crate::bridge::BridgeEvent;
use crate::component::{Effect, Message};
use crate::host::{PreviewHost, SessionId, SessionStatus, TimerQueue};
use crate::registry::EntryTree;
use crate::ui::navigator::{NavOutcome, Navigator};
use crate::ui::theme::Theme;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

/// Poll interval while nothing is animating.
pub const IDLE_POLL: Duration = Duration::from_millis(100);
/// Poll interval while a bridged program may be pushing frames (~60fps).
pub const BRIDGED_POLL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    List,
    Preview,
}

pub struct App {
    pub tree: EntryTree,
    pub navigator: Navigator,
    pub preview: PreviewHost,
    pub focus: FocusPane,
    pub show_help: bool,
    pub should_quit: bool,
    pub theme: &'static Theme,
    sidebar_width: u16,
    width: u16,
    height: u16,
    /// Flattened index last compared against the navigator's cursor.
    loaded_index: Option<usize>,
    timers: TimerQueue,
    bridge_rx: UnboundedReceiver<BridgeEvent>,
}

impl App {
    pub fn new(tree: EntryTree, theme: &'static Theme, sidebar_width: u16) -> Self {
        let (bridge_tx, bridge_rx) = mpsc::unbounded_channel();
        let mut navigator = Navigator::new();
        navigator.set_focused(true);
        Self {
            tree,
            navigator,
            preview: PreviewHost::new(bridge_tx),
            focus: FocusPane::List,
            show_help: false,
            should_quit: false,
            theme,
            sidebar_width,
            width: 0,
            height: 0,
            loaded_index: None,
            timers: TimerQueue::new(),
            bridge_rx,
        }
    }

    /// Load the first entry, if there is one.
    pub fn start(&mut self) {
        if self.tree.is_empty() {
            return;
        }
        self.navigator.first(self.tree.count());
        self.loaded_index = Some(0);
        self.load_index(0);
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(*width, *height),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if is_quit(key) {
            if self.show_help {
                self.show_help = false;
            } else {
                self.should_quit = true;
            }
            return;
        }

        if key.code == KeyCode::Char('?') {
            self.show_help = !self.show_help;
            return;
        }

        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Esc => self.set_focus(FocusPane::List),
            _ => match self.focus {
                FocusPane::List => self.route_to_navigator(key),
                FocusPane::Preview => self.forward(Message::Key(*key)),
            },
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if self.show_help {
            return;
        }
        match self.focus {
            FocusPane::List => {
                if self.navigator.handle_mouse(&self.tree, mouse) != NavOutcome::Ignored {
                    self.sync_selection();
                }
            }
            FocusPane::Preview => self.forward(Message::Mouse(*mouse)),
        }
    }

    /// Split the terminal between the panes and resize both.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let sidebar = self.sidebar_width.min(width);
        self.navigator.set_size(sidebar, height);
        let effect = self.preview.resize(width - sidebar, height);
        self.dispatch(effect);
    }

    pub fn toggle_focus(&mut self) {
        let next = match self.focus {
            FocusPane::List => FocusPane::Preview,
            FocusPane::Preview => FocusPane::List,
        };
        self.set_focus(next);
    }

    pub fn set_focus(&mut self, focus: FocusPane) {
        self.focus = focus;
        self.navigator.set_focused(focus == FocusPane::List);
        self.preview.set_focused(focus == FocusPane::Preview);
    }

    fn route_to_navigator(&mut self, key: &KeyEvent) {
        match self.navigator.handle_key(&mut self.tree, key) {
            NavOutcome::Activated => self.set_focus(FocusPane::Preview),
            NavOutcome::Ignored => return,
            NavOutcome::Moved | NavOutcome::Toggled => {}
        }
        self.sync_selection();
    }

    /// Load whatever is under the cursor if the cursor moved.
    fn sync_selection(&mut self) {
        let index = self.navigator.selected();
        if self.loaded_index == Some(index) {
            return;
        }
        debug!(index, "selection changed");
        self.loaded_index = Some(index);
        self.load_index(index);
    }

    /// Load the component at a flattened index. Groups and misses are no-ops.
    fn load_index(&mut self, index: usize) {
        let Some((factory, name)) = self.tree.resolve_component(index) else {
            return;
        };
        if let Some(old) = self.preview.session_id() {
            self.timers.cancel_session(old);
        }
        let effect = self.preview.load(factory, name);
        self.dispatch(effect);
    }

    fn forward(&mut self, message: Message) {
        let effect = self.preview.forward(&message);
        self.dispatch(effect);
    }

    fn dispatch(&mut self, effect: Option<Effect>) {
        if let (Some(effect), Some(session)) = (effect, self.preview.session_id()) {
            self.dispatch_for(session, effect, Instant::now());
        }
    }

    fn dispatch_for(&mut self, session: SessionId, effect: Effect, now: Instant) {
        match effect {
            Effect::After(delay, message) => self.timers.schedule(session, now + delay, message),
            Effect::Batch(effects) => {
                for effect in effects {
                    self.dispatch_for(session, effect, now);
                }
            }
            Effect::Quit => self.preview.finish(session),
        }
    }

    /// Deliver every timer due at `now`. Timers of replaced sessions are dropped.
    pub fn fire_due_timers(&mut self, now: Instant) {
        for (session, message) in self.timers.drain_due(now) {
            if let Some(effect) = self.preview.deliver(session, &message) {
                self.dispatch_for(session, effect, now);
            }
        }
    }

    /// Apply queued output from bridged programs. Returns whether anything
    /// visible changed.
    pub fn pump_bridge(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.bridge_rx.try_recv() {
            changed |= self.preview.apply_bridge_event(event);
        }
        changed
    }

    /// Run everything that does not depend on input: timers, then bridge output.
    pub fn on_idle(&mut self, now: Instant) {
        self.fire_due_timers(now);
        self.pump_bridge();
    }

    /// How long the host loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        if self.preview.is_bridged() && self.preview.status() == Some(&SessionStatus::Running) {
            return BRIDGED_POLL;
        }
        match self.timers.next_deadline() {
            Some(due) => due.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn selected_index(&self) -> usize {
        self.navigator.selected()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn sidebar_width(&self) -> u16 {
        self.sidebar_width
    }

    /// Whether the panes have been sized yet.
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
