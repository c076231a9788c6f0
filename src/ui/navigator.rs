//! # Navigator
//!
//! Cursor and scroll state for the list pane. Indices refer to the flattened
//! view of the [`EntryTree`] and are re-clamped after anything that changes
//! the number of visible rows.

use crate::registry::{EntryTree, FlatEntry};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use std::ops::Range;
use tracing::debug;

/// Rows of the pane not available for entries: two border rows plus the
/// "more above" and "more below" indicator lines.
pub const RESERVED_ROWS: u16 = 4;

/// What a navigator input did, for the shell controller to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Input was not a navigator key.
    Ignored,
    /// Selection may have changed.
    Moved,
    /// A group was expanded or collapsed.
    Toggled,
    /// A component row was activated.
    Activated,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    selected: usize,
    offset: usize,
    focused: bool,
    width: u16,
    height: u16,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.ensure_visible();
    }

    /// Entry rows that fit in the pane, never less than one.
    pub fn visible_rows(&self) -> usize {
        usize::from(self.height.saturating_sub(RESERVED_ROWS)).max(1)
    }

    /// Move the cursor to `index`, clamped to `[0, count - 1]`.
    pub fn select(&mut self, index: usize, count: usize) {
        self.selected = index.min(count.saturating_sub(1));
        self.ensure_visible();
    }

    pub fn move_by(&mut self, delta: isize, count: usize) {
        let target = self.selected.saturating_add_signed(delta);
        self.select(target, count);
    }

    pub fn first(&mut self, count: usize) {
        self.select(0, count);
    }

    pub fn last(&mut self, count: usize) {
        self.select(count.saturating_sub(1), count);
    }

    /// Re-validate the cursor after the row count changed.
    pub fn clamp(&mut self, count: usize) {
        self.select(self.selected, count);
        let max_offset = count.saturating_sub(self.visible_rows());
        self.offset = self.offset.min(max_offset).min(self.selected);
    }

    /// Scroll by the minimum needed to keep the cursor on screen.
    fn ensure_visible(&mut self) {
        let rows = self.visible_rows();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + rows {
            self.offset = self.selected + 1 - rows;
        }
    }

    /// Flattened indices currently drawn.
    pub fn visible_range(&self, count: usize) -> Range<usize> {
        let start = self.offset.min(count);
        let end = (self.offset + self.visible_rows()).min(count);
        start..end
    }

    pub fn has_more_above(&self) -> bool {
        self.offset > 0
    }

    pub fn has_more_below(&self, count: usize) -> bool {
        self.offset + self.visible_rows() < count
    }

    pub fn handle_key(&mut self, tree: &mut EntryTree, key: &KeyEvent) -> NavOutcome {
        let count = tree.count();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1, count),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1, count),
            KeyCode::Home | KeyCode::Char('g') => self.first(count),
            KeyCode::End | KeyCode::Char('G') => self.last(count),
            KeyCode::PageUp => self.move_by(-(self.visible_rows() as isize), count),
            KeyCode::PageDown => self.move_by(self.visible_rows() as isize, count),
            KeyCode::Right | KeyCode::Char('l') => {
                return self.after_toggle(tree, |tree, index| tree.expand_at(index));
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if tree.collapse_at(self.selected) {
                    debug!(index = self.selected, "collapsed group");
                    self.clamp(tree.count());
                    return NavOutcome::Toggled;
                }
                if let Some(parent) = tree.parent_of(self.selected) {
                    self.select(parent, count);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let is_group = match tree.get(self.selected) {
                    Some(row) => row.entry.is_group(),
                    None => return NavOutcome::Ignored,
                };
                if !is_group {
                    return NavOutcome::Activated;
                }
                return self.after_toggle(tree, |tree, index| tree.toggle_group_at(index));
            }
            _ => return NavOutcome::Ignored,
        }
        NavOutcome::Moved
    }

    fn after_toggle(
        &mut self,
        tree: &mut EntryTree,
        toggle: impl FnOnce(&mut EntryTree, usize) -> bool,
    ) -> NavOutcome {
        if !toggle(tree, self.selected) {
            return NavOutcome::Ignored;
        }
        debug!(index = self.selected, "toggled group");
        self.clamp(tree.count());
        NavOutcome::Toggled
    }

    /// Wheel scrolling moves the cursor one row at a time.
    pub fn handle_mouse(&mut self, tree: &EntryTree, mouse: &MouseEvent) -> NavOutcome {
        let count = tree.count();
        match mouse.kind {
            MouseEventKind::ScrollUp => self.move_by(-1, count),
            MouseEventKind::ScrollDown => self.move_by(1, count),
            _ => return NavOutcome::Ignored,
        }
        NavOutcome::Moved
    }

    /// Display text for a row: cursor marker, depth indentation, expansion arrow.
    pub fn row_label(row: &FlatEntry<'_>, selected: bool) -> String {
        let cursor = if selected { "> " } else { "  " };
        let indent = "  ".repeat(row.depth);
        let arrow = match row.entry.expanded() {
            Some(true) => "▼ ",
            Some(false) => "▶ ",
            None => "",
        };
        format!("{cursor}{indent}{arrow}{}", row.entry.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Effect, Message};
    use crate::registry::RegistryBuilder;
    use crossterm::event::{KeyModifiers, MouseEvent};

    struct Blank;

    impl Component for Blank {
        fn update(&mut self, _message: &Message) -> anyhow::Result<Option<Effect>> {
            Ok(None)
        }

        fn view(&self) -> String {
            String::new()
        }
    }

    fn tree_of(n: usize) -> EntryTree {
        let mut builder = RegistryBuilder::new();
        for i in 0..n {
            builder.register(format!("Item {i}"), || Blank);
        }
        builder.build()
    }

    fn gallery() -> EntryTree {
        let mut builder = RegistryBuilder::new();
        builder.register("Welcome", || Blank);
        builder.group("Feedback", |g| {
            g.group("Loading", |g| {
                g.register("Spinner", || Blank);
            });
            g.register("Progress Bar", || Blank);
        });
        builder.build()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn navigator(height: u16) -> Navigator {
        let mut nav = Navigator::new();
        nav.set_size(30, height);
        nav
    }

    #[test]
    fn test_visible_rows_has_floor() {
        assert_eq!(navigator(14).visible_rows(), 10);
        assert_eq!(navigator(4).visible_rows(), 1);
        assert_eq!(navigator(0).visible_rows(), 1);
    }

    #[test]
    fn test_move_is_clamped() {
        let mut tree = tree_of(3);
        let mut nav = navigator(20);
        nav.handle_key(&mut tree, &press(KeyCode::Up));
        assert_eq!(nav.selected(), 0);
        for _ in 0..5 {
            nav.handle_key(&mut tree, &press(KeyCode::Char('j')));
        }
        assert_eq!(nav.selected(), 2);
    }

    #[test]
    fn test_first_and_last() {
        let mut tree = tree_of(7);
        let mut nav = navigator(20);
        nav.handle_key(&mut tree, &press(KeyCode::Char('G')));
        assert_eq!(nav.selected(), 6);
        nav.handle_key(&mut tree, &press(KeyCode::Home));
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn test_scroll_keeps_cursor_in_window() {
        let mut tree = tree_of(50);
        let mut nav = navigator(9); // 5 visible rows
        let count = tree.count();
        let keys = [
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::End,
            KeyCode::Up,
            KeyCode::PageUp,
            KeyCode::Home,
            KeyCode::PageDown,
            KeyCode::PageDown,
            KeyCode::Down,
        ];
        for code in keys {
            nav.handle_key(&mut tree, &press(code));
            assert!(nav.selected() < count);
            assert!(nav.offset() <= nav.selected());
            assert!(nav.selected() < nav.offset() + nav.visible_rows());
        }
    }

    #[test]
    fn test_scroll_moves_minimally() {
        let mut tree = tree_of(20);
        let mut nav = navigator(9);
        for _ in 0..5 {
            nav.handle_key(&mut tree, &press(KeyCode::Down));
        }
        assert_eq!(nav.selected(), 5);
        assert_eq!(nav.offset(), 1);
        nav.handle_key(&mut tree, &press(KeyCode::Up));
        assert_eq!(nav.offset(), 1);
    }

    #[test]
    fn test_shrinking_pane_scrolls_to_cursor() {
        let mut tree = tree_of(20);
        let mut nav = navigator(30);
        nav.last(tree.count());
        assert_eq!(nav.offset(), 0);
        nav.set_size(30, 9);
        assert_eq!(nav.offset(), 15);
        nav.handle_key(&mut tree, &press(KeyCode::Char('g')));
        assert_eq!(nav.offset(), 0);
    }

    #[test]
    fn test_enter_on_group_toggles() {
        let mut tree = gallery();
        let mut nav = navigator(20);
        nav.select(1, tree.count());
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Enter)),
            NavOutcome::Toggled
        );
        assert_eq!(tree.count(), 2);
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Char(' '))),
            NavOutcome::Toggled
        );
        assert_eq!(tree.count(), 5);
    }

    #[test]
    fn test_enter_on_component_activates() {
        let mut tree = gallery();
        let mut nav = navigator(20);
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Enter)),
            NavOutcome::Activated
        );
        assert_eq!(tree.count(), 5);
    }

    #[test]
    fn test_left_collapses_then_jumps_to_parent() {
        let mut tree = gallery();
        let mut nav = navigator(20);
        // Welcome(0) Feedback(1) Loading(2) Spinner(3) Progress Bar(4)
        nav.select(3, tree.count());
        nav.handle_key(&mut tree, &press(KeyCode::Left));
        assert_eq!(nav.selected(), 2);
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Char('h'))),
            NavOutcome::Toggled
        );
        assert_eq!(tree.count(), 4);
        nav.handle_key(&mut tree, &press(KeyCode::Left));
        assert_eq!(nav.selected(), 1);
    }

    #[test]
    fn test_right_expands_only_collapsed_groups() {
        let mut tree = gallery();
        let mut nav = navigator(20);
        nav.select(1, tree.count());
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Right)),
            NavOutcome::Ignored
        );
        tree.collapse_at(1);
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Char('l'))),
            NavOutcome::Toggled
        );
        assert_eq!(tree.count(), 5);
    }

    #[test]
    fn test_collapse_near_end_clamps_cursor() {
        let mut tree = gallery();
        let mut nav = navigator(20);
        nav.last(tree.count());
        tree.toggle_group_at(1);
        nav.clamp(tree.count());
        assert_eq!(nav.selected(), 1);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut tree = gallery();
        let mut nav = navigator(20);
        assert_eq!(
            nav.handle_key(&mut tree, &press(KeyCode::Char('z'))),
            NavOutcome::Ignored
        );
    }

    #[test]
    fn test_mouse_wheel_moves_selection() {
        let tree = tree_of(4);
        let mut nav = navigator(20);
        let wheel = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };
        nav.handle_mouse(&tree, &wheel(MouseEventKind::ScrollDown));
        nav.handle_mouse(&tree, &wheel(MouseEventKind::ScrollDown));
        assert_eq!(nav.selected(), 2);
        nav.handle_mouse(&tree, &wheel(MouseEventKind::ScrollUp));
        assert_eq!(nav.selected(), 1);
    }

    #[test]
    fn test_visible_range_and_indicators() {
        let tree = tree_of(12);
        let mut nav = navigator(9);
        let count = tree.count();
        assert_eq!(nav.visible_range(count), 0..5);
        assert!(!nav.has_more_above());
        assert!(nav.has_more_below(count));
        nav.last(count);
        assert_eq!(nav.visible_range(count), 7..12);
        assert!(nav.has_more_above());
        assert!(!nav.has_more_below(count));
    }

    #[test]
    fn test_row_label() {
        let tree = gallery();
        let rows = tree.flatten();
        assert_eq!(Navigator::row_label(&rows[0], true), "> Welcome");
        assert_eq!(Navigator::row_label(&rows[1], false), "  ▼ Feedback");
        assert_eq!(Navigator::row_label(&rows[3], false), "      Spinner");
    }
}
