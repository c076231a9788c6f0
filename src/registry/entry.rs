use crate::bridge::ForeignProgram;
use crate::component::Component;
use std::fmt;

/// Builds a fresh in-loop component instance.
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn Component>>;

/// Builds a fresh foreign program to be run behind the bridge.
pub type ProgramFactory = Box<dyn Fn() -> Box<dyn ForeignProgram>>;

/// How a component entry is constructed and embedded.
pub enum Factory {
    /// Runs synchronously inside the host loop.
    Direct(ComponentFactory),
    /// Runs its own loop on a separate thread, driven through the bridge.
    Bridged(ProgramFactory),
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Direct(_) => f.write_str("Factory::Direct"),
            Factory::Bridged(_) => f.write_str("Factory::Bridged"),
        }
    }
}

/// A node in the registry: either a component or a group of entries.
#[derive(Debug)]
pub enum Entry {
    Component {
        name: String,
        factory: Factory,
    },
    Group {
        name: String,
        children: Vec<Entry>,
        expanded: bool,
    },
}

impl Entry {
    pub fn component(name: impl Into<String>, factory: Factory) -> Self {
        Entry::Component {
            name: name.into(),
            factory,
        }
    }

    /// A new group, expanded by default.
    pub fn group(name: impl Into<String>, children: Vec<Entry>) -> Self {
        Entry::Group {
            name: name.into(),
            children,
            expanded: true,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Component { name, .. } | Entry::Group { name, .. } => name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Entry::Group { .. })
    }

    /// `Some(expanded)` for groups, `None` for components.
    pub fn expanded(&self) -> Option<bool> {
        match self {
            Entry::Group { expanded, .. } => Some(*expanded),
            Entry::Component { .. } => None,
        }
    }
}

/// One row of the flattened view.
#[derive(Debug, Clone, Copy)]
pub struct FlatEntry<'a> {
    pub entry: &'a Entry,
    pub depth: usize,
}

impl PartialEq for FlatEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.entry, other.entry) && self.depth == other.depth
    }
}

impl Eq for FlatEntry<'_> {}

/// The hierarchical, ordered registry of components and groups.
///
/// The tree is the single source of truth. Flattened indices are derived on
/// demand and are only valid until the next expansion change.
#[derive(Debug, Default)]
pub struct EntryTree {
    roots: Vec<Entry>,
}

impl EntryTree {
    pub fn new(roots: Vec<Entry>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Entry] {
        &self.roots
    }

    /// Pre-order walk that only descends into expanded groups.
    pub fn flatten(&self) -> Vec<FlatEntry<'_>> {
        let mut rows = Vec::new();
        flatten_into(&self.roots, 0, &mut rows);
        rows
    }

    /// Number of rows in the flattened view.
    pub fn count(&self) -> usize {
        count_visible(&self.roots)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Row at a flattened index.
    pub fn get(&self, index: usize) -> Option<FlatEntry<'_>> {
        self.flatten().get(index).copied()
    }

    /// Factory and display name of the component at a flattened index.
    ///
    /// `None` when the index is out of range or names a group.
    pub fn resolve_component(&self, index: usize) -> Option<(&Factory, &str)> {
        let row = self.get(index)?;
        match row.entry {
            Entry::Component { name, factory } => Some((factory, name.as_str())),
            Entry::Group { .. } => None,
        }
    }

    /// Flip the `expanded` flag of the group at a flattened index.
    ///
    /// Returns `false` (and leaves the tree untouched) when the index is out
    /// of range or names a component.
    pub fn toggle_group_at(&mut self, index: usize) -> bool {
        let mut position = 0;
        toggle_in(&mut self.roots, index, &mut position).unwrap_or(false)
    }

    /// Expand the group at `index` if it is collapsed.
    pub fn expand_at(&mut self, index: usize) -> bool {
        match self.get(index).and_then(|row| row.entry.expanded()) {
            Some(false) => self.toggle_group_at(index),
            _ => false,
        }
    }

    /// Collapse the group at `index` if it is expanded.
    pub fn collapse_at(&mut self, index: usize) -> bool {
        match self.get(index).and_then(|row| row.entry.expanded()) {
            Some(true) => self.toggle_group_at(index),
            _ => false,
        }
    }

    /// Flattened index of the group containing the row at `index`.
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        let rows = self.flatten();
        let depth = rows.get(index)?.depth;
        if depth == 0 {
            return None;
        }
        rows[..index]
            .iter()
            .rposition(|row| row.depth == depth - 1 && row.entry.is_group())
    }
}

fn flatten_into<'a>(entries: &'a [Entry], depth: usize, rows: &mut Vec<FlatEntry<'a>>) {
    for entry in entries {
        rows.push(FlatEntry { entry, depth });
        if let Entry::Group {
            children,
            expanded: true,
            ..
        } = entry
        {
            flatten_into(children, depth + 1, rows);
        }
    }
}

fn count_visible(entries: &[Entry]) -> usize {
    entries
        .iter()
        .map(|entry| match entry {
            Entry::Group {
                children,
                expanded: true,
                ..
            } => 1 + count_visible(children),
            _ => 1,
        })
        .sum()
}

/// Walks visible rows in flattened order, tracking the running position.
/// `Some(_)` once the target row was reached.
fn toggle_in(entries: &mut [Entry], target: usize, position: &mut usize) -> Option<bool> {
    for entry in entries.iter_mut() {
        if *position == target {
            return Some(match entry {
                Entry::Group { expanded, .. } => {
                    *expanded = !*expanded;
                    true
                }
                Entry::Component { .. } => false,
            });
        }
        *position += 1;
        if let Entry::Group {
            children,
            expanded: true,
            ..
        } = entry
        {
            if let Some(done) = toggle_in(children, target, position) {
                return Some(done);
            }
        }
    }
    None
}
