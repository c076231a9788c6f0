use super::entry::{Entry, EntryTree, Factory};
use crate::bridge::ForeignProgram;
use crate::component::Component;

struct OpenGroup {
    name: String,
    children: Vec<Entry>,
}

/// Collects registrations at startup and produces an [`EntryTree`].
///
/// The "current group" is an explicit stack owned by the builder, so nested
/// registration never touches shared state.
///
/// ```
/// use widgetbook::registry::RegistryBuilder;
/// # use widgetbook::component::{Component, Effect, Message};
/// # struct Counter;
/// # impl Component for Counter {
/// #     fn update(&mut self, _m: &Message) -> anyhow::Result<Option<Effect>> { Ok(None) }
/// #     fn view(&self) -> String { String::new() }
/// # }
/// let mut registry = RegistryBuilder::new();
/// registry.register("Counter", || Counter);
/// registry.group("Feedback", |g| {
///     g.register("Another Counter", || Counter);
/// });
/// let tree = registry.build();
/// assert_eq!(tree.count(), 3);
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    roots: Vec<Entry>,
    stack: Vec<OpenGroup>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Vec<Entry> {
        match self.stack.last_mut() {
            Some(group) => &mut group.children,
            None => &mut self.roots,
        }
    }

    /// Append an in-loop component to the current group.
    pub fn register<C, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        C: Component + 'static,
        F: Fn() -> C + 'static,
    {
        let factory = Factory::Direct(Box::new(move || -> Box<dyn Component> {
            Box::new(factory())
        }));
        self.register_factory(name, factory)
    }

    /// Append a foreign program (run behind the bridge) to the current group.
    pub fn register_program<P, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        P: ForeignProgram,
        F: Fn() -> P + 'static,
    {
        let factory = Factory::Bridged(Box::new(move || -> Box<dyn ForeignProgram> {
            Box::new(factory())
        }));
        self.register_factory(name, factory)
    }

    pub fn register_factory(&mut self, name: impl Into<String>, factory: Factory) -> &mut Self {
        self.current().push(Entry::component(name, factory));
        self
    }

    /// Open a group; subsequent registrations nest inside it until [`end_group`](Self::end_group).
    pub fn begin_group(&mut self, name: impl Into<String>) -> &mut Self {
        self.stack.push(OpenGroup {
            name: name.into(),
            children: Vec::new(),
        });
        self
    }

    /// Close the innermost open group. No-op when none is open.
    pub fn end_group(&mut self) -> &mut Self {
        if let Some(group) = self.stack.pop() {
            let entry = Entry::group(group.name, group.children);
            self.current().push(entry);
        }
        self
    }

    /// Register the entries added by `body` inside a group named `name`.
    pub fn group(&mut self, name: impl Into<String>, body: impl FnOnce(&mut Self)) -> &mut Self {
        let depth = self.stack.len();
        self.begin_group(name);
        body(self);
        while self.stack.len() > depth {
            self.end_group();
        }
        self
    }

    /// Finish registration, closing any groups left open.
    pub fn build(mut self) -> EntryTree {
        while !self.stack.is_empty() {
            self.end_group();
        }
        EntryTree::new(self.roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Effect, Message};

    struct Label(&'static str);

    impl Component for Label {
        fn update(&mut self, _message: &Message) -> anyhow::Result<Option<Effect>> {
            Ok(None)
        }

        fn view(&self) -> String {
            self.0.to_string()
        }
    }

    fn rows(tree: &EntryTree) -> Vec<(String, usize, bool)> {
        tree.flatten()
            .iter()
            .map(|row| (row.entry.name().to_string(), row.depth, row.entry.is_group()))
            .collect()
    }

    #[test]
    fn test_register_at_root() {
        let mut builder = RegistryBuilder::new();
        builder.register("A", || Label("a")).register("B", || Label("b"));
        let tree = builder.build();
        assert_eq!(
            rows(&tree),
            vec![("A".to_string(), 0, false), ("B".to_string(), 0, false)]
        );
    }

    #[test]
    fn test_nested_groups_with_closures() {
        let mut builder = RegistryBuilder::new();
        builder.group("Feedback", |g| {
            g.group("Progress", |g| {
                g.register("Bar", || Label("bar"));
            });
            g.group("Loading", |g| {
                g.register("Spinner", || Label("spin"));
            });
        });
        let tree = builder.build();
        assert_eq!(
            rows(&tree),
            vec![
                ("Feedback".to_string(), 0, true),
                ("Progress".to_string(), 1, true),
                ("Bar".to_string(), 2, false),
                ("Loading".to_string(), 1, true),
                ("Spinner".to_string(), 2, false),
            ]
        );
    }

    #[test]
    fn test_begin_end_pairs() {
        let mut builder = RegistryBuilder::new();
        builder
            .begin_group("Input")
            .register("Text", || Label("t"))
            .end_group()
            .register("Root", || Label("r"));
        let tree = builder.build();
        assert_eq!(
            rows(&tree),
            vec![
                ("Input".to_string(), 0, true),
                ("Text".to_string(), 1, false),
                ("Root".to_string(), 0, false),
            ]
        );
    }

    #[test]
    fn test_unbalanced_end_group_is_noop() {
        let mut builder = RegistryBuilder::new();
        builder.end_group().register("A", || Label("a")).end_group();
        assert_eq!(builder.build().count(), 1);
    }

    #[test]
    fn test_build_closes_open_groups() {
        let mut builder = RegistryBuilder::new();
        builder
            .begin_group("Outer")
            .begin_group("Inner")
            .register("Leaf", || Label("l"));
        let tree = builder.build();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_empty_group_allowed() {
        let mut builder = RegistryBuilder::new();
        builder.group("Nothing yet", |_| {});
        let tree = builder.build();
        assert_eq!(rows(&tree), vec![("Nothing yet".to_string(), 0, true)]);
    }

    #[test]
    fn test_factories_are_not_invoked_at_registration() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut builder = RegistryBuilder::new();
        builder.register("Lazy", move || {
            seen.set(seen.get() + 1);
            Label("lazy")
        });
        let tree = builder.build();
        assert_eq!(calls.get(), 0);

        if let Some((Factory::Direct(make), _)) = tree.resolve_component(0) {
            assert_eq!(make().view(), "lazy");
        }
        assert_eq!(calls.get(), 1);
    }
}
