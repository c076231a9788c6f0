//! Sample widgets shown by the `widgetbook` binary.
//!
//! None of these know anything about the host; they only implement
//! [`Component`](crate::component::Component) or
//! [`ForeignProgram`](crate::bridge::ForeignProgram).

pub mod counter;
pub mod list;
pub mod progress;
pub mod spinner;
pub mod text_input;
pub mod ticker;
pub mod toggle;
pub mod welcome;

use crate::bridge::pty::CommandProgram;
use crate::registry::RegistryBuilder;
use crate::ui::config::CommandSpec;

pub use counter::Counter;
pub use list::FruitList;
pub use progress::ProgressBar;
pub use spinner::Spinner;
pub use text_input::TextInput;
pub use ticker::Ticker;
pub use toggle::Toggle;
pub use welcome::Welcome;

/// Register the built-in gallery.
pub fn register_gallery(registry: &mut RegistryBuilder) {
    registry.register("Welcome", Welcome::new);

    registry.group("Interactive", |g| {
        g.register("Counter", Counter::new);
        g.register("Toggle", Toggle::new);
        g.register("Text Input", TextInput::new);
    });

    registry.group("Data Display", |g| {
        g.register("List", FruitList::default);
    });

    registry.group("Feedback", |g| {
        g.group("Progress", |g| {
            g.register("Progress Bar", ProgressBar::new);
        });
        g.group("Loading", |g| {
            g.register("Spinner", Spinner::new);
            g.register("Spinner (once)", || Spinner::rounds(3));
        });
    });

    registry.group("Bridged", |g| {
        g.register_program("Ticker", Ticker::new);
    });
}

/// Register configured commands as PTY-backed entries.
///
/// Commands sharing a group name land in one group, in order of first
/// appearance; ungrouped commands go to the root.
pub fn register_commands(registry: &mut RegistryBuilder, commands: &[CommandSpec]) {
    let mut groups: Vec<(Option<&str>, Vec<&CommandSpec>)> = Vec::new();
    for spec in commands {
        let group = spec.group.as_deref();
        match groups.iter_mut().find(|(name, _)| *name == group) {
            Some((_, members)) => members.push(spec),
            None => groups.push((group, vec![spec])),
        }
    }

    for (group, members) in groups {
        match group {
            Some(name) => {
                registry.group(name, |g| register_each(g, &members));
            }
            None => register_each(registry, &members),
        }
    }
}

fn register_each(registry: &mut RegistryBuilder, commands: &[&CommandSpec]) {
    for spec in commands {
        let program = CommandProgram::new(&spec.name, &spec.program, spec.args.clone());
        registry.register_program(spec.name.clone(), move || program.clone());
    }
}
