use crate::component::{Component, Effect, Message};
use crossterm::event::KeyCode;

const FRUITS: [&str; 7] = [
    "Apple",
    "Banana",
    "Cherry",
    "Date",
    "Elderberry",
    "Fig",
    "Grape",
];

/// Rows used by the title, blank lines and the footer.
const CHROME_ROWS: u16 = 5;

/// Scrollable single-selection list.
#[derive(Debug)]
pub struct FruitList {
    items: Vec<String>,
    selected: usize,
    offset: usize,
    rows: usize,
}

impl Default for FruitList {
    fn default() -> Self {
        Self::new(FRUITS.iter().map(ToString::to_string).collect())
    }
}

impl FruitList {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            rows: items.len().max(1),
            items,
            selected: 0,
            offset: 0,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.items.len().saturating_sub(1));
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.rows {
            self.offset = self.selected + 1 - self.rows;
        }
    }
}

impl Component for FruitList {
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        match message {
            Message::Resize { height, .. } => {
                self.rows = usize::from(height.saturating_sub(CHROME_ROWS)).max(1);
                self.select(self.selected);
            }
            Message::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
                KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
                KeyCode::Home | KeyCode::Char('g') => self.select(0),
                KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
                _ => {}
            },
            _ => {}
        }
        Ok(None)
    }

    fn view(&self) -> String {
        let mut out = String::from("Fruits\n\n");
        let end = (self.offset + self.rows).min(self.items.len());
        for (index, item) in self.items[self.offset..end].iter().enumerate() {
            let index = index + self.offset;
            let marker = if index == self.selected { ">" } else { " " };
            out.push_str(&format!("{marker} {}. {item}\n", index + 1));
        }
        out.push_str("\n(Use arrow keys to navigate)");
        out
    }
}
