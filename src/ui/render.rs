use crate::host::preview::EMPTY_STATE;
use crate::host::SessionStatus;
use crate::ui::app::App;
use crate::ui::help::render_help;
use crate::ui::navigator::Navigator;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

pub const LOADING: &str = "Loading...";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base()), area);

    if !app.is_ready() {
        frame.render_widget(Paragraph::new(LOADING).style(app.theme.dim()), area);
        return;
    }

    if app.show_help {
        render_help(frame, app.theme, area);
        return;
    }

    // Sidebar + preview, side by side
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.sidebar_width().min(area.width)),
            Constraint::Min(0),
        ])
        .split(area);

    render_navigator(frame, app, chunks[0]);
    render_preview(frame, app, chunks[1]);
}

fn render_navigator(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let nav = &app.navigator;
    let rows = app.tree.flatten();

    let indicator = |shown: bool, text: &'static str| {
        if shown {
            Line::from(Span::styled(text, theme.dim()))
        } else {
            Line::from("")
        }
    };

    let mut lines = vec![indicator(nav.has_more_above(), "  ↑ more")];
    for index in nav.visible_range(rows.len()) {
        let row = &rows[index];
        let selected = index == nav.selected();
        let style = if selected {
            theme.selected_style()
        } else if row.entry.is_group() {
            theme.group_style()
        } else {
            theme.text()
        };
        lines.push(Line::from(Span::styled(
            Navigator::row_label(row, selected),
            style,
        )));
    }
    // Keep the lower indicator on the last row of the pane.
    let body_rows = usize::from(area.height.saturating_sub(3));
    while lines.len() < body_rows {
        lines.push(Line::from(""));
    }
    lines.push(indicator(nav.has_more_below(rows.len()), "  ↓ more"));

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Components ")
            .border_style(theme.border_style(nav.is_focused())),
    );

    frame.render_widget(list, area);
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let preview = &app.preview;

    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(2, 2, 1, 1))
        .border_style(theme.border_style(preview.is_focused()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + gap
            Constraint::Min(0),    // component
            Constraint::Length(2), // gap + hint
        ])
        .split(inner);

    let Some(name) = preview.component_name() else {
        frame.render_widget(Paragraph::new(EMPTY_STATE).style(theme.dim()), chunks[1]);
        return;
    };

    let mut title = vec![Span::styled(name.to_string(), theme.title_style())];
    match preview.status() {
        Some(SessionStatus::Finished) => {
            title.push(Span::styled("  ✓ finished", theme.dim().fg(theme.success)));
        }
        Some(SessionStatus::Faulted(_)) => {
            title.push(Span::styled("  ✗ failed", theme.error_style()));
        }
        _ => {}
    }
    frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    let body = match preview.status() {
        Some(SessionStatus::Faulted(message)) => {
            Paragraph::new(format!("Error: {message}")).style(theme.error_style())
        }
        _ => Paragraph::new(preview.content().unwrap_or_default().to_string())
            .style(theme.text()),
    };
    frame.render_widget(body, chunks[1]);

    let hint_area = Rect {
        y: chunks[2].y + chunks[2].height.saturating_sub(1),
        height: chunks[2].height.min(1),
        ..chunks[2]
    };
    frame.render_widget(Paragraph::new(preview.hint()).style(theme.dim()), hint_area);
}
