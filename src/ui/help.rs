use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Key bindings listed on the help screen, grouped by section.
pub const KEY_BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q / Ctrl+C", "Quit (closes help first)"),
            ("?", "Toggle this help"),
            ("Tab", "Switch focus between list and preview"),
            ("Esc", "Close help / return to the list"),
        ],
    ),
    (
        "List",
        &[
            ("↑/k  ↓/j", "Move selection"),
            ("g/Home  G/End", "Jump to first / last entry"),
            ("PgUp  PgDn", "Move a page"),
            ("→/l", "Expand group"),
            ("←/h", "Collapse group or go to parent"),
            ("Enter/Space", "Toggle group / focus component"),
            ("Mouse wheel", "Move selection"),
        ],
    ),
    (
        "Preview",
        &[("any other key", "Sent to the component")],
    ),
];

/// Draw the full-screen help overlay.
pub fn render_help(frame: &mut Frame, theme: &Theme, area: Rect) {
    let key_width = KEY_BINDINGS
        .iter()
        .flat_map(|(_, keys)| keys.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![Line::from("")];
    for (section, keys) in KEY_BINDINGS {
        lines.push(Line::from(Span::styled(*section, theme.title_style())));
        for (key, action) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<key_width$}  "), theme.group_style()),
                Span::styled(*action, theme.text()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press ? or Esc to close",
        theme.dim(),
    )));

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(theme.border_style(true)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, area);
}
