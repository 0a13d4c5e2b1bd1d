use crate::app::App;
use crate::ui::utils::{centered_rect, hex_to_rgb};
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Quit confirmation drawn over the typing screen.
pub fn draw(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 7, f.area());
    let warning = hex_to_rgb(&app.theme.error);

    let lines = vec![
        Line::from(Span::styled(
            "Uninstalling this input method may destabilise your system.",
            Style::default().fg(hex_to_rgb(&app.theme.text)),
        )),
        Line::from(Span::styled(
            "Are you sure you want to remove such an excellent input method?",
            Style::default().fg(hex_to_rgb(&app.theme.sub)),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(warning).add_modifier(Modifier::BOLD)),
            Span::styled(": quit   ", Style::default().fg(hex_to_rgb(&app.theme.sub))),
            Span::styled("n/enter", Style::default().fg(hex_to_rgb(&app.theme.main)).add_modifier(Modifier::BOLD)),
            Span::styled(": keep typing", Style::default().fg(hex_to_rgb(&app.theme.sub))),
        ]),
    ];

    let block = Block::default()
        .title(" Warning - SCP Foundation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(warning))
        .style(Style::default().bg(hex_to_rgb(&app.theme.bg)));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}
