use ratatui::style::Color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use crate::app::App;

pub fn hex_to_rgb(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 && hex.is_ascii() {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
        Color::Rgb(r, g, b)
    } else {
        Color::White
    }
}

/// A `percent_x` × `height` box in the middle of `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_x),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

pub fn render_header(f: &mut Frame, app: &App) {
    let header_spans = vec![
        Span::styled(
            "garble",
            Style::default()
                .fg(hex_to_rgb(&app.theme.main))
                .add_modifier(ratatui::style::Modifier::BOLD),
        ),
        Span::styled(
            format!(" | mode: {}", app.mode),
            Style::default().fg(hex_to_rgb(&app.theme.sub)),
        ),
    ];

    let header_row_area = Rect::new(0, 1, f.area().width, 1);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(82),
            Constraint::Fill(1),
        ])
        .split(header_row_area);

    f.render_widget(Paragraph::new(Line::from(header_spans)), header_layout[1]);
}

pub fn render_footer(f: &mut Frame, app: &App) {
    if f.area().height == 0 {
        return;
    }
    let footer = Paragraph::new("space/enter: commit | ctrl+r: reload map | ctrl+l: clear | esc: quit")
        .style(Style::default().fg(hex_to_rgb(&app.theme.sub)))
        .alignment(Alignment::Center);
    f.render_widget(footer, Rect::new(0, f.area().height - 1, f.area().width, 1));
}
