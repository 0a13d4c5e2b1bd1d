use crate::app::App;
use crate::ui::utils::{hex_to_rgb, render_footer, render_header};
use crate::utils::strings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const OUTPUT_LINES: u16 = 8;

pub fn draw(f: &mut Frame, app: &App) {
    render_header(f, app);

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(OUTPUT_LINES + 2 + 3 + 3),
            Constraint::Fill(1),
        ])
        .split(f.area());

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(80),
            Constraint::Fill(1),
        ])
        .split(vertical_layout[1]);

    let active_area = horizontal_layout[1];
    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(OUTPUT_LINES + 2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(active_area);

    let border_style = Style::default().fg(hex_to_rgb(&app.theme.sub_alt));

    // newest lines stay visible, older ones scroll off the top
    let skip = app.visual_lines.len().saturating_sub(OUTPUT_LINES as usize);
    let output_lines: Vec<Line> = app
        .visual_lines
        .iter()
        .skip(skip)
        .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(hex_to_rgb(&app.theme.text)))))
        .collect();

    f.render_widget(
        Paragraph::new(output_lines)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL).border_style(border_style)),
        inner_chunks[0],
    );

    let input_area = inner_chunks[1];
    let visible_width = input_area.width.saturating_sub(3) as usize;
    let visible_input = strings::tail_chars(&app.input, visible_width);
    let caret_style = if app.pending {
        Style::default().bg(hex_to_rgb(&app.theme.error))
    } else {
        Style::default().bg(hex_to_rgb(&app.theme.caret))
    };
    let input_line = Line::from(vec![
        Span::styled(visible_input, Style::default().fg(hex_to_rgb(&app.theme.text))),
        Span::styled(" ", caret_style),
    ]);

    f.render_widget(
        Paragraph::new(input_line)
            .block(Block::default().borders(Borders::ALL).border_style(border_style)),
        input_area,
    );

    let status_color = if app.pending {
        hex_to_rgb(&app.theme.error)
    } else {
        hex_to_rgb(&app.theme.main)
    };
    f.render_widget(
        Paragraph::new(format!("Status: {}", app.status))
            .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD)),
        inner_chunks[2],
    );

    f.render_widget(
        Paragraph::new(app.sample_text()).style(Style::default().fg(hex_to_rgb(&app.theme.sub))),
        inner_chunks[3],
    );

    render_footer(f, app);
}
