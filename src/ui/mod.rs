pub mod confirm;
pub mod typing;
pub mod utils;

use crate::app::App;
use crate::models::AppState;
use crate::ui::utils::hex_to_rgb;
use ratatui::{
    style::Style,
    widgets::Block,
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let bg_color = hex_to_rgb(&app.theme.bg);
    f.render_widget(
        Block::default().style(Style::default().bg(bg_color)),
        f.area(),
    );

    typing::draw(f, app);

    if app.state == AppState::ConfirmQuit {
        confirm::draw(f, app);
    }
}
