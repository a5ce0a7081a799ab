pub mod chart;
pub mod header;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.view, theme);
    chart::render(frame, chunks[1], &app.view.history, theme);
    process_table::render(
        frame,
        chunks[2],
        &app.view.visible_processes,
        app.view.total_processes,
        app.selected_index,
        theme,
    );
    statusbar::render(
        frame,
        chunks[3],
        app.input_mode,
        &app.filter_text,
        app.active_notice(),
        theme,
    );
}
