use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::engine::ProcessEntry;
use crate::format::{format_optional_percent, format_percent, truncate_unicode};
use crate::ui::theme::Theme;

const NAME_WIDTH: usize = 32;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessEntry],
    total: usize,
    selected_index: usize,
    theme: &Theme,
) {
    let header = Row::new(["PID", "NAME", "CPU", "MEM"]).style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let rows = processes.iter().map(|p| {
        Row::new([
            Cell::from(p.pid.to_string()),
            Cell::from(truncate_unicode(p.display_name(), NAME_WIDTH)),
            Cell::from(format_percent(p.cpu_percent)),
            Cell::from(format_optional_percent(p.memory_percent)),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" Processes {}/{} ", processes.len(), total),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if !processes.is_empty() {
        state.select(Some(selected_index.min(processes.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
