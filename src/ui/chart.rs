use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType};

use crate::engine::Sample;
use crate::ui::theme::Theme;

/// CPU and RAM over the sample window, oldest on the left.
pub fn render(frame: &mut Frame, area: Rect, history: &[Sample], theme: &Theme) {
    let cpu: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.cpu_percent))
        .collect();
    let ram: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.ram_percent))
        .collect();

    let x_max = history.len().saturating_sub(1).max(1) as f64;
    let (first, last) = match (history.first(), history.last()) {
        (Some(first), Some(last)) => (
            first.captured_at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
            last.captured_at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
        ),
        _ => (String::new(), String::new()),
    };

    let datasets = vec![
        Dataset::default()
            .name("cpu")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.cpu_color))
            .data(&cpu),
        Dataset::default()
            .name("ram")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.ram_color))
            .data(&ram),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Performance History ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let axis_style = Style::default().fg(theme.text_secondary);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels([first, last]),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, 100.0])
                .labels(["0", "50", "100"]),
        );

    frame.render_widget(chart, area);
}
