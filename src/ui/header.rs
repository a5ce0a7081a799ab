use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::engine::ViewModel;
use crate::format::{format_percent, percent_ratio};
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_branding(frame, chunks[0], view, theme);
    render_gauge(
        frame,
        chunks[1],
        " CPU ",
        view.latest.cpu_percent,
        theme.cpu_color,
        theme,
    );
    render_gauge(
        frame,
        chunks[2],
        " RAM ",
        view.latest.ram_percent,
        theme.ram_color,
        theme,
    );
}

fn render_branding(frame: &mut Frame, area: Rect, view: &ViewModel, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![Span::styled(
        " gaze ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    )];

    if view.alert.active {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            " CRITICAL CPU LOAD! ",
            Style::default()
                .fg(theme.alert_fg)
                .bg(theme.alert_bg)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ));
    } else {
        spans.push(Span::styled(
            format!("  Procs: {}", view.total_processes),
            Style::default().fg(theme.text_secondary),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    percent: f64,
    color: Color,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color).bg(theme.gauge_unfilled))
        .ratio(percent_ratio(percent))
        .label(format_percent(percent));

    frame.render_widget(gauge, area);
}
