use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::InputMode;
use crate::engine::{Notice, NoticeLevel};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    filter_text: &str,
    notice: Option<&Notice>,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let line = match (input_mode, notice) {
        (InputMode::ConfirmKill(pid), _) => {
            let mut spans = vec![Span::styled(
                format!(" Kill PID {pid}? "),
                Style::default()
                    .fg(theme.status_err)
                    .add_modifier(Modifier::BOLD),
            )];
            spans.extend(pill_spans("y", "Confirm", theme));
            spans.extend(pill_spans("any", "Cancel", theme));
            Line::from(spans)
        }
        (InputMode::Filter, _) => {
            let mut spans = vec![
                Span::styled(
                    " / ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {filter_text}"),
                    Style::default().fg(theme.pill_desc_fg),
                ),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Apply", theme));
            Line::from(spans)
        }
        // Notice takes priority over the key hints
        (InputMode::Normal, Some(notice)) => {
            let color = match notice.level {
                NoticeLevel::Info => theme.status_ok,
                NoticeLevel::Error => theme.status_err,
            };
            Line::from(Span::styled(
                format!(" {}", notice.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        (InputMode::Normal, None) if !filter_text.is_empty() => {
            let mut spans = vec![
                Span::styled(
                    " Filter: ",
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(filter_text, Style::default().fg(theme.pill_desc_fg)),
            ];
            spans.extend(pill_spans("Esc", "Clear", theme));
            spans.extend(pill_spans("/", "Edit", theme));
            Line::from(spans)
        }
        (InputMode::Normal, None) => {
            let mut spans = Vec::new();
            spans.extend(pill_spans("q", "Quit", theme));
            spans.extend(pill_spans("/", "Filter", theme));
            spans.extend(pill_spans("k", "Kill", theme));
            spans.extend(pill_spans("r", "Refresh", theme));
            spans.extend(pill_spans("\u{2191}\u{2193}", "Select", theme));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
