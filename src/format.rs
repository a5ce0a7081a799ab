use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_optional_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format_percent(v),
        None => "-".to_string(),
    }
}

/// Gauge ratio for a percentage; readings outside 0..=100 are clamped for display only.
pub fn percent_ratio(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value / 100.0).clamp(0.0, 1.0)
}
