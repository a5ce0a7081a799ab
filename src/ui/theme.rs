use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub alert_fg: Color,
    pub alert_bg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub cpu_color: Color,
    pub ram_color: Color,
    pub gauge_unfilled: Color,
    pub selection_bg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            header_accent_bg: Color::Rgb(59, 130, 246),
            header_accent_fg: Color::Rgb(15, 23, 42),
            alert_fg: Color::Rgb(239, 68, 68),
            alert_bg: Color::Rgb(69, 10, 10),
            status_ok: Color::Rgb(16, 185, 129),
            status_err: Color::Rgb(239, 68, 68),
            statusbar_bg: Color::Rgb(15, 23, 42),
            overlay_border: Color::Rgb(51, 65, 85),
            text_primary: Color::Rgb(226, 232, 240),
            text_secondary: Color::Rgb(148, 163, 184),
            pill_key_bg: Color::Rgb(59, 130, 246),
            pill_key_fg: Color::Rgb(15, 23, 42),
            pill_desc_fg: Color::Rgb(203, 213, 225),
            surface_bg: Color::Rgb(30, 41, 59),
            cpu_color: Color::Rgb(59, 130, 246),
            ram_color: Color::Rgb(16, 185, 129),
            gauge_unfilled: Color::Rgb(51, 65, 85),
            selection_bg: Color::Rgb(51, 65, 85),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
