use crate::consts;
use ratatui::{buffer::Buffer, layout::Rect, text::Text, widgets::Widget};

/// The "SIDEWINDER" banner on the main menu
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Logo;

impl Logo {
    pub(crate) const WIDTH: u16 = 53;
    pub(crate) const HEIGHT: u16 = 5;
}

#[rustfmt::skip]
static BANNER: &[&str] = &[
     " ____  _     _               _           _          ",
    r"/ ___|(_) __| | _____      _(_)_ __   __| | ___ _ __",
    r"\___ \| |/ _` |/ _ \ \ /\ / / | '_ \ / _` |/ _ \ '__|",
    r" ___) | | (_| |  __/\ V  V /| | | | | (_| |  __/ |",
    r"|____/|_|\__,_|\___| \_/\_/ |_|_| |_|\__,_|\___|_|",
];

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Text::from_iter(BANNER.iter().copied())
            .style(consts::SNAKE_STYLE)
            .render(area, buf);
    }
}
