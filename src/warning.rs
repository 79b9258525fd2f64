use crate::command::Command;
use crate::util::center_rect;
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect, Size},
    style::Style,
    text::Line,
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
    Frame,
};
use std::io;

/// A pop-up listing problems hit during startup (unreadable config file,
/// corrupt high scores).  Purely informational: the program continues with
/// defaults once it is dismissed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Warning {
    lines: Vec<String>,
}

impl Warning {
    const TEXT_WIDTH: u16 = 48;

    pub(crate) fn new() -> Warning {
        Warning::default()
    }

    /// Append an error and its chain of causes, wrapped to the pop-up width
    pub(crate) fn push_error(&mut self, e: &dyn std::error::Error) {
        let opts = textwrap::Options::new(usize::from(Warning::TEXT_WIDTH)).break_words(true);
        for wrapped in textwrap::wrap(&e.to_string(), opts) {
            self.lines.push(wrapped.into_owned());
        }
        let mut source = e.source();
        while let Some(cause) = source {
            let opts = textwrap::Options::new(usize::from(Warning::TEXT_WIDTH))
                .break_words(true)
                .initial_indent("  - ")
                .subsequent_indent("    ");
            for wrapped in textwrap::wrap(&cause.to_string(), opts) {
                self.lines.push(wrapped.into_owned());
            }
            source = cause.source();
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    /// Block for input; `Some(true)` dismisses the warning, `Some(false)`
    /// quits outright
    pub(crate) fn process_input(&mut self) -> io::Result<Option<bool>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<bool> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Enter | Command::Space | Command::Esc => Some(true),
            Command::Quit | Command::Q => Some(false),
            _ => None,
        }
    }
}

impl Widget for &Warning {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(3);
        let popup = center_rect(
            area,
            Size {
                width: Warning::TEXT_WIDTH + 4,
                height,
            },
        );
        Clear.render(popup, buf);
        let block = Block::bordered()
            .title(" WARNING ")
            .title_alignment(Alignment::Center)
            .title_bottom(" press Enter to continue ")
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(popup);
        block.render(popup, buf);
        for (line, row) in self.lines.iter().zip(inner.rows()) {
            Line::raw(line.as_str()).render(row, buf);
        }
    }
}
