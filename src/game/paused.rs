use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
};

/// The pause pop-up shown over a suspended game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused {
    selection: PauseOpt,
}

impl Paused {
    /// The rectangle to pass to `Paused::render()`
    pub(super) const SIZE: Size = Size {
        width: 19,
        height: 6,
    };

    pub(super) fn new() -> Paused {
        Paused {
            selection: PauseOpt::min(),
        }
    }

    /// Handle an input event.  Returns `Some` if the user made a choice.
    pub(super) fn handle_event(&mut self, event: Event) -> Option<PauseOpt> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Esc => return Some(PauseOpt::Resume),
            Command::R => return Some(PauseOpt::Restart),
            Command::M => return Some(PauseOpt::MainMenu),
            Command::Q | Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter => return Some(self.selection),
            Command::Up => {
                if let Some(opt) = self.selection.prev() {
                    self.selection = opt;
                }
            }
            Command::Down => {
                if let Some(opt) = self.selection.next() {
                    self.selection = opt;
                }
            }
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }
}

/// The choices in the pause menu
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    Resume,
    Restart,
    MainMenu,
    Quit,
}

impl PauseOpt {
    fn label_and_key(self) -> (&'static str, &'static str, &'static str) {
        match self {
            PauseOpt::Resume => ("Resume (", "Esc", ")"),
            PauseOpt::Restart => ("Restart (", "r", ")"),
            PauseOpt::MainMenu => ("Main Menu (", "m", ")"),
            PauseOpt::Quit => ("Quit (", "q", ")"),
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let (label, key, close) = self.label_and_key();
        let marker = if selected { "» " } else { "  " };
        let line = Line::from_iter([
            Span::raw(marker),
            Span::raw(label),
            Span::styled(key, consts::KEY_STYLE),
            Span::raw(close),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for Paused {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        for (opt, row) in <PauseOpt as EnumExt>::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use rstest::rstest;

    fn key(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[rstest]
    #[case(KeyCode::Esc, PauseOpt::Resume)]
    #[case(KeyCode::Char('r'), PauseOpt::Restart)]
    #[case(KeyCode::Char('m'), PauseOpt::MainMenu)]
    #[case(KeyCode::Char('q'), PauseOpt::Quit)]
    fn shortcut_keys(#[case] code: KeyCode, #[case] opt: PauseOpt) {
        let mut paused = Paused::new();
        assert_eq!(paused.handle_event(key(code)), Some(opt));
    }

    #[test]
    fn arrow_navigation_and_enter() {
        let mut paused = Paused::new();
        assert_eq!(paused.handle_event(key(KeyCode::Enter)), Some(PauseOpt::Resume));
        assert_eq!(paused.handle_event(key(KeyCode::Down)), None);
        assert_eq!(paused.handle_event(key(KeyCode::Enter)), Some(PauseOpt::Restart));
        // Up from the top stays put
        let mut paused = Paused::new();
        assert_eq!(paused.handle_event(key(KeyCode::Up)), None);
        assert_eq!(paused.handle_event(key(KeyCode::Enter)), Some(PauseOpt::Resume));
    }

    #[test]
    fn tab_wraps_around() {
        let mut paused = Paused::new();
        for _ in 0..PauseOpt::LENGTH {
            assert_eq!(paused.handle_event(key(KeyCode::Tab)), None);
        }
        assert_eq!(paused.handle_event(key(KeyCode::Enter)), Some(PauseOpt::Resume));
    }
}
