use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::game::Game;
use crate::logo::Logo;
use crate::options::{Adjustable, OptKey, OptValue, Options};
use crate::util::{get_display_area, EnumExt, Globals};
use crossterm::event::{read, Event};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
    Frame,
};
use std::io;

static INSTRUCTIONS: &[&str] = &[
    "Steer with ← ↓ ↑ → or w a s d or h j k l.",
    "Eat food, dodge the hazards, grab power-ups.",
    "Esc pauses.",
];

const INSTRUCTIONS_WIDTH: u16 = 44;

/// The main menu: play, tweak gameplay options, or quit
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MainMenu {
    globals: Globals,
    selection: Selection,
    options: OptionsMenu,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> MainMenu {
        let options = OptionsMenu::new(globals.options);
        MainMenu {
            globals,
            selection: Selection::PlayButton,
            options,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (_, Command::P) => return Some(self.play()),
            (_, Command::Q) => return Some(Screen::Quit),
            (_, Command::Home) => self.selection = Selection::PlayButton,
            (_, Command::End) => self.selection = Selection::QuitButton,
            (Selection::PlayButton, Command::Enter) => return Some(self.play()),
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.selection = Selection::Options;
                self.options.select_first();
            }
            (Selection::PlayButton, Command::Up | Command::Prev) => {
                self.selection = Selection::QuitButton;
            }
            (Selection::Options, Command::Up | Command::Prev) => {
                if let Some(sel) = self.options.move_up() {
                    self.selection = sel;
                }
            }
            (Selection::Options, Command::Down | Command::Next) => {
                if let Some(sel) = self.options.move_down() {
                    self.selection = sel;
                }
            }
            (Selection::Options, Command::Left) => self.options.move_left(),
            (Selection::Options, Command::Right) => self.options.move_right(),
            (Selection::Options, Command::Space | Command::Enter) => self.options.toggle(),
            (Selection::QuitButton, Command::Enter) => return Some(Screen::Quit),
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.selection = Selection::Options;
                self.options.select_last();
            }
            (Selection::QuitButton, Command::Down | Command::Next) => {
                self.selection = Selection::PlayButton;
            }
            _ => (),
        }
        None
    }

    fn play(&self) -> Screen {
        let mut globals = self.globals.clone();
        globals.options = self.options.to_options();
        Screen::Game(Game::new(globals))
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, instructions_area, best_area, play_area, options_area, quit_area] =
            Layout::vertical([
                Logo::HEIGHT,
                u16::try_from(INSTRUCTIONS.len()).unwrap_or(u16::MAX),
                1,
                1,
                OptionsMenu::HEIGHT,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([INSTRUCTIONS_WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        for (text, row) in INSTRUCTIONS.iter().zip(instructions_area.rows()) {
            Line::raw(*text).centered().render(row, buf);
        }

        let best = match self.globals.high_scores.get(self.options.to_options()) {
            Some(best) => format!(
                "Best with these settings: {} (level {})",
                best.score, best.level
            ),
            None => String::from("No high score for these settings yet"),
        };
        Line::raw(best).centered().render(best_area, buf);

        let play_style = if self.selection == Selection::PlayButton {
            consts::MENU_SELECTION_STYLE
        } else {
            Style::new()
        };
        Line::from_iter([
            Span::styled("[Play (", play_style),
            Span::styled("p", consts::KEY_STYLE.patch(play_style)),
            Span::styled(")]", play_style),
        ])
        .centered()
        .render(play_area, buf);

        self.options.render(options_area, buf);

        let quit_style = if self.selection == Selection::QuitButton {
            consts::MENU_SELECTION_STYLE
        } else {
            Style::new()
        };
        Line::from_iter([
            Span::styled("[Quit (", quit_style),
            Span::styled("q", consts::KEY_STYLE.patch(quit_style)),
            Span::styled(")]", quit_style),
        ])
        .centered()
        .render(quit_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Selection {
    PlayButton,
    Options,
    QuitButton,
}

/// The block of adjustable options in the middle of the menu
#[derive(Clone, Debug, PartialEq)]
struct OptionsMenu {
    values: EnumMap<OptKey, OptValue>,
    selection: Option<OptKey>,
}

impl OptionsMenu {
    const HEIGHT: u16 = OptKey::LENGTH as u16;
    const WIDTH: u16 = OptKey::DISPLAY_WIDTH + 1 + OptValue::DISPLAY_WIDTH;

    fn new(options: Options) -> OptionsMenu {
        OptionsMenu {
            values: EnumMap::from_fn(|key| options.get(key)),
            selection: None,
        }
    }

    fn to_options(&self) -> Options {
        let mut options = Options::default();
        for key in <OptKey as EnumExt>::iter() {
            options.set(key, self.values[key]);
        }
        options
    }

    fn select_first(&mut self) {
        self.selection = Some(OptKey::min());
    }

    fn select_last(&mut self) {
        self.selection = Some(OptKey::max());
    }

    /// Move the cursor up a row; leaving the block hands the selection back
    /// to the caller
    fn move_up(&mut self) -> Option<Selection> {
        match self.selection?.prev() {
            Some(key) => {
                self.selection = Some(key);
                None
            }
            None => {
                self.selection = None;
                Some(Selection::PlayButton)
            }
        }
    }

    fn move_down(&mut self) -> Option<Selection> {
        match self.selection?.next() {
            Some(key) => {
                self.selection = Some(key);
                None
            }
            None => {
                self.selection = None;
                Some(Selection::QuitButton)
            }
        }
    }

    fn move_left(&mut self) {
        if let Some(key) = self.selection {
            self.values[key].decrease();
        }
    }

    fn move_right(&mut self) {
        if let Some(key) = self.selection {
            self.values[key].increase();
        }
    }

    fn toggle(&mut self) {
        if let Some(key) = self.selection {
            self.values[key].toggle();
        }
    }
}

impl Widget for &OptionsMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([OptionsMenu::WIDTH])
            .flex(Flex::Center)
            .areas(area);
        for (key, row) in <OptKey as EnumExt>::iter().zip(area.rows()) {
            let style = if self.selection == Some(key) {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let text = format!(
                "{key:kw$} {value}",
                value = self.values[key],
                kw = usize::from(OptKey::DISPLAY_WIDTH),
            );
            Line::styled(text, style).render(row, buf);
        }
    }
}
