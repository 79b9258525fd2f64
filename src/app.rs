use crate::config::Config;
use crate::events::EventSink;
use crate::game::Game;
use crate::menu::MainMenu;
use crate::options::Options;
use crate::util::Globals;
use crate::warning::Warning;
use ratatui::{backend::Backend, Terminal};
use std::io;

/// The top-level screen state machine
#[derive(Debug)]
pub(crate) struct App<S> {
    screen: Screen,
    globals: Globals,
    config: Config,
    saved_options: Options,
    sink: S,
}

#[derive(Debug)]
pub(crate) enum Screen {
    Warning(Warning),
    Menu(MainMenu),
    Game(Game),
    Quit,
}

impl<S: EventSink> App<S> {
    pub(crate) fn new(globals: Globals, config: Config, sink: S, warning: Warning) -> App<S> {
        let saved_options = globals.options;
        let screen = if warning.is_empty() {
            Screen::Menu(MainMenu::new(globals.clone()))
        } else {
            Screen::Warning(warning)
        };
        App {
            screen,
            globals,
            config,
            saved_options,
            sink,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Warning(ref warning) => {
                terminal.draw(|frame| warning.draw(frame))?;
            }
            Screen::Menu(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Warning(ref mut warning) => match warning.process_input()? {
                Some(true) => Some(Screen::Menu(MainMenu::new(self.globals.clone()))),
                Some(false) => Some(Screen::Quit),
                None => None,
            },
            Screen::Menu(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => {
                let next = game.process_input()?;
                for event in game.take_events() {
                    self.sink.notify(&event);
                }
                next
            }
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.enter(screen);
        }
        Ok(())
    }

    /// Switch screens.  Entering a game persists any option edits made in
    /// the menu; a failed save is not worth interrupting play over.
    fn enter(&mut self, screen: Screen) {
        if let Screen::Game(game) = &screen {
            let options = game.globals().options;
            if options != self.saved_options && self.config.save_options(options).is_ok() {
                self.saved_options = options;
            }
        }
        self.screen = screen;
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}
