mod app;
mod command;
mod config;
mod consts;
mod events;
mod game;
mod highscores;
mod logo;
mod menu;
mod options;
mod score;
mod util;
mod warning;
use crate::app::App;
use crate::config::Config;
use crate::events::NullAudio;
use crate::highscores::HighScores;
use crate::util::Globals;
use crate::warning::Warning;
use anyhow::Context;
use lexopt::prelude::*;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sidewinder: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main() -> anyhow::Result<ExitCode> {
    let Some(cli) = Cli::parse()? else {
        return Ok(ExitCode::SUCCESS);
    };

    let mut warning = Warning::new();
    let config = match cli.config {
        // An explicitly requested config file must exist and parse
        Some(path) => Config::load(&path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load(&path, true).unwrap_or_else(|e| {
                warning.push_error(&e);
                Config::default()
            }),
            Err(e) => {
                warning.push_error(&e);
                Config::default()
            }
        },
    };
    let options = config.load_options().unwrap_or_else(|e| {
        warning.push_error(&e);
        config.options
    });
    let high_scores = HighScores::load().unwrap_or_else(|e| {
        warning.push_error(&e);
        HighScores::default()
    });
    let globals = Globals {
        options,
        tuning: config.tuning,
        theme: config.theme.clone(),
        high_scores,
    };

    let terminal = ratatui::init();
    let r = App::new(globals, config, NullAudio, warning).run(terminal);
    ratatui::restore();
    Ok(io_exit(r))
}

struct Cli {
    config: Option<PathBuf>,
}

impl Cli {
    /// Parse the command line.  `None` means a help or version request was
    /// already satisfied.
    fn parse() -> Result<Option<Cli>, lexopt::Error> {
        let mut config = None;
        let mut parser = lexopt::Parser::from_env();
        while let Some(arg) = parser.next()? {
            match arg {
                Short('c') | Long("config") => config = Some(PathBuf::from(parser.value()?)),
                Short('h') | Long("help") => {
                    print_help();
                    return Ok(None);
                }
                Short('V') | Long("version") => {
                    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                    return Ok(None);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Some(Cli { config }))
    }
}

fn print_help() {
    println!("Usage: sidewinder [options]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Read configuration from <PATH>");
    println!("  -h, --help           Show this help and exit");
    println!("  -V, --version        Show the version and exit");
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
