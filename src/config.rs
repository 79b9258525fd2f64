use crate::consts;
use crate::options::Options;
use crate::util::{LoadError, SaveError};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Default options when no options file is present
    pub(crate) options: Options,

    /// Simulation parameters
    pub(crate) tuning: Tuning,

    /// Style overrides for the game screen
    pub(crate) theme: Theme,

    /// Settings about data files
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("sidewinder").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist
    /// and `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the filepath at which gameplay options should be stored: the
    /// file given in the configuration or, if that is not set, the default
    /// options file path.
    fn options_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .options_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| Options::default_path().map(Cow::from))
    }

    /// Load gameplay options from a file, falling back to `self.options`
    /// when the file does not exist or option saving is disabled.
    pub(crate) fn load_options(&self) -> Result<Options, LoadError> {
        let r = if !self.files.save_options {
            Ok(None)
        } else if let Some(p) = self.options_file() {
            Options::load(&p)
        } else {
            Err(LoadError::no_path("options"))
        };
        match r {
            Ok(Some(opts)) => Ok(opts),
            Ok(None) => Ok(self.options),
            Err(e) => Err(e),
        }
    }

    /// Save the given gameplay options to a file.
    ///
    /// If `self.files.save_options` is `false`, nothing is saved.
    pub(crate) fn save_options(&self, options: Options) -> Result<(), SaveError> {
        if !self.files.save_options {
            return Ok(());
        }
        if let Some(p) = self.options_file() {
            options.save(&p)
        } else {
            Err(SaveError::no_path("options"))
        }
    }
}

/// The simulation's numeric parameters, fixed for the lifetime of a session.
/// Every component receives these at construction; nothing in the game reads
/// mutable global state.
///
/// Speeds are grid steps per second; distances marked "in cells" are
/// multiplied by [`consts::CELL`] at the point of use.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Tuning {
    /// Speed of a fresh snake
    pub(crate) initial_speed: f32,
    /// Hard ceiling on snake speed outside of a speed boost
    pub(crate) max_speed: f32,
    /// Speed gained from the eating ramp, and per length tier
    pub(crate) speed_increment: f32,
    /// Per-frame smoothing factor pulling a segment's heading toward its
    /// target direction
    pub(crate) turn_rate: f32,
    /// Slack subtracted from a cell when testing self-collision, so that
    /// continuous positions touching corner-to-corner do not count
    pub(crate) collision_margin: f32,
    /// Distance (in cells) within which the head eats food and picks up
    /// power-ups
    pub(crate) eat_radius: f32,
    /// Seconds a special food stays on the board
    pub(crate) special_lifetime: f32,
    /// Seconds between special-food spawn attempts
    pub(crate) special_interval: f32,
    /// Seconds a power-up pickup stays on the board
    pub(crate) powerup_lifetime: f32,
    /// Seconds between power-up spawn attempts
    pub(crate) powerup_interval: f32,
    /// Distance (in cells) within which an active magnet attracts food
    pub(crate) magnet_radius: f32,
    /// World units a magnetized food moves toward the head each frame
    pub(crate) magnet_step: f32,
}

impl Default for Tuning {
    fn default() -> Tuning {
        Tuning {
            initial_speed: 6.0,
            max_speed: 14.0,
            speed_increment: 0.5,
            turn_rate: 0.25,
            collision_margin: 2.0,
            eat_radius: 0.8,
            special_lifetime: 15.0,
            special_interval: 5.0,
            powerup_lifetime: 15.0,
            powerup_interval: 20.0,
            magnet_radius: 5.0,
            magnet_step: 1.5,
        }
    }
}

/// Optional style overrides for the entities on the game screen, written in
/// the configuration file as `parse-style` strings (e.g. `"bold green"`).
/// Anything left unset falls back to the built-in styles in [`consts`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Theme {
    snake: Option<parse_style::Style>,
    food: Option<parse_style::Style>,
    special_food: Option<parse_style::Style>,
    powerup: Option<parse_style::Style>,
    obstacle: Option<parse_style::Style>,
    patrol: Option<parse_style::Style>,
}

macro_rules! theme_accessor {
    ($name:ident, $default:expr) => {
        pub(crate) fn $name(&self) -> ratatui::style::Style {
            self.$name.clone().map(Into::into).unwrap_or($default)
        }
    };
}

impl Theme {
    theme_accessor!(snake, consts::SNAKE_STYLE);
    theme_accessor!(food, consts::FOOD_STYLE);
    theme_accessor!(special_food, consts::SPECIAL_FOOD_STYLE);
    theme_accessor!(powerup, consts::POWERUP_STYLE);
    theme_accessor!(obstacle, consts::OBSTACLE_STYLE);
    theme_accessor!(patrol, consts::PATROL_STYLE);
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which gameplay options should be stored
    pub(crate) options_file: Option<PathBuf>,

    /// Whether to load & save gameplay options in a file
    pub(crate) save_options: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            options_file: None,
            save_options: true,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
