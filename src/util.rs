use crate::config::{Theme, Tuning};
use crate::consts;
use crate::highscores::HighScores;
use crate::options::Options;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::path::PathBuf;
use thiserror::Error;

/// State shared by every screen: the selected gameplay options, the
/// simulation tuning, render theme, and the known high scores.  Screens own
/// a copy and pass it along when they hand control to another screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Globals {
    pub(crate) options: Options,
    pub(crate) tuning: Tuning,
    pub(crate) theme: Theme,
    pub(crate) high_scores: HighScores,
}

/// Return the rectangle of [`consts::DISPLAY_SIZE`] in the center of
/// `buffer_area`, inside which everything is drawn
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    let [display] = Layout::horizontal([consts::DISPLAY_SIZE.width])
        .flex(Flex::Center)
        .areas(buffer_area);
    let [display] = Layout::vertical([consts::DISPLAY_SIZE.height])
        .flex(Flex::Center)
        .areas(display);
    display
}

/// Return a rectangle of the given size centered within `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [centered] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(centered);
    centered
}

/// Navigation helpers for fieldless enums deriving [`enum_map::Enum`]
pub(crate) trait EnumExt: Enum + Sized {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

/// Path at which a data file with the given name should be stored
pub(crate) fn data_file_path(name: &str) -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("sidewinder").join(name))
}

/// Failure to load a persisted TOML document (options file)
#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to determine path to {0} file")]
    NoPath(&'static str),
    #[error("failed to read {0} file")]
    Read(&'static str, #[source] std::io::Error),
    #[error("failed to parse {0} file")]
    Parse(&'static str, #[source] toml::de::Error),
}

impl LoadError {
    pub(crate) fn no_path(what: &'static str) -> LoadError {
        LoadError::NoPath(what)
    }
}

/// Failure to save a persisted TOML document (options file)
#[derive(Debug, Error)]
pub(crate) enum SaveError {
    #[error("failed to determine path to {0} file")]
    NoPath(&'static str),
    #[error("failed to create parent directories for {0} file")]
    Mkdir(&'static str, #[source] std::io::Error),
    #[error("failed to serialize {0}")]
    Serialize(&'static str, #[source] toml::ser::Error),
    #[error("failed to write {0} file")]
    Write(&'static str, #[source] std::io::Error),
}

impl SaveError {
    pub(crate) fn no_path(what: &'static str) -> SaveError {
        SaveError::NoPath(what)
    }
}
