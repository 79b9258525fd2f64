use crate::util::{LoadError, SaveError};
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use ratatui::layout::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Most fruits that can be requested at once
pub(crate) const MAX_FRUITS: usize = 10;

/// Gameplay options, editable from the main menu.  A game's high score is
/// recorded under the exact options it was played with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) obstacles: bool,
    pub(crate) moving_obstacles: bool,
    pub(crate) fruits: FruitQty,
    pub(crate) level_size: LevelSize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            obstacles: true,
            moving_obstacles: true,
            fruits: FruitQty(2),
            level_size: LevelSize::Large,
        }
    }
}

impl Options {
    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Obstacles => self.obstacles.into(),
            OptKey::MovingObstacles => self.moving_obstacles.into(),
            OptKey::Fruits => self.fruits.into(),
            OptKey::LevelSize => self.level_size.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match key {
            OptKey::Obstacles => {
                self.obstacles = value
                    .try_into()
                    .expect("Options::set(Obstacles, value) called with non-Bool value");
            }
            OptKey::MovingObstacles => {
                self.moving_obstacles = value
                    .try_into()
                    .expect("Options::set(MovingObstacles, value) called with non-Bool value");
            }
            OptKey::Fruits => {
                self.fruits = value
                    .try_into()
                    .expect("Options::set(Fruits, value) called with non-FruitQty value");
            }
            OptKey::LevelSize => {
                self.level_size = value
                    .try_into()
                    .expect("Options::set(LevelSize, value) called with non-LevelSize value");
            }
        }
    }

    /// Return the default options file path
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_local_dir().map(|p| p.join("sidewinder").join("options.toml"))
    }

    /// Read options from a file on disk.  A missing file is not an error; it
    /// yields `None`.
    pub(crate) fn load(path: &Path) -> Result<Option<Options>, LoadError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::Read("options", e)),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| LoadError::Parse("options", e))
    }

    /// Write the options to a file on disk, creating parent directories
    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| SaveError::Mkdir("options", e))?;
        }
        let src = toml::to_string_pretty(self).map_err(|e| SaveError::Serialize("options", e))?;
        fs_err::write(path, src).map_err(|e| SaveError::Write("options", e))
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Obstacles,
    MovingObstacles,
    Fruits,
    LevelSize,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 16;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OptKey::Obstacles => "Obstacles",
            OptKey::MovingObstacles => "Moving Obstacles",
            OptKey::Fruits => "Fruits",
            OptKey::LevelSize => "Level Size",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    Bool(bool),
    FruitQty,
    LevelSize,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptValue::Bool(false) => write!(f, "   [ ]    "),
            OptValue::Bool(true) => write!(f, "   [✓]    "),
            OptValue::FruitQty(qty) => {
                write!(
                    f,
                    "{left} {qty:^6} {right}",
                    left = if qty.can_decrease() { '◀' } else { '◁' },
                    right = if qty.can_increase() { '▶' } else { '▷' }
                )
            }
            OptValue::LevelSize(sz) => {
                write!(
                    f,
                    "{left} {sz:6} {right}",
                    left = if sz.can_decrease() { '◀' } else { '◁' },
                    right = if sz.can_increase() { '▶' } else { '▷' }
                )
            }
        }
    }
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn toggle(&mut self) {
        *self = !*self;
    }

    fn can_increase(&self) -> bool {
        !*self
    }

    fn can_decrease(&self) -> bool {
        *self
    }
}

/// The size of the playing field, in cells
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum LevelSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl LevelSize {
    pub(crate) const MINIMUM: LevelSize = LevelSize::Small;
    pub(crate) const MAXIMUM: LevelSize = LevelSize::Large;

    pub(crate) fn as_size(self) -> Size {
        match self {
            LevelSize::Small => Size {
                width: 38,
                height: 8,
            },
            LevelSize::Medium => Size {
                width: 53,
                height: 12,
            },
            LevelSize::Large => Size {
                width: 76,
                height: 19,
            },
        }
    }
}

impl fmt::Display for LevelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevelSize::Small => "Small",
            LevelSize::Medium => "Medium",
            LevelSize::Large => "Large",
        };
        f.pad(name)
    }
}

impl Adjustable for LevelSize {
    fn increase(&mut self) {
        match self {
            LevelSize::Small => *self = LevelSize::Medium,
            LevelSize::Medium => *self = LevelSize::Large,
            LevelSize::Large => (),
        }
    }

    fn decrease(&mut self) {
        match self {
            LevelSize::Small => (),
            LevelSize::Medium => *self = LevelSize::Small,
            LevelSize::Large => *self = LevelSize::Medium,
        }
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self != Self::MAXIMUM
    }

    fn can_decrease(&self) -> bool {
        *self != Self::MINIMUM
    }
}

/// How many normal fruits are kept on the board, between 1 and
/// [`MAX_FRUITS`]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "usize", into = "usize")]
pub(crate) struct FruitQty(usize);

impl FruitQty {
    #[allow(unused)]
    pub(crate) fn new(qty: usize) -> Option<FruitQty> {
        (1..=MAX_FRUITS).contains(&qty).then_some(FruitQty(qty))
    }

    pub(crate) fn get(self) -> usize {
        self.0
    }
}

impl Default for FruitQty {
    fn default() -> FruitQty {
        FruitQty(1)
    }
}

impl fmt::Display for FruitQty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl TryFrom<usize> for FruitQty {
    type Error = String;

    fn try_from(qty: usize) -> Result<FruitQty, String> {
        FruitQty::new(qty).ok_or_else(|| format!("fruit quantity out of range: {qty}"))
    }
}

impl From<FruitQty> for usize {
    fn from(qty: FruitQty) -> usize {
        qty.get()
    }
}

impl Adjustable for FruitQty {
    fn increase(&mut self) {
        if self.can_increase() {
            self.0 += 1;
        }
    }

    fn decrease(&mut self) {
        if self.can_decrease() {
            self.0 -= 1;
        }
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        self.0 < MAX_FRUITS
    }

    fn can_decrease(&self) -> bool {
        self.0 > 1
    }
}
