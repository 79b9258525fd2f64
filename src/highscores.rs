use crate::options::Options;
use crate::util::data_file_path;
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::Path;
use thiserror::Error;

/// The best result achieved under one set of options
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Best {
    pub(crate) score: NonZeroU32,
    pub(crate) level: u32,
}

/// Best scores per gameplay [`Options`], stored on disk as a JSON array
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HighScores(HashMap<Options, Best>);

impl HighScores {
    pub(crate) fn load() -> Result<HighScores, LoadError> {
        let path = data_file_path("highscores.json").ok_or(LoadError::NoPath)?;
        HighScores::load_from(&path)
    }

    pub(crate) fn save(&self) -> Result<(), SaveError> {
        let path = data_file_path("highscores.json").ok_or(SaveError::NoPath)?;
        self.save_to(&path)
    }

    fn load_from(path: &Path) -> Result<HighScores, LoadError> {
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HighScores::default())
            }
            Err(e) => return Err(LoadError::Read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::Deserialize)
    }

    fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::Mkdir)?;
        }
        let mut src = serde_json::to_string(self).map_err(SaveError::Serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::Write)?;
        Ok(())
    }

    pub(crate) fn get(&self, opts: Options) -> Option<Best> {
        self.0.get(&opts).copied()
    }

    /// Record a finished game.  Returns `true` if it set a new best for
    /// these options.
    pub(crate) fn record(&mut self, opts: Options, score: u32, level: u32) -> bool {
        let Some(score) = NonZeroU32::new(score) else {
            return false;
        };
        match self.0.get(&opts) {
            Some(best) if best.score >= score => false,
            _ => {
                self.0.insert(opts, Best { score, level });
                true
            }
        }
    }

    fn to_json_array(&self) -> Vec<HighScoreEntry> {
        self.0
            .iter()
            .map(|(&options, &best)| HighScoreEntry {
                options,
                score: best.score,
                level: best.level,
            })
            .collect()
    }

    fn from_json_array(array: Vec<HighScoreEntry>) -> HighScores {
        HighScores(
            array
                .into_iter()
                .map(|entry| {
                    (
                        entry.options,
                        Best {
                            score: entry.score,
                            level: entry.level,
                        },
                    )
                })
                .collect(),
        )
    }
}

impl Serialize for HighScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<HighScoreEntry>::deserialize(deserializer).map(HighScores::from_json_array)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct HighScoreEntry {
    options: Options,
    score: NonZeroU32,
    level: u32,
}

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read high scores file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize high scores")]
    Deserialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub(crate) enum SaveError {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize high scores")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write high scores to disk")]
    Write(#[source] std::io::Error),
}
