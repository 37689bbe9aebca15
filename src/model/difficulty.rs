use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::helpers::Capitalize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}

/// Attempt budget, duplicate-digit policy and time budget for one difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySettings {
    pub max_attempts: u32,
    pub allow_duplicates: bool,
    pub time_limit_secs: u32,
}

impl Difficulty {
    pub fn all() -> Vec<Difficulty> {
        vec![
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }

    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                max_attempts: 12,
                allow_duplicates: true,
                time_limit_secs: 600,
            },
            Difficulty::Normal => DifficultySettings {
                max_attempts: 10,
                allow_duplicates: true,
                time_limit_secs: 480,
            },
            Difficulty::Hard => DifficultySettings {
                max_attempts: 8,
                allow_duplicates: false,
                time_limit_secs: 360,
            },
            Difficulty::Expert => DifficultySettings {
                max_attempts: 6,
                allow_duplicates: false,
                time_limit_secs: 240,
            },
        }
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.settings().time_limit_secs
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    pub fn display_name(&self) -> String {
        self.as_str().capitalize()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty {:?}; expected easy, normal, hard or expert",
            self.0
        )
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Difficulty::all()
            .into_iter()
            .find(|difficulty| difficulty.as_str() == wanted)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}
