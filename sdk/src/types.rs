//! Core assessment types: categories, stages and trade-off choices

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// One of the eight fixed budget buckets a user allocates tokens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Speed,
    Quality,
    Rituals,
    Bench,
    Change,
    Clarity,
    Comp,
    Customer,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 8] = [
        Category::Speed,
        Category::Quality,
        Category::Rituals,
        Category::Bench,
        Category::Change,
        Category::Clarity,
        Category::Comp,
        Category::Customer,
    ];

    /// Stable identifier used in config files, JSON and the CLI
    pub fn key(self) -> &'static str {
        match self {
            Category::Speed => "speed",
            Category::Quality => "quality",
            Category::Rituals => "rituals",
            Category::Bench => "bench",
            Category::Change => "change",
            Category::Clarity => "clarity",
            Category::Comp => "comp",
            Category::Customer => "customer",
        }
    }

    /// Default human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Category::Speed => "Speed to ship",
            Category::Quality => "Quality bar",
            Category::Rituals => "Cross-functional rituals",
            Category::Bench => "Bench depth",
            Category::Change => "Change readiness",
            Category::Clarity => "Decision clarity",
            Category::Comp => "Comp philosophy integrity",
            Category::Customer => "Customer intimacy",
        }
    }

    /// Position of this category in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| EngineError::UnknownCategory(s.to_string()))
    }
}

/// Assessment stage, strictly ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Intro screen before any input
    Prime,
    /// Round 1: token allocation
    Allocate,
    /// Round 2: scenario ("collision") cards
    Collide,
    /// Round 3: binary trade-offs
    Tradeoff,
    /// Terminal: results computed
    Results,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Prime => "prime",
            Stage::Allocate => "allocate",
            Stage::Collide => "collide",
            Stage::Tradeoff => "tradeoff",
            Stage::Results => "results",
        }
    }

    /// The stage that follows this one, `None` for the terminal stage
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Prime => Some(Stage::Allocate),
            Stage::Allocate => Some(Stage::Collide),
            Stage::Collide => Some(Stage::Tradeoff),
            Stage::Tradeoff => Some(Stage::Results),
            Stage::Results => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Results
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a binary trade-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    pub fn as_char(self) -> char {
        match self {
            Choice::A => 'A',
            Choice::B => 'B',
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Choice {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Choice::A),
            "B" | "b" => Ok(Choice::B),
            other => Err(EngineError::InvalidChoice(other.to_string())),
        }
    }
}

/// Weight vector attached to a scenario response option
///
/// Not consumed by scoring; carried so that content and downstream consumers
/// can use it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisWeights {
    pub trust: i32,
    pub governance: i32,
    pub alignment: i32,
}

impl AxisWeights {
    pub const fn new(trust: i32, governance: i32, alignment: i32) -> Self {
        Self {
            trust,
            governance,
            alignment,
        }
    }
}
