//! Score engine
//!
//! Reduces a completed session into a [`ResultsBundle`]. The formula is a
//! fixed, deterministic function of the final allocation:
//!
//! - **Axes**: four unrounded averages of two or three category values
//!   (creativity, community, discipline, advantage), used for the vector map
//! - **Dimensions**: seven competency scores, each capped at 100
//! - **Outlier probability**: the dimension sum divided by 35, clamped to
//!   the display band [5, 25]
//!
//! Scenario and trade-off choices are accepted but do not feed the numbers.
//! Timing and revision data pass straight through.

use sdk::types::{Category, Choice};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allocation::Allocation;
use crate::responses::TimingLog;

/// Dimension cap
pub const DIMENSION_MAX: f64 = 100.0;

/// Lower edge of the outlier display band
pub const OUTLIER_FLOOR: f64 = 5.0;

/// Upper edge of the outlier display band
pub const OUTLIER_CEILING: f64 = 25.0;

/// Divisor mapping the dimension sum (0..=700) onto the outlier band
pub const OUTLIER_DIVISOR: f64 = 35.0;

/// Fixed recommendations shown alongside every result
pub const CRITICAL_LEVERS: [&str; 3] = [
    "Tighten decision rights before you add headcount; otherwise you scale confusion.",
    "Build succession depth now - your bench is thinner than you think.",
    "Invest in change management capabilities before the next pivot hits.",
];

/// Intermediate averages that place the user on the vector map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub creativity: f64,
    pub community: f64,
    pub discipline: f64,
    pub advantage: f64,
}

/// Point on the vector map, in percent of width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorPosition {
    pub x: f64,
    pub y: f64,
}

impl Axes {
    /// Map position: advantage pulls right, community left, creativity up,
    /// discipline down. Not clamped to [0, 100].
    pub fn position(&self) -> VectorPosition {
        VectorPosition {
            x: 50.0 + (self.advantage - self.community) * 2.0,
            y: 50.0 - (self.creativity - self.discipline) * 2.0,
        }
    }
}

/// One of the seven derived competency scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CulturalAlignment,
    LeadershipSuccession,
    Communication,
    TalentRetention,
    DecisionRights,
    ChangeMgmt,
    Incentives,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::CulturalAlignment,
        Dimension::LeadershipSuccession,
        Dimension::Communication,
        Dimension::TalentRetention,
        Dimension::DecisionRights,
        Dimension::ChangeMgmt,
        Dimension::Incentives,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::CulturalAlignment => "Cultural Alignment",
            Dimension::LeadershipSuccession => "Leadership Succession",
            Dimension::Communication => "Communication",
            Dimension::TalentRetention => "Talent Retention",
            Dimension::DecisionRights => "Decision Rights",
            Dimension::ChangeMgmt => "Change Mgmt",
            Dimension::Incentives => "Incentives",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse rating of a dimension score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// Below 50
    Low,
    /// 50 up to 70
    Moderate,
    /// 70 and above
    Strong,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score < 50.0 {
            ScoreBand::Low
        } else if score < 70.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Strong
        }
    }
}

/// The seven dimension scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub cultural_alignment: f64,
    pub leadership_succession: f64,
    pub communication: f64,
    pub talent_retention: f64,
    pub decision_rights: f64,
    pub change_mgmt: f64,
    pub incentives: f64,
}

impl Dimensions {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::CulturalAlignment => self.cultural_alignment,
            Dimension::LeadershipSuccession => self.leadership_succession,
            Dimension::Communication => self.communication,
            Dimension::TalentRetention => self.talent_retention,
            Dimension::DecisionRights => self.decision_rights,
            Dimension::ChangeMgmt => self.change_mgmt,
            Dimension::Incentives => self.incentives,
        }
    }

    /// Dimensions in display order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, score)| score).sum()
    }
}

/// Latency and revision data carried through unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePatterns {
    pub response_time: TimingLog,
    pub revisions: u32,
}

/// Everything handed to the presentation layer at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsBundle {
    pub vector_map: Axes,
    pub dimensions: Dimensions,
    pub outlier_probability: f64,
    pub response_patterns: ResponsePatterns,
}

/// Stateless scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the results bundle
    ///
    /// Referentially transparent: identical inputs always give identical
    /// output. `_scenario_responses` and `_tradeoff_responses` are part of the
    /// contract but do not currently affect any score.
    pub fn compute(
        &self,
        allocation: &Allocation,
        _scenario_responses: &[Option<usize>],
        _tradeoff_responses: &[Option<Choice>],
        timing: &TimingLog,
        revisions: u32,
    ) -> ResultsBundle {
        let axes = Self::axes(allocation);
        let dimensions = Self::dimensions(allocation, &axes);
        let outlier_probability = Self::outlier_probability(&dimensions);

        ResultsBundle {
            vector_map: axes,
            dimensions,
            outlier_probability,
            response_patterns: ResponsePatterns {
                response_time: timing.clone(),
                revisions,
            },
        }
    }

    pub fn axes(allocation: &Allocation) -> Axes {
        let v = |c: Category| allocation.as_f64(c);

        Axes {
            creativity: (v(Category::Speed) + v(Category::Change) + v(Category::Customer)) / 3.0,
            community: (v(Category::Rituals) + v(Category::Bench)) / 2.0,
            discipline: (v(Category::Quality) + v(Category::Clarity) + v(Category::Comp)) / 3.0,
            advantage: (v(Category::Customer) + v(Category::Speed)) / 2.0,
        }
    }

    pub fn dimensions(allocation: &Allocation, axes: &Axes) -> Dimensions {
        let v = |c: Category| allocation.as_f64(c);
        let cap = |raw: f64| raw.min(DIMENSION_MAX);

        Dimensions {
            cultural_alignment: cap((axes.community + axes.creativity) * 2.0),
            leadership_succession: cap(v(Category::Bench) * 4.0),
            communication: cap((v(Category::Rituals) + v(Category::Clarity)) * 2.5),
            talent_retention: cap((v(Category::Bench) + v(Category::Comp)) * 2.5),
            decision_rights: cap(v(Category::Clarity) * 4.0),
            change_mgmt: cap(v(Category::Change) * 4.0),
            incentives: cap(v(Category::Comp) * 4.0),
        }
    }

    pub fn outlier_probability(dimensions: &Dimensions) -> f64 {
        (dimensions.sum() / OUTLIER_DIVISOR).clamp(OUTLIER_FLOOR, OUTLIER_CEILING)
    }
}
