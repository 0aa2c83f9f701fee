//! Response collection for the scenario and trade-off rounds
//!
//! [`ResponseCollector`] tracks an answer pointer for each round, stores the
//! chosen option per slot, counts revisions and stamps per-question latency
//! into a [`TimingLog`].
//!
//! Timing is driven by the caller: every mutating call takes the current
//! clock reading in milliseconds, which keeps this module free of any clock
//! dependency.
//!
//! Revision rules:
//! - a scenario may be re-answered only while it is the most recently
//!   answered one and the scenario round is still live
//! - a revision increments the global revision counter, re-stamps the
//!   scenario's timing key and leaves the pointer where it is
//! - trade-offs cannot be revised

use sdk::catalog::Catalog;
use sdk::errors::EngineError;
use sdk::types::Choice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Timing key for a scenario question
pub fn scenario_key(index: usize) -> String {
    format!("scenario_{}", index)
}

/// Timing key for a trade-off question
pub fn tradeoff_key(index: usize) -> String {
    format!("tradeoff_{}", index)
}

/// Elapsed milliseconds between question display and answer, per question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingLog {
    entries: BTreeMap<String, u64>,
}

impl TimingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the latency for a key
    pub fn record(&mut self, key: String, elapsed_ms: u64) {
        self.entries.insert(key, elapsed_ms);
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all recorded latencies
    pub fn total_ms(&self) -> u64 {
        self.entries.values().sum()
    }
}

/// Result of a scenario answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// New answer; `next` is now the current scenario
    Advanced { next: usize },
    /// New answer to the last scenario; the round is over
    Completed,
    /// The most recent answer was replaced
    Revised,
}

/// Result of a trade-off answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeoffOutcome {
    Advanced { next: usize },
    Completed,
}

/// Ordered answers, revisions and latencies for both question rounds
#[derive(Debug, Clone)]
pub struct ResponseCollector {
    /// Option count per scenario, for range checks
    option_counts: Vec<usize>,
    scenario_answers: Vec<Option<usize>>,
    scenario_pointer: usize,
    tradeoff_answers: Vec<Option<Choice>>,
    tradeoff_pointer: usize,
    revisions: u32,
    timing: TimingLog,
    /// Clock reading when the current question was shown
    question_started_ms: u64,
}

impl ResponseCollector {
    /// Empty collector sized for the catalog's scenario and trade-off lists
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            option_counts: catalog.scenarios.iter().map(|s| s.options.len()).collect(),
            scenario_answers: vec![None; catalog.scenarios.len()],
            scenario_pointer: 0,
            tradeoff_answers: vec![None; catalog.tradeoffs.len()],
            tradeoff_pointer: 0,
            revisions: 0,
            timing: TimingLog::new(),
            question_started_ms: 0,
        }
    }

    /// Mark the current question as shown at `now_ms`
    pub fn start_question(&mut self, now_ms: u64) {
        self.question_started_ms = now_ms;
    }

    /// Record an answer to scenario `index`
    ///
    /// `index` must be the current scenario (a new answer) or the most
    /// recently answered one while the round is still live (a revision).
    ///
    /// # Errors
    ///
    /// - `ScenarioIndex` if `index` is neither
    /// - `OptionOutOfRange` if the scenario has no option `option`
    pub fn record_scenario_answer(
        &mut self,
        index: usize,
        option: usize,
        now_ms: u64,
    ) -> Result<ScenarioOutcome, EngineError> {
        let is_new = index == self.scenario_pointer && !self.scenarios_complete();
        let is_revision = self.revisable_scenario() == Some(index);
        if !is_new && !is_revision {
            return Err(EngineError::ScenarioIndex {
                index,
                current: self.scenario_pointer,
            });
        }

        let count = self.option_counts[index];
        if option >= count {
            return Err(EngineError::OptionOutOfRange {
                index,
                option,
                count,
            });
        }

        let elapsed = self.stamp(scenario_key(index), now_ms);
        self.scenario_answers[index] = Some(option);

        if is_revision {
            self.revisions += 1;
            debug!(
                scenario = index,
                option,
                elapsed_ms = elapsed,
                revisions = self.revisions,
                "Scenario answer revised"
            );
            return Ok(ScenarioOutcome::Revised);
        }

        self.scenario_pointer += 1;
        debug!(scenario = index, option, elapsed_ms = elapsed, "Scenario answered");

        if self.scenarios_complete() {
            Ok(ScenarioOutcome::Completed)
        } else {
            Ok(ScenarioOutcome::Advanced {
                next: self.scenario_pointer,
            })
        }
    }

    /// Record the answer to trade-off `index`, which must be the current one
    pub fn record_tradeoff_answer(
        &mut self,
        index: usize,
        choice: Choice,
        now_ms: u64,
    ) -> Result<TradeoffOutcome, EngineError> {
        if index != self.tradeoff_pointer || self.tradeoffs_complete() {
            return Err(EngineError::TradeoffIndex {
                index,
                current: self.tradeoff_pointer,
            });
        }

        let elapsed = self.stamp(tradeoff_key(index), now_ms);
        self.tradeoff_answers[index] = Some(choice);
        self.tradeoff_pointer += 1;
        debug!(tradeoff = index, choice = %choice, elapsed_ms = elapsed, "Trade-off answered");

        if self.tradeoffs_complete() {
            Ok(TradeoffOutcome::Completed)
        } else {
            Ok(TradeoffOutcome::Advanced {
                next: self.tradeoff_pointer,
            })
        }
    }

    /// Write the elapsed time for `key` and restart the question timer
    fn stamp(&mut self, key: String, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.question_started_ms);
        self.timing.record(key, elapsed);
        self.question_started_ms = now_ms;
        elapsed
    }

    /// Index of the scenario that may currently be revised, if any
    pub fn revisable_scenario(&self) -> Option<usize> {
        if self.scenario_pointer == 0 || self.scenarios_complete() {
            return None;
        }
        Some(self.scenario_pointer - 1)
    }

    /// Index of the next unanswered scenario
    pub fn scenario_pointer(&self) -> usize {
        self.scenario_pointer
    }

    /// Index of the next unanswered trade-off
    pub fn tradeoff_pointer(&self) -> usize {
        self.tradeoff_pointer
    }

    pub fn scenarios_complete(&self) -> bool {
        self.scenario_pointer >= self.scenario_answers.len()
    }

    pub fn tradeoffs_complete(&self) -> bool {
        self.tradeoff_pointer >= self.tradeoff_answers.len()
    }

    pub fn scenario_answers(&self) -> &[Option<usize>] {
        &self.scenario_answers
    }

    pub fn tradeoff_answers(&self) -> &[Option<Choice>] {
        &self.tradeoff_answers
    }

    pub fn revisions(&self) -> u32 {
        self.revisions
    }

    pub fn timing(&self) -> &TimingLog {
        &self.timing
    }
}
