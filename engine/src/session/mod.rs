//! Assessment session
//!
//! [`AssessmentSession`] is the stage controller. It owns one
//! [`AllocationTracker`], one [`ResponseCollector`] and, once the last
//! trade-off is answered, the write-once [`ResultsBundle`].
//!
//! # Stages
//!
//! ```text
//! prime -> allocate -> collide -> tradeoff -> results
//! ```
//!
//! - `prime -> allocate` and `allocate -> collide` are explicit
//!   ([`AssessmentSession::advance`]); the second is gated on a fully spent
//!   budget.
//! - `collide -> tradeoff` and `tradeoff -> results` fire automatically when
//!   the last question of the round is answered. Entering `results` scores the
//!   session synchronously.
//!
//! There are no backward transitions. The only undo is the in-place revision
//! of the most recent scenario answer, which never changes the stage.
//!
//! # Errors
//!
//! Calls that do not match the current stage, or that name an index or
//! option that cannot be answered right now, return a precondition error and
//! leave the session untouched. Rejected allocation changes are not errors.

use sdk::catalog::{Catalog, ScenarioDefinition, TradeoffDefinition};
use sdk::errors::EngineError;
use sdk::types::{Category, Choice, Stage};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::allocation::{Allocation, AllocationTracker};
use crate::clock::{Clock, MonotonicClock};
use crate::responses::{ResponseCollector, ScenarioOutcome, TradeoffOutcome};
use crate::scoring::{ResultsBundle, ScoreEngine};

/// 1-based position within a question round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// Share of the round reached, counting the current question as done
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.current as f64 * 100.0 / self.total as f64
    }
}

/// Stage-specific read model for a presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageView<'a> {
    Prime,
    Allocate {
        remaining: u32,
        values: Allocation,
        can_advance: bool,
    },
    Collide {
        index: usize,
        progress: Progress,
        scenario: &'a ScenarioDefinition,
        /// Previously chosen option of the scenario that can be revised
        revisable: Option<RevisableAnswer>,
    },
    Tradeoff {
        index: usize,
        progress: Progress,
        tradeoff: &'a TradeoffDefinition,
    },
    Results {
        results: &'a ResultsBundle,
    },
}

/// The most recent scenario answer, still open to revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevisableAnswer {
    pub index: usize,
    pub option: usize,
}

/// One user's pass through the assessment
#[derive(Debug)]
pub struct AssessmentSession {
    id: Uuid,
    catalog: Catalog,
    clock: Box<dyn Clock>,
    stage: Stage,
    allocation: AllocationTracker,
    responses: ResponseCollector,
    engine: ScoreEngine,
    results: Option<ResultsBundle>,
}

impl AssessmentSession {
    /// Start a session over `catalog` with the system monotonic clock
    pub fn new(catalog: Catalog) -> Result<Self, EngineError> {
        Self::with_clock(catalog, Box::new(MonotonicClock::new()))
    }

    /// Start a session with an explicit time source
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` if the content fails validation.
    pub fn with_clock(catalog: Catalog, clock: Box<dyn Clock>) -> Result<Self, EngineError> {
        catalog.validate()?;
        let responses = ResponseCollector::new(&catalog);
        let id = Uuid::new_v4();

        info!(
            session = %id,
            scenarios = catalog.scenarios.len(),
            tradeoffs = catalog.tradeoffs.len(),
            "Assessment session created"
        );

        Ok(Self {
            id,
            catalog,
            clock,
            stage: Stage::Prime,
            allocation: AllocationTracker::new(),
            responses,
            engine: ScoreEngine::new(),
            results: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn allocation(&self) -> &AllocationTracker {
        &self.allocation
    }

    pub fn responses(&self) -> &ResponseCollector {
        &self.responses
    }

    /// The results, once the session has reached the terminal stage
    pub fn results(&self) -> Option<&ResultsBundle> {
        self.results.as_ref()
    }

    /// Take one of the explicit steps: `prime -> allocate` or
    /// `allocate -> collide`
    ///
    /// # Errors
    ///
    /// - `BudgetNotSpent` when leaving `allocate` with tokens left
    /// - `NoManualAdvance` from any stage that advances on its own
    pub fn advance(&mut self) -> Result<Stage, EngineError> {
        match self.stage {
            Stage::Prime => self.transition(Stage::Allocate),
            Stage::Allocate => {
                if !self.allocation.can_advance() {
                    let err = EngineError::BudgetNotSpent {
                        remaining: self.allocation.remaining(),
                    };
                    warn!(session = %self.id, error = %err, "Advance refused");
                    return Err(err);
                }
                self.transition(Stage::Collide);
                self.responses.start_question(self.clock.now_ms());
            }
            stage => {
                let err = EngineError::NoManualAdvance(stage);
                warn!(session = %self.id, error = %err, "Advance refused");
                return Err(err);
            }
        }
        Ok(self.stage)
    }

    /// Set a category's token count during the allocation round
    ///
    /// Returns `Ok(false)` if the change would overdraw the budget or go
    /// negative; nothing changes in that case.
    pub fn set_category(&mut self, category: Category, value: i64) -> Result<bool, EngineError> {
        self.expect_stage(Stage::Allocate)?;
        Ok(self.allocation.set_category(category, value))
    }

    /// Answer (or revise) a scenario during the collide round
    pub fn record_scenario_answer(
        &mut self,
        index: usize,
        option: usize,
    ) -> Result<ScenarioOutcome, EngineError> {
        self.expect_stage(Stage::Collide)?;
        let now = self.clock.now_ms();
        let outcome = self
            .responses
            .record_scenario_answer(index, option, now)
            .map_err(|err| self.refused(err))?;

        if outcome == ScenarioOutcome::Completed {
            self.transition(Stage::Tradeoff);
            self.responses.start_question(now);
        }
        Ok(outcome)
    }

    /// Answer a trade-off during the trade-off round
    ///
    /// Answering the last trade-off scores the session.
    pub fn record_tradeoff_answer(
        &mut self,
        index: usize,
        choice: Choice,
    ) -> Result<TradeoffOutcome, EngineError> {
        self.expect_stage(Stage::Tradeoff)?;
        let now = self.clock.now_ms();
        let outcome = self
            .responses
            .record_tradeoff_answer(index, choice, now)
            .map_err(|err| self.refused(err))?;

        if outcome == TradeoffOutcome::Completed {
            self.finish();
        }
        Ok(outcome)
    }

    /// Current scenario and its definition, during the collide round
    pub fn current_scenario(&self) -> Option<(usize, &ScenarioDefinition)> {
        if self.stage != Stage::Collide {
            return None;
        }
        let index = self.responses.scenario_pointer();
        self.catalog.scenarios.get(index).map(|s| (index, s))
    }

    /// The answer a "change your mind" control would revise
    pub fn revisable_answer(&self) -> Option<RevisableAnswer> {
        if self.stage != Stage::Collide {
            return None;
        }
        let index = self.responses.revisable_scenario()?;
        let option = self.responses.scenario_answers()[index]?;
        Some(RevisableAnswer { index, option })
    }

    /// Current trade-off and its definition, during the trade-off round
    pub fn current_tradeoff(&self) -> Option<(usize, &TradeoffDefinition)> {
        if self.stage != Stage::Tradeoff {
            return None;
        }
        let index = self.responses.tradeoff_pointer();
        self.catalog.tradeoffs.get(index).map(|t| (index, t))
    }

    pub fn scenario_progress(&self) -> Progress {
        Progress {
            current: (self.responses.scenario_pointer() + 1).min(self.catalog.scenarios.len()),
            total: self.catalog.scenarios.len(),
        }
    }

    pub fn tradeoff_progress(&self) -> Progress {
        Progress {
            current: (self.responses.tradeoff_pointer() + 1).min(self.catalog.tradeoffs.len()),
            total: self.catalog.tradeoffs.len(),
        }
    }

    /// Read model for the current stage
    pub fn view(&self) -> StageView<'_> {
        match self.stage {
            Stage::Prime => StageView::Prime,
            Stage::Allocate => StageView::Allocate {
                remaining: self.allocation.remaining(),
                values: self.allocation.snapshot(),
                can_advance: self.allocation.can_advance(),
            },
            Stage::Collide => {
                let index = self.responses.scenario_pointer();
                StageView::Collide {
                    index,
                    progress: self.scenario_progress(),
                    scenario: &self.catalog.scenarios[index],
                    revisable: self.revisable_answer(),
                }
            }
            Stage::Tradeoff => {
                let index = self.responses.tradeoff_pointer();
                StageView::Tradeoff {
                    index,
                    progress: self.tradeoff_progress(),
                    tradeoff: &self.catalog.tradeoffs[index],
                }
            }
            Stage::Results => match &self.results {
                Some(results) => StageView::Results { results },
                None => unreachable!("results stage is only entered after scoring"),
            },
        }
    }

    fn finish(&mut self) {
        let results = self.engine.compute(
            &self.allocation.snapshot(),
            self.responses.scenario_answers(),
            self.responses.tradeoff_answers(),
            self.responses.timing(),
            self.responses.revisions(),
        );
        info!(
            session = %self.id,
            outlier_probability = results.outlier_probability,
            revisions = results.response_patterns.revisions,
            "Assessment scored"
        );
        self.results = Some(results);
        self.transition(Stage::Results);
    }

    fn transition(&mut self, to: Stage) {
        debug_assert_eq!(self.stage.next(), Some(to));
        info!(session = %self.id, from = %self.stage, to = %to, "Stage changed");
        self.stage = to;
    }

    fn expect_stage(&self, expected: Stage) -> Result<(), EngineError> {
        if self.stage == expected {
            return Ok(());
        }
        Err(self.refused(EngineError::StageMismatch {
            expected,
            actual: self.stage,
        }))
    }

    fn refused(&self, err: EngineError) -> EngineError {
        warn!(session = %self.id, stage = %self.stage, error = %err, "Call refused");
        err
    }
}
