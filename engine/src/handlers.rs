//! Command handlers
//!
//! The terminal driver in this module is a thin presentation layer over
//! [`AssessmentSession`]: it renders the current [`StageView`], reads one line,
//! and turns it into exactly one session call. Input that cannot map to a
//! valid call (unknown category, option number out of range) is answered
//! with a message and never reaches the session.

use anyhow::{bail, Result};
use sdk::catalog::Catalog;
use sdk::errors::EngineError;
use sdk::types::{Category, Choice, Stage};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use uuid::Uuid;

use crate::allocation::{Allocation, TOTAL_BUDGET};
use crate::config::Config;
use crate::responses::TimingLog;
use crate::scoring::{
    Dimension, ResultsBundle, ScoreBand, ScoreEngine, VectorPosition, CRITICAL_LEVERS,
};
use crate::session::{AssessmentSession, StageView};

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Width of a dimension bar in the text report
const BAR_WIDTH: usize = 20;

/// Results plus the presentation data derived from them
#[derive(Debug, Serialize)]
pub struct ResultsReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Uuid>,
    pub results: &'a ResultsBundle,
    pub position: VectorPosition,
    pub bands: BTreeMap<&'static str, ScoreBand>,
    pub levers: [&'static str; 3],
}

impl<'a> ResultsReport<'a> {
    pub fn new(session: Option<Uuid>, results: &'a ResultsBundle) -> Self {
        Self {
            session,
            results,
            position: results.vector_map.position(),
            bands: results
                .dimensions
                .iter()
                .map(|(d, score)| (d.label(), ScoreBand::from_score(score)))
                .collect(),
            levers: CRITICAL_LEVERS,
        }
    }

    /// Human-readable report
    pub fn write_text<W: Write>(&self, out: &mut W, show_timings: bool) -> Result<()> {
        let axes = &self.results.vector_map;

        writeln!(out, "Your Executive Edge Vector")?;
        writeln!(out)?;
        writeln!(out, "Vector map position")?;
        writeln!(
            out,
            "  creativity {:.1} | community {:.1} | discipline {:.1} | advantage {:.1}",
            axes.creativity, axes.community, axes.discipline, axes.advantage
        )?;
        writeln!(
            out,
            "  plotted at x={:.1}%, y={:.1}%",
            self.position.x, self.position.y
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Outlier probability: {:.1}%",
            self.results.outlier_probability
        )?;
        writeln!(out)?;
        writeln!(out, "Seven Dimension Assessment")?;
        for (dimension, score) in self.results.dimensions.iter() {
            writeln!(out, "  {}", dimension_line(dimension, score))?;
        }
        writeln!(out)?;
        writeln!(out, "Your Three Critical Levers")?;
        for (i, lever) in self.levers.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, lever)?;
        }

        let patterns = &self.results.response_patterns;
        if !patterns.response_time.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "Response patterns: {} answers in {:.1}s, {} revision(s)",
                patterns.response_time.len(),
                patterns.response_time.total_ms() as f64 / 1000.0,
                patterns.revisions
            )?;
            if show_timings {
                for (key, ms) in patterns.response_time.iter() {
                    writeln!(out, "  {:<12} {:>6} ms", key, ms)?;
                }
            }
        }
        Ok(())
    }
}

fn dimension_line(dimension: Dimension, score: f64) -> String {
    let filled = ((score / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let band = match ScoreBand::from_score(score) {
        ScoreBand::Low => "low",
        ScoreBand::Moderate => "moderate",
        ScoreBand::Strong => "strong",
    };
    format!(
        "{:<22} {:>3.0}%  [{}{}] {}",
        dimension.label(),
        score,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        band
    )
}

/// Line-oriented terminal driver for one session
pub struct TerminalDriver<R, W> {
    input: R,
    output: W,
    format: OutputFormat,
    show_timings: bool,
}

impl<R: BufRead, W: Write> TerminalDriver<R, W> {
    pub fn new(input: R, output: W, format: OutputFormat, show_timings: bool) -> Self {
        Self {
            input,
            output,
            format,
            show_timings,
        }
    }

    /// Drive `session` from its current stage to results
    ///
    /// # Errors
    ///
    /// Fails if input ends before the session is complete, on I/O errors,
    /// or if the session refuses a call (a driver bug).
    pub fn run(&mut self, session: &mut AssessmentSession) -> Result<()> {
        while session.stage() != Stage::Results {
            self.render(session)?;
            let Some(line) = self.read_line()? else {
                bail!(
                    "Input ended during the {} stage; the assessment was not completed",
                    session.stage()
                );
            };
            self.apply(session, line.trim())?;
        }

        if let Some(results) = session.results() {
            let report = ResultsReport::new(Some(session.id()), results);
            match self.format {
                OutputFormat::Text => {
                    writeln!(self.output)?;
                    report.write_text(&mut self.output, self.show_timings)?;
                }
                OutputFormat::Json => {
                    writeln!(self.output, "{}", serde_json::to_string_pretty(&report)?)?;
                }
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn render(&mut self, session: &AssessmentSession) -> Result<()> {
        let view = session.view();
        if self.format == OutputFormat::Json {
            writeln!(self.output, "{}", serde_json::to_string(&view)?)?;
            return Ok(());
        }

        let out = &mut self.output;
        match view {
            StageView::Prime => {
                writeln!(out, "80% of CEOs rate their org A+")?;
                writeln!(
                    out,
                    "What are the odds you're the outlier... in the right direction?"
                )?;
                writeln!(out, "Press Enter to start the 3 Decisions Test.")?;
            }
            StageView::Allocate {
                remaining,
                values,
                can_advance,
            } => {
                writeln!(out)?;
                writeln!(out, "Round 1: Capital Allocation")?;
                writeln!(
                    out,
                    "Distribute {} tokens across what matters most",
                    TOTAL_BUDGET
                )?;
                for def in &session.catalog().categories {
                    writeln!(
                        out,
                        "  {:<10} {:<28} {:>3}",
                        def.id.key(),
                        def.label,
                        values.get(def.id)
                    )?;
                }
                writeln!(out, "{} tokens remaining", remaining)?;
                if can_advance {
                    writeln!(out, "Type 'next' to continue to Round 2.")?;
                } else {
                    writeln!(
                        out,
                        "Allocate {} more tokens. Enter '<category> <value>'.",
                        remaining
                    )?;
                }
            }
            StageView::Collide {
                progress,
                scenario,
                revisable,
                ..
            } => {
                writeln!(out)?;
                writeln!(out, "Round 2: Collision Cards")?;
                writeln!(out, "Scenario {} of {}", progress.current, progress.total)?;
                writeln!(out, "{}", scenario.prompt)?;
                for (i, option) in scenario.options.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, option.text)?;
                }
                if let Some(prior) = revisable {
                    writeln!(
                        out,
                        "Do you want to change your mind on scenario {} (you chose {})? \
                         Enter 'revise <n>'.",
                        prior.index + 1,
                        prior.option + 1
                    )?;
                }
            }
            StageView::Tradeoff {
                progress, tradeoff, ..
            } => {
                writeln!(out)?;
                writeln!(
                    out,
                    "Round 3: Speed Round - {} of {} ({:.0}%)",
                    progress.current,
                    progress.total,
                    progress.percent()
                )?;
                writeln!(out, "Choose one:")?;
                writeln!(out, "  A. {}", tradeoff.option_a)?;
                writeln!(out, "  B. {}", tradeoff.option_b)?;
            }
            StageView::Results { .. } => {}
        }
        Ok(())
    }

    fn apply(&mut self, session: &mut AssessmentSession, line: &str) -> Result<()> {
        match session.stage() {
            Stage::Prime => {
                session.advance()?;
            }
            Stage::Allocate => self.apply_allocation(session, line)?,
            Stage::Collide => self.apply_scenario(session, line)?,
            Stage::Tradeoff => match line.parse::<Choice>() {
                Ok(choice) => {
                    let index = session.responses().tradeoff_pointer();
                    session.record_tradeoff_answer(index, choice)?;
                }
                Err(_) => writeln!(self.output, "Choose A or B.")?,
            },
            Stage::Results => {}
        }
        Ok(())
    }

    fn apply_allocation(&mut self, session: &mut AssessmentSession, line: &str) -> Result<()> {
        if line.eq_ignore_ascii_case("next") || line.is_empty() {
            if session.allocation().can_advance() {
                session.advance()?;
            } else {
                writeln!(
                    self.output,
                    "Allocate {} more tokens before continuing.",
                    session.allocation().remaining()
                )?;
            }
            return Ok(());
        }

        let mut parts = line.split_whitespace();
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            writeln!(self.output, "Enter '<category> <value>' or 'next'.")?;
            return Ok(());
        };
        let category = match key.parse::<Category>() {
            Ok(category) => category,
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                return Ok(());
            }
        };
        let Ok(value) = value.parse::<i64>() else {
            writeln!(self.output, "'{}' is not a whole number.", value)?;
            return Ok(());
        };

        if !session.set_category(category, value)? {
            writeln!(
                self.output,
                "{} can be set between 0 and {}.",
                category,
                session.allocation().max_for(category)
            )?;
        }
        Ok(())
    }

    fn apply_scenario(&mut self, session: &mut AssessmentSession, line: &str) -> Result<()> {
        let (index, number) = match line.strip_prefix("revise") {
            Some(rest) => match session.revisable_answer() {
                Some(prior) => (prior.index, rest.trim()),
                None => {
                    writeln!(self.output, "There is no answer to revise yet.")?;
                    return Ok(());
                }
            },
            None => (session.responses().scenario_pointer(), line),
        };

        let count = session.catalog().scenarios[index].options.len();
        match number.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => {
                session.record_scenario_answer(index, n - 1)?;
            }
            _ => writeln!(self.output, "Pick a response between 1 and {}.", count)?,
        }
        Ok(())
    }
}

/// Take the assessment interactively on stdin/stdout
pub fn handle_run(config: &Config, format: OutputFormat) -> Result<()> {
    let mut session = AssessmentSession::new(config.catalog()?)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut driver = TerminalDriver::new(
        stdin.lock(),
        stdout.lock(),
        format,
        config.display.show_timings,
    );
    driver.run(&mut session)
}

/// Score an allocation given as `key=value` pairs
pub fn handle_score<W: Write>(pairs: &[String], format: OutputFormat, out: &mut W) -> Result<()> {
    let allocation = Allocation::from_pairs(pairs.iter().map(String::as_str))?;
    if allocation.total() != TOTAL_BUDGET {
        return Err(EngineError::InvalidAllocation(format!(
            "allocations total {}, expected {}",
            allocation.total(),
            TOTAL_BUDGET
        ))
        .into());
    }

    let results = ScoreEngine::new().compute(&allocation, &[], &[], &TimingLog::new(), 0);
    let report = ResultsReport::new(None, &results);
    match format {
        OutputFormat::Text => report.write_text(out, false)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
    }
    Ok(())
}

/// Print the active catalog
pub fn handle_catalog<W: Write>(catalog: &Catalog, format: OutputFormat, out: &mut W) -> Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", catalog.to_json()?)?;
        return Ok(());
    }

    writeln!(out, "Categories")?;
    for def in &catalog.categories {
        writeln!(out, "  {:<10} {}", def.id.key(), def.label)?;
    }
    writeln!(out)?;
    writeln!(out, "Scenarios")?;
    for (i, scenario) in catalog.scenarios.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, scenario.prompt)?;
        for (j, option) in scenario.options.iter().enumerate() {
            let w = option.weights;
            writeln!(
                out,
                "     {}) {} (trust {:+}, governance {:+}, alignment {:+})",
                j + 1,
                option.text,
                w.trust,
                w.governance,
                w.alignment
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Trade-offs")?;
    for (i, pair) in catalog.tradeoffs.iter().enumerate() {
        writeln!(out, "  {:>2}. {} / {}", i + 1, pair.option_a, pair.option_b)?;
    }
    Ok(())
}
