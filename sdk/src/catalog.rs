//! Static assessment content: categories, scenarios and trade-offs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::EngineError;
use crate::types::{AxisWeights, Category, Choice};

/// Immutable content an assessment session is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CategoryDefinition>,
    pub scenarios: Vec<ScenarioDefinition>,
    pub tradeoffs: Vec<TradeoffDefinition>,
}

/// Display metadata for one allocation category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: Category,
    pub label: String,
}

/// A situational question with weighted response options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub prompt: String,
    pub options: Vec<ResponseOption>,
}

impl ScenarioDefinition {
    pub fn option(&self, index: usize) -> Option<&ResponseOption> {
        self.options.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseOption {
    pub text: String,
    #[serde(default)]
    pub weights: AxisWeights,
}

/// A forced binary choice between two labeled alternatives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffDefinition {
    pub option_a: String,
    pub option_b: String,
}

impl TradeoffDefinition {
    pub fn label(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.option_a,
            Choice::B => &self.option_b,
        }
    }
}

fn scenario(prompt: &str, options: [(&str, AxisWeights); 4]) -> ScenarioDefinition {
    ScenarioDefinition {
        prompt: prompt.to_string(),
        options: options
            .into_iter()
            .map(|(text, weights)| ResponseOption {
                text: text.to_string(),
                weights,
            })
            .collect(),
    }
}

fn tradeoff(a: &str, b: &str) -> TradeoffDefinition {
    TradeoffDefinition {
        option_a: a.to_string(),
        option_b: b.to_string(),
    }
}

impl Catalog {
    /// The stock assessment content
    pub fn builtin() -> Self {
        let w = AxisWeights::new;

        Self {
            categories: Category::ALL
                .into_iter()
                .map(|id| CategoryDefinition {
                    id,
                    label: id.label().to_string(),
                })
                .collect(),
            scenarios: vec![
                scenario(
                    "VP Engineering blocks a cross-org OKR due to unclear decision rights",
                    [
                        ("Override and push through - we need momentum", w(-2, -1, -2)),
                        ("Schedule alignment session with all stakeholders", w(1, 2, 2)),
                        ("Escalate to CEO for final decision", w(0, 1, 0)),
                        ("Let Engineering own it if they feel strongly", w(1, -1, -1)),
                    ],
                ),
                scenario(
                    "Top performer threatens to leave over comp disagreement",
                    [
                        ("Match their ask - can't lose them", w(-1, -2, -2)),
                        ("Offer non-monetary benefits and growth path", w(2, 1, 1)),
                        ("Hold firm on comp philosophy", w(0, 2, 0)),
                        ("Create new role/title to justify increase", w(-1, -1, -1)),
                    ],
                ),
                scenario(
                    "Board wants faster growth; team says quality will suffer",
                    [
                        ("Push team harder - they'll figure it out", w(-2, 1, -2)),
                        ("Present trade-off analysis to board", w(2, 2, 2)),
                        ("Hire more people to do both", w(0, -1, 0)),
                        ("Quietly deprioritize some quality checks", w(-2, -2, -1)),
                    ],
                ),
            ],
            tradeoffs: vec![
                tradeoff("Truth on time", "Harmony in public"),
                tradeoff("Ship fast", "Ship perfect"),
                tradeoff("Consensus decisions", "Clear ownership"),
                tradeoff("Retain all talent", "Upgrade talent"),
                tradeoff("Stable processes", "Constant innovation"),
                tradeoff("Internal promotion", "External expertise"),
                tradeoff("Transparency always", "Strategic ambiguity"),
                tradeoff("Customer delight", "Operational excellence"),
                tradeoff("Team autonomy", "Central alignment"),
                tradeoff("Long-term vision", "Quick wins"),
            ],
        }
    }

    /// Parse and validate a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let catalog: Catalog = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidCatalog(format!("Failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize catalog to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up the display definition for a category
    pub fn category(&self, id: Category) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Check structural invariants the session relies on
    ///
    /// Every category appears exactly once, there is at least one scenario
    /// (each with two or more options) and at least one trade-off, and no
    /// label is blank.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen = HashSet::new();
        for def in &self.categories {
            if !seen.insert(def.id) {
                return Err(EngineError::InvalidCatalog(format!(
                    "category '{}' listed more than once",
                    def.id
                )));
            }
            if def.label.trim().is_empty() {
                return Err(EngineError::InvalidCatalog(format!(
                    "category '{}' has an empty label",
                    def.id
                )));
            }
        }
        if let Some(missing) = Category::ALL.iter().find(|c| !seen.contains(*c)) {
            return Err(EngineError::InvalidCatalog(format!(
                "category '{}' is missing",
                missing
            )));
        }

        if self.scenarios.is_empty() {
            return Err(EngineError::InvalidCatalog(
                "at least one scenario is required".to_string(),
            ));
        }
        for (i, scenario) in self.scenarios.iter().enumerate() {
            if scenario.prompt.trim().is_empty() {
                return Err(EngineError::InvalidCatalog(format!(
                    "scenario {} has an empty prompt",
                    i
                )));
            }
            if scenario.options.len() < 2 {
                return Err(EngineError::InvalidCatalog(format!(
                    "scenario {} needs at least two options",
                    i
                )));
            }
            if scenario.options.iter().any(|o| o.text.trim().is_empty()) {
                return Err(EngineError::InvalidCatalog(format!(
                    "scenario {} has an empty option",
                    i
                )));
            }
        }

        if self.tradeoffs.is_empty() {
            return Err(EngineError::InvalidCatalog(
                "at least one trade-off is required".to_string(),
            ));
        }
        for (i, pair) in self.tradeoffs.iter().enumerate() {
            if pair.option_a.trim().is_empty() || pair.option_b.trim().is_empty() {
                return Err(EngineError::InvalidCatalog(format!(
                    "trade-off {} has an empty label",
                    i
                )));
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
