use serde::Serialize;
use std::collections::BTreeMap;
use triage_transcript::{run_sort_key, Category, ErrorGroup, Outcome};

/// Category → run ids, built once per batch and passed around explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    members: BTreeMap<Category, Vec<String>>,
}

/// Count plus percentage of all processed runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollUp {
    pub count: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub rate: f64,
    pub members: Vec<String>,
}

/// Serializable view of a [`Tally`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallySummary {
    pub total_processed: usize,
    pub total_correct: RollUp,
    pub total_error: RollUp,
    pub total_type3_error: RollUp,
    pub total_type4_error: RollUp,
    pub categories: Vec<CategorySummary>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, id: impl Into<String>) {
        self.members.entry(category).or_default().push(id.into());
    }

    /// Fold another tally into this one. Runs recorded in shards can be
    /// combined here in any order.
    pub fn merge(&mut self, other: Tally) {
        for (category, ids) in other.members {
            self.members.entry(category).or_default().extend(ids);
        }
    }

    /// Run ids in display order: numeric ascending, then the rest.
    pub fn members(&self, category: Category) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .members
            .get(&category)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_by(|a, b| run_sort_key(a).cmp(&run_sort_key(b)));
        ids
    }

    pub fn count(&self, category: Category) -> usize {
        self.members.get(&category).map_or(0, Vec::len)
    }

    pub fn total_processed(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_processed() == 0
    }

    pub fn outcome_count(&self, outcome: Outcome) -> usize {
        Category::ALL
            .iter()
            .filter(|c| c.outcome() == outcome)
            .map(|c| self.count(*c))
            .sum()
    }

    pub fn group_count(&self, group: ErrorGroup) -> usize {
        group.members().iter().map(|c| self.count(*c)).sum()
    }

    pub fn total_correct(&self) -> usize {
        self.count(Category::TrulyCorrect) + self.count(Category::McpError)
    }

    pub fn total_type3_error(&self) -> usize {
        self.count(Category::RefusalToReason) + self.count(Category::PlanAsAnswer)
    }

    pub fn total_type4_error(&self) -> usize {
        self.count(Category::EmptyReplyAfterToolCall)
            + self.count(Category::ReasonedImpossible)
            + self.count(Category::MissingFunctionCallInfo)
    }

    pub fn total_error(&self) -> usize {
        self.count(Category::MalformedCall)
            + self.count(Category::ModelCallFailure)
            + self.total_type3_error()
            + self.total_type4_error()
    }

    /// Percentage of processed runs; 0 when nothing was processed.
    pub fn rate(&self, count: usize) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    }

    fn roll_up(&self, count: usize) -> RollUp {
        RollUp {
            count,
            rate: self.rate(count),
        }
    }

    pub fn summary(&self) -> TallySummary {
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let count = self.count(category);
                CategorySummary {
                    category,
                    count,
                    rate: self.rate(count),
                    members: self.members(category).into_iter().map(String::from).collect(),
                }
            })
            .collect();

        TallySummary {
            total_processed: self.total_processed(),
            total_correct: self.roll_up(self.total_correct()),
            total_error: self.roll_up(self.total_error()),
            total_type3_error: self.roll_up(self.total_type3_error()),
            total_type4_error: self.roll_up(self.total_type4_error()),
            categories,
        }
    }
}
