use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1–5 rating as entered on the editing surfaces.
pub type Rating = u8;

pub const RATING_MIN: Rating = 1;
pub const RATING_MAX: Rating = 5;

/// Weight-sum floor used when normalizing weights that are all zero.
pub const WEIGHT_SUM_FLOOR: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub short_name: String,
    /// Total addressable market, in billions of USD.
    pub tam_usd_b: f64,
    pub adoption_speed: Rating,
    /// Tracked for display only; not part of the priority score.
    pub compliance_burden: Rating,
    pub chs_fit: Rating,
    #[serde(default)]
    pub priority_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewStatus {
    Planned,
    Invited,
    Scheduled,
    Completed,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 4] = [
        InterviewStatus::Planned,
        InterviewStatus::Invited,
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Planned => "Planned",
            InterviewStatus::Invited => "Invited",
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewPlan {
    pub segment: String,
    pub persona: String,
    pub company_type: String,
    pub priority: Rating,
    pub key_question: String,
    pub status: InterviewStatus,
}

/// Hypothesis fields as submitted; the ICE score is attached by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHypothesis {
    pub segment: String,
    pub hypothesis: String,
    pub metric_to_move: String,
    pub impact: Rating,
    pub confidence: Rating,
    pub effort: Rating,
    pub next_experiment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub segment: String,
    pub hypothesis: String,
    pub metric_to_move: String,
    pub impact: Rating,
    pub confidence: Rating,
    pub effort: Rating,
    /// Frozen at creation time.
    pub ice_score: f64,
    pub next_experiment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub stage: String,
    pub count: u64,
}

/// Relative importance of TAM, adoption speed and strategic fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub tam: f64,
    pub adoption: f64,
    pub fit: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            tam: 0.3,
            adoption: 0.3,
            fit: 0.4,
        }
    }
}

impl Weights {
    /// Scale the weights so they sum to 1. All-zero weights stay all-zero
    /// thanks to the sum floor instead of dividing by zero.
    pub fn normalized(self) -> Self {
        let total = (self.tam + self.adoption + self.fit).max(WEIGHT_SUM_FLOOR);
        Self {
            tam: self.tam / total,
            adoption: self.adoption / total,
            fit: self.fit / total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchComponent {
    pub layer: String,
    pub component: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub phase: String,
    pub quarter: String,
    pub area: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub tier: String,
    pub price_usd_per_month: u32,
    pub includes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub vendor: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub breadth: Rating,
    pub compliance: Rating,
    pub explainability: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow<V> {
    pub id: String,
    pub values: Vec<V>,
}

/// Wide table: one id column plus named value columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<V> {
    pub id_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow<V>>,
}

pub type FeatureMatrix = Matrix<Rating>;

/// Read-only tables loaded once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    pub architecture: Vec<ArchComponent>,
    pub roadmap: Vec<RoadmapItem>,
    pub pricing: Vec<PricingTier>,
    pub competitors: Vec<Competitor>,
    pub features: FeatureMatrix,
}
