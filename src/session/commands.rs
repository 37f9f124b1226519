//! Commands emitted by presentation layers to change session state.

use crate::model::{InterviewPlan, NewHypothesis, Rating, Weights};

/// One edit of a single segment field.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEdit {
    Tam(f64),
    AdoptionSpeed(Rating),
    ComplianceBurden(Rating),
    ChsFit(Rating),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunnelEdit {
    Count(u64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SetWeights(Weights),
    EditSegment { index: usize, edit: SegmentEdit },
    AddInterview(InterviewPlan),
    AddHypothesis(NewHypothesis),
    EditFunnelStage { index: usize, edit: FunnelEdit },
}

impl SessionCommand {
    /// Short name used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionCommand::SetWeights(_) => "set_weights",
            SessionCommand::EditSegment { .. } => "edit_segment",
            SessionCommand::AddInterview(_) => "add_interview",
            SessionCommand::AddHypothesis(_) => "add_hypothesis",
            SessionCommand::EditFunnelStage { .. } => "edit_funnel_stage",
        }
    }
}
