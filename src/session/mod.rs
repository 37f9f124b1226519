//! Per-session state.
//!
//! A `Session` is the single authoritative copy of everything the user can
//! edit. Presentation layers own one `Session`, send it commands and read
//! derived views back; the engines themselves stay pure.

mod commands;

pub use commands::{FunnelEdit, SegmentEdit, SessionCommand};

use crate::engine::{
    self, compute_conversion_series, compute_ice_score, compute_priority_score, group_count,
    ConversionRow, GroupCount, LongRecord,
};
use crate::error::LabError;
use crate::model::{
    FunnelStage, Hypothesis, InterviewPlan, InterviewStatus, NewHypothesis, Rating,
    ReferenceData, Segment, Weights, RATING_MAX, RATING_MIN,
};
use crate::sample;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Session {
    segments: Vec<Segment>,
    interviews: Vec<InterviewPlan>,
    hypotheses: Vec<Hypothesis>,
    funnel: Vec<FunnelStage>,
    weights: Weights,
    reference: ReferenceData,
}

impl Session {
    /// Seed a session from the built-in sample data.
    pub fn new(weights: Weights) -> Result<Self, LabError> {
        validate_weights(&weights)?;
        let mut session = Self {
            segments: sample::segments(),
            interviews: Vec::new(),
            hypotheses: Vec::new(),
            funnel: sample::funnel(),
            weights,
            reference: sample::reference_data(),
        };
        session.refresh_priority_scores();
        Ok(session)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn interviews(&self) -> &[InterviewPlan] {
        &self.interviews
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn funnel(&self) -> &[FunnelStage] {
        &self.funnel
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn segment_names(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.name.clone()).collect()
    }

    /// Apply a single edit. Rejected commands leave the session untouched.
    pub fn apply(&mut self, cmd: SessionCommand) -> Result<(), LabError> {
        let kind = cmd.kind();
        let res = self.apply_inner(cmd);
        match &res {
            Ok(()) => info!(command = kind, "applied session command"),
            Err(e) => warn!(command = kind, error = %e, "rejected session command"),
        }
        res
    }

    fn apply_inner(&mut self, cmd: SessionCommand) -> Result<(), LabError> {
        match cmd {
            SessionCommand::SetWeights(w) => {
                validate_weights(&w)?;
                self.weights = w;
                self.refresh_priority_scores();
            }
            SessionCommand::EditSegment { index, edit } => {
                let len = self.segments.len();
                let seg = self
                    .segments
                    .get_mut(index)
                    .ok_or(LabError::IndexOutOfRange {
                        what: "segment",
                        index,
                        len,
                    })?;
                match edit {
                    SegmentEdit::Tam(tam) => {
                        if !tam.is_finite() || tam < 0.0 {
                            return Err(LabError::InvalidTam(tam));
                        }
                        seg.tam_usd_b = tam;
                    }
                    SegmentEdit::AdoptionSpeed(v) => {
                        seg.adoption_speed = check_rating("adoption speed", v)?;
                    }
                    SegmentEdit::ComplianceBurden(v) => {
                        seg.compliance_burden = check_rating("compliance burden", v)?;
                    }
                    SegmentEdit::ChsFit(v) => {
                        seg.chs_fit = check_rating("CHS fit", v)?;
                    }
                }
                self.refresh_priority_scores();
            }
            SessionCommand::AddInterview(plan) => {
                self.check_segment(&plan.segment)?;
                check_rating("priority", plan.priority)?;
                self.interviews.push(plan);
            }
            SessionCommand::AddHypothesis(new) => {
                self.check_segment(&new.segment)?;
                check_rating("impact", new.impact)?;
                check_rating("confidence", new.confidence)?;
                check_rating("effort", new.effort)?;
                let ice_score = compute_ice_score(new.impact, new.confidence, new.effort);
                self.hypotheses.push(Hypothesis {
                    segment: new.segment,
                    hypothesis: new.hypothesis,
                    metric_to_move: new.metric_to_move,
                    impact: new.impact,
                    confidence: new.confidence,
                    effort: new.effort,
                    ice_score,
                    next_experiment: new.next_experiment,
                });
            }
            SessionCommand::EditFunnelStage { index, edit } => {
                let len = self.funnel.len();
                let stage = self
                    .funnel
                    .get_mut(index)
                    .ok_or(LabError::IndexOutOfRange {
                        what: "funnel stage",
                        index,
                        len,
                    })?;
                match edit {
                    FunnelEdit::Count(count) => stage.count = count,
                    FunnelEdit::Label(label) => stage.stage = label,
                }
            }
        }
        Ok(())
    }

    fn check_segment(&self, name: &str) -> Result<(), LabError> {
        if self.segments.iter().any(|s| s.name == name) {
            Ok(())
        } else {
            Err(LabError::UnknownSegment(name.to_string()))
        }
    }

    /// Rescore every segment against the current weights.
    fn refresh_priority_scores(&mut self) {
        let w = self.weights.normalized();
        for seg in &mut self.segments {
            seg.priority_score = compute_priority_score(seg, w.tam, w.adoption, w.fit);
        }
        debug!(
            segments = self.segments.len(),
            w_tam = w.tam,
            w_adoption = w.adoption,
            w_fit = w.fit,
            "recomputed priority scores"
        );
    }

    /// Segments by priority score, highest first; ties keep input order.
    pub fn ranked_segments(&self) -> Vec<Segment> {
        let mut ranked = self.segments.clone();
        ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
        ranked
    }

    /// Hypotheses by frozen ICE score, highest first; ties keep input order.
    pub fn ranked_hypotheses(&self) -> Vec<Hypothesis> {
        let mut ranked = self.hypotheses.clone();
        ranked.sort_by(|a, b| b.ice_score.total_cmp(&a.ice_score));
        ranked
    }

    pub fn interview_summary(&self) -> Vec<GroupCount<(String, InterviewStatus)>> {
        group_count(&self.interviews, |i| (i.segment.clone(), i.status))
    }

    /// Component count per layer, in `Infra, Data, Platform, Experience`
    /// order; layers outside that list follow in appearance order.
    pub fn layer_mix(&self) -> Vec<GroupCount<String>> {
        let mut mix = group_count(&self.reference.architecture, |c| c.layer.clone());
        mix.sort_by_key(|g| {
            sample::LAYER_ORDER
                .iter()
                .position(|l| *l == g.key)
                .unwrap_or(sample::LAYER_ORDER.len())
        });
        mix
    }

    pub fn feature_heatmap(&self) -> Result<Vec<LongRecord<Rating>>, LabError> {
        let m = &self.reference.features;
        let cols: Vec<&str> = m.columns.iter().map(String::as_str).collect();
        engine::reshape_to_long(m, &cols)
    }

    pub fn conversion_series(&self) -> Vec<ConversionRow> {
        compute_conversion_series(&self.funnel)
    }
}

fn check_rating(field: &'static str, value: Rating) -> Result<Rating, LabError> {
    if (RATING_MIN..=RATING_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(LabError::RatingOutOfRange { field, value })
    }
}

fn validate_weights(w: &Weights) -> Result<(), LabError> {
    for (name, value) in [("tam", w.tam), ("adoption", w.adoption), ("fit", w.fit)] {
        if !value.is_finite() || value < 0.0 {
            return Err(LabError::InvalidWeight { name, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(Weights::default()).unwrap()
    }

    fn interview(segment: &str, status: InterviewStatus) -> InterviewPlan {
        InterviewPlan {
            segment: segment.into(),
            persona: "Wearables ML Engineer".into(),
            company_type: "Seed AI health coach".into(),
            priority: 3,
            key_question: "What stops you?".into(),
            status,
        }
    }

    fn hypothesis(segment: &str, impact: Rating, confidence: Rating, effort: Rating) -> NewHypothesis {
        NewHypothesis {
            segment: segment.into(),
            hypothesis: "Compliance dashboards drive adoption".into(),
            metric_to_move: "Teams integrating within 3 months".into(),
            impact,
            confidence,
            effort,
            next_experiment: "Run 5 design-partner calls".into(),
        }
    }

    #[test]
    fn new_session_scores_every_segment() {
        let s = session();
        let scores: Vec<f64> = s.segments().iter().map(|s| s.priority_score).collect();
        assert_eq!(scores, vec![3.1, 4.16, 3.2, 2.8, 2.67, 3.42]);
    }

    #[test]
    fn ranking_is_descending() {
        let names: Vec<String> = session()
            .ranked_segments()
            .into_iter()
            .map(|s| s.short_name)
            .collect();
        assert_eq!(
            names,
            ["AI Health Coaches", "Hardware", "Chronic Apps", "Fitness Apps", "Aggregators", "DTx"]
        );
    }

    #[test]
    fn weight_change_rescores_segments() {
        let mut s = session();
        s.apply(SessionCommand::SetWeights(Weights {
            tam: 1.0,
            adoption: 0.0,
            fit: 0.0,
        }))
        .unwrap();
        let hardware = &s.segments()[5];
        assert_eq!(hardware.priority_score, 4.4);
        // Unnormalized weights are normalized before scoring.
        s.apply(SessionCommand::SetWeights(Weights {
            tam: 0.0,
            adoption: 2.0,
            fit: 2.0,
        }))
        .unwrap();
        assert_eq!(s.segments()[1].priority_score, 5.0);
    }

    #[test]
    fn all_zero_weights_score_zero() {
        let mut s = session();
        s.apply(SessionCommand::SetWeights(Weights {
            tam: 0.0,
            adoption: 0.0,
            fit: 0.0,
        }))
        .unwrap();
        assert!(s.segments().iter().all(|seg| seg.priority_score == 0.0));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut s = session();
        let err = s
            .apply(SessionCommand::SetWeights(Weights {
                tam: -0.1,
                adoption: 0.3,
                fit: 0.4,
            }))
            .unwrap_err();
        assert_eq!(
            err,
            LabError::InvalidWeight {
                name: "tam",
                value: -0.1
            }
        );
        assert_eq!(s.weights(), Weights::default());
    }

    #[test]
    fn segment_edit_recomputes_priority() {
        let mut s = session();
        s.apply(SessionCommand::EditSegment {
            index: 0,
            edit: SegmentEdit::Tam(30.0),
        })
        .unwrap();
        // tam_norm 5.0 * 0.3 + 4 * 0.3 + 4 * 0.4
        assert_eq!(s.segments()[0].priority_score, 4.3);

        s.apply(SessionCommand::EditSegment {
            index: 0,
            edit: SegmentEdit::ComplianceBurden(5),
        })
        .unwrap();
        assert_eq!(s.segments()[0].priority_score, 4.3);
        assert_eq!(s.segments()[0].compliance_burden, 5);
    }

    #[test]
    fn segment_edit_validation() {
        let mut s = session();
        assert_eq!(
            s.apply(SessionCommand::EditSegment {
                index: 0,
                edit: SegmentEdit::ChsFit(6),
            }),
            Err(LabError::RatingOutOfRange {
                field: "CHS fit",
                value: 6
            })
        );
        assert_eq!(
            s.apply(SessionCommand::EditSegment {
                index: 1,
                edit: SegmentEdit::Tam(-1.0),
            }),
            Err(LabError::InvalidTam(-1.0))
        );
        assert_eq!(
            s.apply(SessionCommand::EditSegment {
                index: 42,
                edit: SegmentEdit::AdoptionSpeed(3),
            }),
            Err(LabError::IndexOutOfRange {
                what: "segment",
                index: 42,
                len: 6
            })
        );
        assert_eq!(s.segments()[0].chs_fit, 4);
    }

    #[test]
    fn interviews_append_and_summarize() {
        let mut s = session();
        let fitness = s.segments()[0].name.clone();
        let coaches = s.segments()[1].name.clone();
        for plan in [
            interview(&fitness, InterviewStatus::Planned),
            interview(&fitness, InterviewStatus::Planned),
            interview(&coaches, InterviewStatus::Completed),
        ] {
            s.apply(SessionCommand::AddInterview(plan)).unwrap();
        }
        assert_eq!(s.interviews().len(), 3);
        let summary: Vec<(String, InterviewStatus, usize)> = s
            .interview_summary()
            .into_iter()
            .map(|g| (g.key.0, g.key.1, g.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                (fitness, InterviewStatus::Planned, 2),
                (coaches, InterviewStatus::Completed, 1),
            ]
        );
    }

    #[test]
    fn interview_for_unknown_segment_is_rejected() {
        let mut s = session();
        let err = s
            .apply(SessionCommand::AddInterview(interview(
                "Pet Wearables",
                InterviewStatus::Invited,
            )))
            .unwrap_err();
        assert_eq!(err, LabError::UnknownSegment("Pet Wearables".into()));
        assert!(s.interviews().is_empty());
    }

    #[test]
    fn hypothesis_ice_is_frozen_at_creation() {
        let mut s = session();
        let seg = s.segments()[1].name.clone();
        s.apply(SessionCommand::AddHypothesis(hypothesis(&seg, 4, 3, 3)))
            .unwrap();
        s.apply(SessionCommand::AddHypothesis(hypothesis(&seg, 5, 5, 1)))
            .unwrap();
        assert_eq!(s.hypotheses()[0].ice_score, 4.0);

        s.apply(SessionCommand::SetWeights(Weights {
            tam: 1.0,
            adoption: 0.0,
            fit: 0.0,
        }))
        .unwrap();
        assert_eq!(s.hypotheses()[0].ice_score, 4.0);

        let ranked: Vec<f64> = s.ranked_hypotheses().iter().map(|h| h.ice_score).collect();
        assert_eq!(ranked, vec![25.0, 4.0]);
    }

    #[test]
    fn hypothesis_ratings_are_validated() {
        let mut s = session();
        let seg = s.segments()[0].name.clone();
        assert_eq!(
            s.apply(SessionCommand::AddHypothesis(hypothesis(&seg, 4, 3, 0))),
            Err(LabError::RatingOutOfRange {
                field: "effort",
                value: 0
            })
        );
        assert!(s.hypotheses().is_empty());
    }

    #[test]
    fn layer_mix_in_stack_order() {
        let mix: Vec<(String, usize)> = session()
            .layer_mix()
            .into_iter()
            .map(|g| (g.key, g.count))
            .collect();
        assert_eq!(
            mix,
            vec![
                ("Infra".to_string(), 1),
                ("Data".to_string(), 2),
                ("Platform".to_string(), 2),
                ("Experience".to_string(), 2),
            ]
        );
    }

    #[test]
    fn heatmap_covers_whole_matrix() {
        let long = session().feature_heatmap().unwrap();
        assert_eq!(long.len(), 36);
        assert_eq!(long[0].id, "Fitness Apps");
        assert_eq!(long[0].variable, "Unified Wearable APIs");
        assert_eq!(long[0].value, 5);
    }

    #[test]
    fn funnel_edits_flow_into_conversion() {
        let mut s = session();
        let series = s.conversion_series();
        assert_eq!(series[1].conversion_from_prev_pct, Some(16.0));
        assert_eq!(series[4].conversion_from_prev_pct, Some(25.0));

        s.apply(SessionCommand::EditFunnelStage {
            index: 0,
            edit: FunnelEdit::Count(0),
        })
        .unwrap();
        s.apply(SessionCommand::EditFunnelStage {
            index: 1,
            edit: FunnelEdit::Label("Signups".into()),
        })
        .unwrap();
        let series = s.conversion_series();
        assert_eq!(series[1].stage, "Signups");
        assert_eq!(series[1].conversion_from_prev_pct, None);
        assert_eq!(series[2].conversion_from_prev_pct, Some(37.5));
    }
}
