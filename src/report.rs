//! Per-view derived data.
//!
//! A `ViewReport` carries exactly what a presentation layer needs to show
//! one dashboard view: the tables plus the series derived from them. The
//! TUI, the text summary and the exporters all read from here.

use crate::engine::{ConversionRow, LongRecord};
use crate::error::LabError;
use crate::model::{
    ArchComponent, Competitor, Hypothesis, InterviewPlan, InterviewStatus, PricingTier, Rating,
    RoadmapItem, Segment, Weights,
};
use crate::sample::QUARTERS;
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Smallest bubble drawn for a segment in the scatter view.
const MIN_BUBBLE_TAM: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Segments,
    Prioritization,
    Interviews,
    Hypotheses,
    Architecture,
    Features,
    Roadmap,
    Pricing,
    Funnel,
    Competitors,
}

impl View {
    pub const ALL: [View; 10] = [
        View::Segments,
        View::Prioritization,
        View::Interviews,
        View::Hypotheses,
        View::Architecture,
        View::Features,
        View::Roadmap,
        View::Pricing,
        View::Funnel,
        View::Competitors,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Segments => "Segment Explorer",
            View::Prioritization => "Prioritization Canvas",
            View::Interviews => "Interview Planner",
            View::Hypotheses => "Hypothesis & Experiment Tracker",
            View::Architecture => "Platform Architecture Map",
            View::Features => "Feature Stack by Segment",
            View::Roadmap => "Roadmap",
            View::Pricing => "Pricing Strategy",
            View::Funnel => "Developer Adoption Funnel",
            View::Competitors => "Competitor Landscape",
        }
    }

    /// Short label for tab bars.
    pub fn tab_label(self) -> &'static str {
        match self {
            View::Segments => "Segments",
            View::Prioritization => "Priority",
            View::Interviews => "Interviews",
            View::Hypotheses => "Hypotheses",
            View::Architecture => "Architecture",
            View::Features => "Features",
            View::Roadmap => "Roadmap",
            View::Pricing => "Pricing",
            View::Funnel => "Funnel",
            View::Competitors => "Competitors",
        }
    }

    /// File-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            View::Segments => "segments",
            View::Prioritization => "prioritization",
            View::Interviews => "interviews",
            View::Hypotheses => "hypotheses",
            View::Architecture => "architecture",
            View::Features => "features",
            View::Roadmap => "roadmap",
            View::Pricing => "pricing",
            View::Funnel => "funnel",
            View::Competitors => "competitors",
        }
    }

    pub fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentPoint {
    pub name: String,
    pub adoption_speed: Rating,
    pub compliance_burden: Rating,
    pub chs_fit: Rating,
    /// TAM clipped below at 0.1 so tiny markets still get a visible bubble.
    pub bubble_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewCount {
    pub segment: String,
    pub status: InterviewStatus,
    pub interviews: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerCount {
    pub layer: String,
    pub components: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineItem {
    #[serde(flatten)]
    pub item: RoadmapItem,
    /// 1-based quarter position; unknown quarters sit at 1.
    pub quarter_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewReport {
    Segments {
        segments: Vec<Segment>,
        points: Vec<SegmentPoint>,
    },
    Prioritization {
        weights: Weights,
        normalized: Weights,
        ranked: Vec<Segment>,
    },
    Interviews {
        backlog: Vec<InterviewPlan>,
        summary: Vec<InterviewCount>,
    },
    Hypotheses {
        ranked: Vec<Hypothesis>,
    },
    Architecture {
        components: Vec<ArchComponent>,
        layer_mix: Vec<LayerCount>,
        chain: Vec<String>,
    },
    Features {
        id_column: String,
        features: Vec<String>,
        segments: Vec<String>,
        heatmap: Vec<LongRecord<Rating>>,
    },
    Roadmap {
        items: Vec<TimelineItem>,
    },
    Pricing {
        tiers: Vec<PricingTier>,
    },
    Funnel {
        stages: Vec<ConversionRow>,
    },
    Competitors {
        competitors: Vec<Competitor>,
    },
}

/// Position of a quarter label on the Q1..Q4 axis.
pub fn quarter_index(quarter: &str) -> usize {
    QUARTERS
        .iter()
        .position(|q| *q == quarter)
        .map(|i| i + 1)
        .unwrap_or(1)
}

pub fn build_report(session: &Session, view: View) -> Result<ViewReport, LabError> {
    let reference = session.reference();
    let report = match view {
        View::Segments => ViewReport::Segments {
            segments: session.segments().to_vec(),
            points: session
                .segments()
                .iter()
                .map(|s| SegmentPoint {
                    name: s.name.clone(),
                    adoption_speed: s.adoption_speed,
                    compliance_burden: s.compliance_burden,
                    chs_fit: s.chs_fit,
                    bubble_size: s.tam_usd_b.max(MIN_BUBBLE_TAM),
                })
                .collect(),
        },
        View::Prioritization => ViewReport::Prioritization {
            weights: session.weights(),
            normalized: session.weights().normalized(),
            ranked: session.ranked_segments(),
        },
        View::Interviews => ViewReport::Interviews {
            backlog: session.interviews().to_vec(),
            summary: session
                .interview_summary()
                .into_iter()
                .map(|g| InterviewCount {
                    segment: g.key.0,
                    status: g.key.1,
                    interviews: g.count,
                })
                .collect(),
        },
        View::Hypotheses => ViewReport::Hypotheses {
            ranked: session.ranked_hypotheses(),
        },
        View::Architecture => {
            let layer_mix: Vec<LayerCount> = session
                .layer_mix()
                .into_iter()
                .map(|g| LayerCount {
                    layer: g.key,
                    components: g.count,
                })
                .collect();
            let components = &reference.architecture;
            let chain = layer_mix
                .iter()
                .flat_map(move |l| {
                    components
                        .iter()
                        .filter(move |c| c.layer == l.layer)
                        .map(|c| c.component.clone())
                })
                .collect();
            ViewReport::Architecture {
                components: reference.architecture.clone(),
                layer_mix,
                chain,
            }
        }
        View::Features => ViewReport::Features {
            id_column: reference.features.id_column.clone(),
            features: reference.features.columns.clone(),
            segments: reference.features.rows.iter().map(|r| r.id.clone()).collect(),
            heatmap: session.feature_heatmap()?,
        },
        View::Roadmap => ViewReport::Roadmap {
            items: reference
                .roadmap
                .iter()
                .map(|item| TimelineItem {
                    quarter_index: quarter_index(&item.quarter),
                    item: item.clone(),
                })
                .collect(),
        },
        View::Pricing => ViewReport::Pricing {
            tiers: reference.pricing.clone(),
        },
        View::Funnel => ViewReport::Funnel {
            stages: session.conversion_series(),
        },
        View::Competitors => ViewReport::Competitors {
            competitors: reference.competitors.clone(),
        },
    };
    Ok(report)
}

/// A flat table: header plus string rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

/// Format an optional percentage; undefined values become an empty cell.
pub fn pct_cell(v: Option<f64>) -> String {
    v.map(|p| format!("{p:.1}")).unwrap_or_default()
}

impl ViewReport {
    pub fn view(&self) -> View {
        match self {
            ViewReport::Segments { .. } => View::Segments,
            ViewReport::Prioritization { .. } => View::Prioritization,
            ViewReport::Interviews { .. } => View::Interviews,
            ViewReport::Hypotheses { .. } => View::Hypotheses,
            ViewReport::Architecture { .. } => View::Architecture,
            ViewReport::Features { .. } => View::Features,
            ViewReport::Roadmap { .. } => View::Roadmap,
            ViewReport::Pricing { .. } => View::Pricing,
            ViewReport::Funnel { .. } => View::Funnel,
            ViewReport::Competitors { .. } => View::Competitors,
        }
    }

    /// The main table of the view, flattened for CSV export.
    pub fn csv_table(&self) -> CsvTable {
        match self {
            ViewReport::Segments { segments, .. } => CsvTable {
                header: header(&[
                    "Segment",
                    "Short Name",
                    "TAM_2024_USD_B",
                    "Adoption_Speed_1_5",
                    "Compliance_Burden_1_5",
                    "CHS_Fit_1_5",
                    "Priority_Score",
                ]),
                rows: segments.iter().map(segment_row).collect(),
            },
            ViewReport::Prioritization { ranked, .. } => CsvTable {
                header: header(&[
                    "Segment",
                    "Short Name",
                    "TAM_2024_USD_B",
                    "Adoption_Speed_1_5",
                    "Compliance_Burden_1_5",
                    "CHS_Fit_1_5",
                    "Priority_Score",
                ]),
                rows: ranked.iter().map(segment_row).collect(),
            },
            ViewReport::Interviews { backlog, .. } => CsvTable {
                header: header(&[
                    "Segment",
                    "Persona",
                    "Company Type",
                    "Priority_1_5",
                    "Key_Question",
                    "Status",
                ]),
                rows: backlog
                    .iter()
                    .map(|i| {
                        vec![
                            i.segment.clone(),
                            i.persona.clone(),
                            i.company_type.clone(),
                            i.priority.to_string(),
                            i.key_question.clone(),
                            i.status.to_string(),
                        ]
                    })
                    .collect(),
            },
            ViewReport::Hypotheses { ranked } => CsvTable {
                header: header(&[
                    "Segment",
                    "Hypothesis",
                    "Metric_to_Move",
                    "Impact_1_5",
                    "Confidence_1_5",
                    "Effort_1_5",
                    "ICE_Score",
                    "Next_Experiment",
                ]),
                rows: ranked
                    .iter()
                    .map(|h| {
                        vec![
                            h.segment.clone(),
                            h.hypothesis.clone(),
                            h.metric_to_move.clone(),
                            h.impact.to_string(),
                            h.confidence.to_string(),
                            h.effort.to_string(),
                            h.ice_score.to_string(),
                            h.next_experiment.clone(),
                        ]
                    })
                    .collect(),
            },
            ViewReport::Architecture { components, .. } => CsvTable {
                header: header(&["Layer", "Component", "Description", "Status"]),
                rows: components
                    .iter()
                    .map(|c| {
                        vec![
                            c.layer.clone(),
                            c.component.clone(),
                            c.description.clone(),
                            c.status.clone(),
                        ]
                    })
                    .collect(),
            },
            ViewReport::Features {
                id_column, heatmap, ..
            } => CsvTable {
                header: vec![id_column.clone(), "Feature".into(), "Importance".into()],
                rows: heatmap
                    .iter()
                    .map(|r| vec![r.id.clone(), r.variable.clone(), r.value.to_string()])
                    .collect(),
            },
            ViewReport::Roadmap { items } => CsvTable {
                header: header(&["Phase", "Quarter", "Area", "Item", "QuarterIdx"]),
                rows: items
                    .iter()
                    .map(|t| {
                        vec![
                            t.item.phase.clone(),
                            t.item.quarter.clone(),
                            t.item.area.clone(),
                            t.item.item.clone(),
                            t.quarter_index.to_string(),
                        ]
                    })
                    .collect(),
            },
            ViewReport::Pricing { tiers } => CsvTable {
                header: header(&["Tier", "Price_USD_per_month", "Includes"]),
                rows: tiers
                    .iter()
                    .map(|t| {
                        vec![
                            t.tier.clone(),
                            t.price_usd_per_month.to_string(),
                            t.includes.clone(),
                        ]
                    })
                    .collect(),
            },
            ViewReport::Funnel { stages } => CsvTable {
                header: header(&["Stage", "Count", "Conversion_from_prev_%"]),
                rows: stages
                    .iter()
                    .map(|s| {
                        vec![
                            s.stage.clone(),
                            s.count.to_string(),
                            pct_cell(s.conversion_from_prev_pct),
                        ]
                    })
                    .collect(),
            },
            ViewReport::Competitors { competitors } => CsvTable {
                header: header(&[
                    "Vendor",
                    "Type",
                    "Breadth_1_5",
                    "Compliance_1_5",
                    "Explainability_1_5",
                ]),
                rows: competitors
                    .iter()
                    .map(|c| {
                        vec![
                            c.vendor.clone(),
                            c.kind.clone(),
                            c.breadth.to_string(),
                            c.compliance.to_string(),
                            c.explainability.to_string(),
                        ]
                    })
                    .collect(),
            },
        }
    }
}

fn segment_row(s: &Segment) -> Vec<String> {
    vec![
        s.name.clone(),
        s.short_name.clone(),
        s.tam_usd_b.to_string(),
        s.adoption_speed.to_string(),
        s.compliance_burden.to_string(),
        s.chs_fit.to_string(),
        format!("{:.2}", s.priority_score),
    ]
}
