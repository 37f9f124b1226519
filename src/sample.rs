//! Built-in sample datasets the dashboard is seeded with.

use crate::model::{
    ArchComponent, Competitor, FeatureMatrix, FunnelStage, MatrixRow, PricingTier, Rating,
    ReferenceData, RoadmapItem, Segment,
};

const SEGMENTS: [(&str, &str, f64, Rating, Rating, Rating); 6] = [
    ("Wellness & Fitness App Developers", "Fitness Apps", 3.8, 4, 2, 4),
    ("AI Health Coaching Startups", "AI Health Coaches", 11.0, 5, 3, 5),
    ("Chronic Condition Management Apps", "Chronic Apps", 1.6, 3, 5, 5),
    ("Wearable Data Aggregators & API Platforms", "Aggregators", 0.212, 3, 5, 4),
    ("Digital Therapeutics & Rx Wellness Startups", "DTx", 7.8, 2, 5, 4),
    ("Consumer Wearable Hardware Startups", "Hardware", 22.0, 3, 3, 3),
];

const ARCHITECTURE: [(&str, &str, &str, &str); 7] = [
    ("Experience", "Developer Console", "Project config, API keys, dashboards", "Planned"),
    ("Experience", "Compliance Dashboard", "BAA center, audit logs, cert view", "Planned"),
    ("Platform", "Explainability Service", "Model cards, decision logs, feature importance", "Planned"),
    ("Platform", "Model Hosting", "Healthcare-tuned models (stress, risk, etc.)", "Future"),
    ("Data", "Unified Wearable APIs", "Apple/Google/Fitbit/Oura connectors", "MVP"),
    ("Data", "Consent & Audit Layer", "PHI tagging, event logs, consent artifacts", "MVP"),
    ("Infra", "Security & Residency", "KMS, region routing, retention policies", "MVP"),
];

/// Display order for the layer-mix chart and the architecture chain.
pub const LAYER_ORDER: [&str; 4] = ["Infra", "Data", "Platform", "Experience"];

const ROADMAP: [(&str, &str, &str, &str); 6] = [
    ("MVP", "Q1", "Data & Compliance", "Unified wearable APIs + audit logging"),
    ("MVP", "Q1", "Experience", "Developer console + basic dashboard"),
    ("V1", "Q2", "AI & Explainability", "Stress model + explainability views"),
    ("V1", "Q2", "Partnerships", "AI health-coach design partners (5–8)"),
    ("V2", "Q3", "Enterprise", "SOC 2, SSO/SCIM, DTx pilots"),
    ("V2", "Q3", "Ecosystem", "Aggregator integrations (Validic/Terra-style)"),
];

pub const QUARTERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

const PRICING: [(&str, u32, &str); 3] = [
    ("Sandbox", 0, "1 project, 50k events/month, no BAAs, community support"),
    ("Growth", 499, "Up to 3 projects, 5M events/month, BAAs, email support"),
    ("Enterprise", 2500, "Unlimited projects, 50M+ events, BAAs, SSO, dedicated CSM"),
];

const FUNNEL: [(&str, u64); 5] = [
    ("Site Visitors", 5000),
    ("Signup (Dev Accounts)", 800),
    ("Activated (First API Call)", 300),
    ("Pilots (Design Partners)", 40),
    ("Paying Customers", 10),
];

const COMPETITORS: [(&str, &str, Rating, Rating, Rating); 6] = [
    ("AWS Health AI", "Hyperscaler", 5, 3, 3),
    ("Google Healthcare API", "Hyperscaler", 5, 3, 3),
    ("Azure Health Data Services", "Hyperscaler", 4, 3, 3),
    ("Niche AI Vendor A", "Niche", 2, 4, 2),
    ("Niche AI Vendor B", "Niche", 2, 3, 3),
    ("CentauriHS", "CHS", 3, 5, 5),
];

pub const FEATURES: [&str; 6] = [
    "Unified Wearable APIs",
    "Consent & Audit Trails",
    "Explainability Dashboards",
    "HIPAA/SOC2 Compliance Pack",
    "Data Residency Controls",
    "DTx / FDA Support",
];

// Rows follow SEGMENTS order.
const IMPORTANCE: [[Rating; 6]; 6] = [
    [5, 3, 3, 2, 2, 1],
    [4, 4, 5, 4, 3, 2],
    [4, 5, 4, 5, 4, 3],
    [3, 5, 4, 4, 4, 2],
    [3, 5, 5, 5, 4, 5],
    [5, 3, 2, 2, 2, 1],
];

/// Segments with a zero priority score; the session scores them on load.
pub fn segments() -> Vec<Segment> {
    SEGMENTS
        .iter()
        .map(
            |&(name, short_name, tam, adoption, compliance, fit)| Segment {
                name: name.to_string(),
                short_name: short_name.to_string(),
                tam_usd_b: tam,
                adoption_speed: adoption,
                compliance_burden: compliance,
                chs_fit: fit,
                priority_score: 0.0,
            },
        )
        .collect()
}

pub fn funnel() -> Vec<FunnelStage> {
    FUNNEL
        .iter()
        .map(|&(stage, count)| FunnelStage {
            stage: stage.to_string(),
            count,
        })
        .collect()
}

pub fn reference_data() -> ReferenceData {
    ReferenceData {
        architecture: ARCHITECTURE
            .iter()
            .map(|&(layer, component, description, status)| ArchComponent {
                layer: layer.to_string(),
                component: component.to_string(),
                description: description.to_string(),
                status: status.to_string(),
            })
            .collect(),
        roadmap: ROADMAP
            .iter()
            .map(|&(phase, quarter, area, item)| RoadmapItem {
                phase: phase.to_string(),
                quarter: quarter.to_string(),
                area: area.to_string(),
                item: item.to_string(),
            })
            .collect(),
        pricing: PRICING
            .iter()
            .map(|&(tier, price, includes)| PricingTier {
                tier: tier.to_string(),
                price_usd_per_month: price,
                includes: includes.to_string(),
            })
            .collect(),
        competitors: COMPETITORS
            .iter()
            .map(
                |&(vendor, kind, breadth, compliance, explainability)| Competitor {
                    vendor: vendor.to_string(),
                    kind: kind.to_string(),
                    breadth,
                    compliance,
                    explainability,
                },
            )
            .collect(),
        features: feature_matrix(),
    }
}

fn feature_matrix() -> FeatureMatrix {
    FeatureMatrix {
        id_column: "Segment".to_string(),
        columns: FEATURES.iter().map(|f| f.to_string()).collect(),
        rows: SEGMENTS
            .iter()
            .zip(IMPORTANCE.iter())
            .map(|(seg, values)| MatrixRow {
                id: seg.1.to_string(),
                values: values.to_vec(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sizes() {
        let reference = reference_data();
        assert_eq!(segments().len(), 6);
        assert_eq!(funnel().len(), 5);
        assert_eq!(reference.architecture.len(), 7);
        assert_eq!(reference.roadmap.len(), 6);
        assert_eq!(reference.pricing.len(), 3);
        assert_eq!(reference.competitors.len(), 6);
        assert_eq!(reference.features.rows.len(), 6);
        assert!(reference
            .features
            .rows
            .iter()
            .all(|r| r.values.len() == reference.features.columns.len()));
    }

    #[test]
    fn feature_rows_keyed_by_short_name() {
        let ids: Vec<String> = reference_data()
            .features
            .rows
            .into_iter()
            .map(|r| r.id)
            .collect();
        let short: Vec<String> = segments().into_iter().map(|s| s.short_name).collect();
        assert_eq!(ids, short);
    }
}
