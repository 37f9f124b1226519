use super::round_to;
use crate::error::LabError;
use crate::model::{FunnelStage, Matrix};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount<K> {
    pub key: K,
    pub count: usize,
}

/// Count records per group key.
///
/// Groups come out in order of first appearance, so the result is stable
/// for a given input order. Empty groups never appear and every record
/// lands in exactly one group.
pub fn group_count<T, K, F>(records: &[T], key_of: F) -> Vec<GroupCount<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<GroupCount<K>> = Vec::new();
    for record in records {
        let key = key_of(record);
        match index.get(&key) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(GroupCount { key, count: 1 });
            }
        }
    }
    groups
}

/// One cell of a wide table in long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord<V> {
    pub id: String,
    pub variable: String,
    pub value: V,
}

/// Melt the named value columns of `matrix` into `(id, variable, value)`
/// records, column by column. Produces exactly `rows × value_columns`
/// records; an unknown column name is an error rather than a silent skip.
pub fn reshape_to_long<V: Clone>(
    matrix: &Matrix<V>,
    value_columns: &[&str],
) -> Result<Vec<LongRecord<V>>, LabError> {
    let indices = value_columns
        .iter()
        .map(|name| {
            matrix
                .columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| LabError::UnknownColumn((*name).to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Vec::with_capacity(matrix.rows.len() * indices.len());
    for (&col, name) in indices.iter().zip(value_columns) {
        for row in &matrix.rows {
            let value = row
                .values
                .get(col)
                .cloned()
                .ok_or_else(|| LabError::UnknownColumn((*name).to_string()))?;
            out.push(LongRecord {
                id: row.id.clone(),
                variable: (*name).to_string(),
                value,
            });
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRow {
    pub stage: String,
    pub count: u64,
    /// Percent of the previous stage, 1 decimal. `None` for the first stage
    /// and whenever the previous count is zero.
    pub conversion_from_prev_pct: Option<f64>,
}

/// Stage-over-stage conversion for an ordered funnel.
pub fn compute_conversion_series(stages: &[FunnelStage]) -> Vec<ConversionRow> {
    let mut prev: Option<u64> = None;
    stages
        .iter()
        .map(|s| {
            let conversion_from_prev_pct = match prev {
                Some(p) if p > 0 => Some(round_to(s.count as f64 / p as f64 * 100.0, 1)),
                _ => None,
            };
            prev = Some(s.count);
            ConversionRow {
                stage: s.stage.clone(),
                count: s.count,
                conversion_from_prev_pct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatrixRow;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::HashSet;

    struct Rec {
        seg: &'static str,
        status: &'static str,
    }

    fn stage(name: &str, count: u64) -> FunnelStage {
        FunnelStage {
            stage: name.into(),
            count,
        }
    }

    #[test]
    fn group_count_by_segment_and_status() {
        let records = [
            Rec { seg: "A", status: "Planned" },
            Rec { seg: "A", status: "Planned" },
            Rec { seg: "B", status: "Done" },
        ];
        let groups = group_count(&records, |r| (r.seg, r.status));
        let got: HashSet<(&str, &str, usize)> = groups
            .iter()
            .map(|g| (g.key.0, g.key.1, g.count))
            .collect();
        let want: HashSet<(&str, &str, usize)> =
            [("A", "Planned", 2), ("B", "Done", 1)].into_iter().collect();
        assert_eq!(got, want);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn group_count_keeps_first_appearance_order() {
        let layers = ["Experience", "Experience", "Platform", "Data", "Platform", "Infra"];
        let groups = group_count(&layers, |l| *l);
        let keys: Vec<&str> = groups.iter().map(|g| g.key).collect();
        assert_eq!(keys, ["Experience", "Platform", "Data", "Infra"]);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn group_count_of_nothing_is_empty() {
        let empty: [Rec; 0] = [];
        assert!(group_count(&empty, |r| r.seg).is_empty());
    }

    #[test]
    fn conversion_series_matches_funnel() {
        let series = compute_conversion_series(&[
            stage("Visitors", 5000),
            stage("Signup", 800),
            stage("Activated", 300),
        ]);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].conversion_from_prev_pct, None);
        assert_eq!(series[1].conversion_from_prev_pct, Some(16.0));
        assert_eq!(series[2].conversion_from_prev_pct, Some(37.5));
    }

    #[test]
    fn conversion_after_zero_is_undefined() {
        let series = compute_conversion_series(&[
            stage("Visitors", 0),
            stage("Signup", 10),
            stage("Activated", 0),
            stage("Paid", 0),
        ]);
        let pcts: Vec<Option<f64>> = series.iter().map(|r| r.conversion_from_prev_pct).collect();
        assert_eq!(pcts, vec![None, None, Some(0.0), None]);
    }

    #[test]
    fn conversion_ties_round_to_even() {
        let series = compute_conversion_series(&[stage("a", 16), stage("b", 1)]);
        assert_eq!(series[1].conversion_from_prev_pct, Some(6.2));
    }

    #[test]
    fn conversion_of_empty_funnel_is_empty() {
        assert!(compute_conversion_series(&[]).is_empty());
    }

    fn square_matrix(n: usize) -> Matrix<u8> {
        Matrix {
            id_column: "Segment".into(),
            columns: (0..n).map(|c| format!("F{c}")).collect(),
            rows: (0..n)
                .map(|r| MatrixRow {
                    id: format!("S{r}"),
                    values: (0..n).map(|c| (r * n + c) as u8).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn reshape_six_by_six_yields_36_traceable_cells() {
        let m = square_matrix(6);
        let cols: Vec<&str> = m.columns.iter().map(String::as_str).collect();
        let long = reshape_to_long(&m, &cols).unwrap();
        assert_eq!(long.len(), 36);

        let cells: HashSet<(String, String)> =
            long.iter().map(|r| (r.id.clone(), r.variable.clone())).collect();
        assert_eq!(cells.len(), 36);

        for rec in &long {
            let r: usize = rec.id[1..].parse().unwrap();
            let c: usize = rec.variable[1..].parse().unwrap();
            assert_eq!(rec.value, m.rows[r].values[c]);
        }
        // Column-major, like a melt.
        assert_eq!(long[0].id, "S0");
        assert_eq!(long[1].id, "S1");
        assert_eq!(long[0].variable, "F0");
        assert_eq!(long[6].variable, "F1");
    }

    #[test]
    fn reshape_subset_of_columns() {
        let m = square_matrix(3);
        let long = reshape_to_long(&m, &["F2"]).unwrap();
        assert_eq!(long.len(), 3);
        assert!(long.iter().all(|r| r.variable == "F2"));
    }

    #[test]
    fn reshape_unknown_column_is_rejected() {
        let m = square_matrix(2);
        assert_eq!(
            reshape_to_long(&m, &["Nope"]),
            Err(LabError::UnknownColumn("Nope".into()))
        );
    }

    proptest! {
        #[test]
        fn group_counts_partition_the_input(keys in proptest::collection::vec(0u8..6, 0..60)) {
            let groups = group_count(&keys, |k| *k);
            let total: usize = groups.iter().map(|g| g.count).sum();
            prop_assert_eq!(total, keys.len());
            prop_assert!(groups.iter().all(|g| g.count > 0));
            let distinct: HashSet<u8> = keys.iter().copied().collect();
            prop_assert_eq!(groups.len(), distinct.len());
        }

        #[test]
        fn conversion_series_keeps_length(counts in proptest::collection::vec(0u64..10_000, 0..12)) {
            let stages: Vec<FunnelStage> = counts
                .iter()
                .enumerate()
                .map(|(i, c)| stage(&format!("S{i}"), *c))
                .collect();
            let series = compute_conversion_series(&stages);
            prop_assert_eq!(series.len(), stages.len());
            if let Some(first) = series.first() {
                prop_assert!(first.conversion_from_prev_pct.is_none());
            }
        }
    }
}
