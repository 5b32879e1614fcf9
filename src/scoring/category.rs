use super::judges::Panel;
use crate::snapshot::{Category, ScoreRecord};
use serde::Serialize;

/// Per-criterion detail inside a category breakdown. Unanswered criteria
/// are recorded with a zero average and zero submissions so the category
/// maximum stays based on the full criteria list, not just answered ones.
#[derive(Debug, Clone, Serialize)]
pub struct CriterionScore {
    pub id: String,
    pub name: String,
    pub average: f64,
    pub max_points: f64,
    pub submissions: usize,
}

/// One contestant's result for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub id: String,
    pub name: String,
    pub percentage: f64,

    /// 0-100 score after completion damping.
    pub normalized: f64,

    /// `normalized` scaled by the category's percentage weight.
    pub weighted: f64,

    /// Fraction of expected submissions actually received, clamped to [0, 1].
    pub completion: f64,

    pub submissions: usize,

    /// Expected submissions (effective judges x criteria). When the panel
    /// size is unknown this falls back to the actual count, so an
    /// unresolvable judge count never forces completion to zero.
    pub expected: usize,

    pub criteria: Vec<CriterionScore>,
}

/// Score one contestant in one category.
///
/// Partially judged categories are damped by their completion ratio: a
/// category scored by one of many expected judges must not read as fully
/// evaluated while judging is still in progress. Damping is monotone and
/// bounded; it never lifts a score above its undamped value.
pub fn score_category(records: &[&ScoreRecord], category: &Category, panel: &Panel) -> CategoryScore {
    let mut criteria_detail = Vec::with_capacity(category.criteria.len());
    let mut raw_total = 0.0;
    let mut submissions = 0usize;

    for criterion in &category.criteria {
        let values: Vec<f64> = records
            .iter()
            .filter(|record| record.criterion_id == criterion.id && panel.admits(&record.judge_id))
            .map(|record| if record.value.is_finite() { record.value } else { 0.0 })
            .collect();

        let average = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };

        raw_total += average;
        submissions += values.len();

        criteria_detail.push(CriterionScore {
            id: criterion.id.clone(),
            name: criterion.name.clone(),
            average,
            max_points: criterion.max_points,
            submissions: values.len(),
        });
    }

    let category_max: f64 = category.criteria.iter().map(|c| c.max_points).sum();
    let raw_normalized = if category_max > 0.0 {
        raw_total / category_max * 100.0
    } else {
        0.0
    };
    let raw_weighted = raw_normalized * (category.percentage / 100.0);

    let expected = if panel.expected > 0 {
        panel.expected * category.criteria.len()
    } else {
        submissions
    };
    let completion = if expected > 0 {
        (submissions as f64 / expected as f64).min(1.0)
    } else {
        0.0
    };

    CategoryScore {
        id: category.id.clone(),
        name: category.name.clone(),
        percentage: category.percentage,
        normalized: raw_normalized * completion,
        weighted: raw_weighted * completion,
        completion,
        submissions,
        expected,
        criteria: criteria_detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Criterion;

    fn two_criteria_category() -> Category {
        Category {
            id: "cat1".to_string(),
            name: "Evening Gown".to_string(),
            percentage: 100.0,
            round_id: None,
            criteria: vec![
                Criterion {
                    id: "cr1".to_string(),
                    name: "Poise".to_string(),
                    max_points: 50.0,
                },
                Criterion {
                    id: "cr2".to_string(),
                    name: "Presence".to_string(),
                    max_points: 50.0,
                },
            ],
        }
    }

    fn record(criterion_id: &str, judge_id: &str, value: f64) -> ScoreRecord {
        ScoreRecord {
            contestant_id: "c1".to_string(),
            criterion_id: criterion_id.to_string(),
            judge_id: judge_id.to_string(),
            value,
        }
    }

    fn refs(records: &[ScoreRecord]) -> Vec<&ScoreRecord> {
        records.iter().collect()
    }

    #[test]
    fn test_fully_judged_category() {
        // Two judges, two criteria of 50 points each, weight 100%.
        let category = two_criteria_category();
        let records = vec![
            record("cr1", "ja", 30.0),
            record("cr2", "ja", 40.0),
            record("cr1", "jb", 20.0),
            record("cr2", "jb", 30.0),
        ];

        let score = score_category(&refs(&records), &category, &Panel::open(2));

        // Per-criterion averages 25 and 35 -> 60/100 raw.
        assert_eq!(score.submissions, 4);
        assert_eq!(score.expected, 4);
        assert_eq!(score.completion, 1.0);
        assert!((score.normalized - 60.0).abs() < 1e-9);
        assert!((score.weighted - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_judged_category_is_damped() {
        let category = two_criteria_category();
        let records = vec![record("cr1", "ja", 20.0), record("cr2", "ja", 40.0)];

        let score = score_category(&refs(&records), &category, &Panel::open(2));

        // Raw 60/100, but only 2 of 4 expected submissions arrived.
        assert_eq!(score.submissions, 2);
        assert_eq!(score.expected, 4);
        assert_eq!(score.completion, 0.5);
        assert!((score.weighted - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_damped_never_exceeds_undamped() {
        let category = two_criteria_category();
        let records = vec![record("cr1", "ja", 30.0), record("cr2", "ja", 40.0)];

        let score = score_category(&refs(&records), &category, &Panel::open(2));

        // Raw 70, damped by 0.5.
        assert!((score.weighted - 35.0).abs() < 1e-9);
        assert!(score.weighted <= 70.0);
        assert!(score.completion <= 1.0);
    }

    #[test]
    fn test_unanswered_criterion_still_counts_toward_max() {
        let category = two_criteria_category();
        let records = vec![record("cr1", "ja", 50.0), record("cr1", "jb", 50.0)];

        let score = score_category(&refs(&records), &category, &Panel::open(2));

        // cr2 has no records but stays in the detail and in the 100-point max.
        assert_eq!(score.criteria.len(), 2);
        assert_eq!(score.criteria[1].average, 0.0);
        assert_eq!(score.criteria[1].submissions, 0);
        assert_eq!(score.submissions, 2);
        assert_eq!(score.completion, 0.5);
        // Raw 50/100 damped by 0.5.
        assert!((score.weighted - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_restricted_panel_filters_records() {
        let category = two_criteria_category();
        let records = vec![
            record("cr1", "ja", 40.0),
            record("cr1", "outsider", 10.0),
            record("cr2", "ja", 40.0),
        ];
        let panel = Panel::restricted(["ja".to_string()].into_iter().collect());

        let score = score_category(&refs(&records), &category, &panel);

        // Only ja's records count: averages 40 and 40 -> 80 raw, complete.
        assert_eq!(score.submissions, 2);
        assert_eq!(score.expected, 2);
        assert_eq!(score.completion, 1.0);
        assert!((score.weighted - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_restricted_panel_scores_zero() {
        let category = two_criteria_category();
        let records = vec![record("cr1", "ja", 40.0)];
        let panel = Panel::restricted(Default::default());

        let score = score_category(&refs(&records), &category, &panel);

        assert_eq!(score.submissions, 0);
        assert_eq!(score.expected, 0);
        assert_eq!(score.completion, 0.0);
        assert_eq!(score.weighted, 0.0);
    }

    #[test]
    fn test_unknown_panel_size_falls_back_to_actual_count() {
        let category = two_criteria_category();
        let records = vec![record("cr1", "ja", 25.0), record("cr2", "ja", 25.0)];

        let score = score_category(&refs(&records), &category, &Panel::open(0));

        // No resolvable judge count: expected mirrors actual, completion 1.
        assert_eq!(score.expected, 2);
        assert_eq!(score.completion, 1.0);
        assert!((score.weighted - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_category_max_scores_zero() {
        let category = Category {
            id: "cat1".to_string(),
            name: String::new(),
            percentage: 50.0,
            round_id: None,
            criteria: vec![Criterion {
                id: "cr1".to_string(),
                name: String::new(),
                max_points: 0.0,
            }],
        };
        let records = vec![record("cr1", "ja", 10.0)];

        let score = score_category(&refs(&records), &category, &Panel::open(1));

        assert_eq!(score.normalized, 0.0);
        assert_eq!(score.weighted, 0.0);
    }

    #[test]
    fn test_no_criteria_scores_zero() {
        let category = Category {
            id: "cat1".to_string(),
            name: String::new(),
            percentage: 100.0,
            round_id: None,
            criteria: vec![],
        };

        let score = score_category(&[], &category, &Panel::open(3));

        assert_eq!(score.submissions, 0);
        assert_eq!(score.expected, 0);
        assert_eq!(score.completion, 0.0);
        assert_eq!(score.weighted, 0.0);
    }

    #[test]
    fn test_non_finite_values_coerce_to_zero() {
        let category = two_criteria_category();
        let records = vec![
            record("cr1", "ja", f64::NAN),
            record("cr2", "ja", 50.0),
        ];

        let score = score_category(&refs(&records), &category, &Panel::open(1));

        // NaN reads as 0: raw 50/100, fully complete for a 1-judge panel.
        assert_eq!(score.completion, 1.0);
        assert!((score.normalized - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_respects_percentage() {
        let mut category = two_criteria_category();
        category.percentage = 30.0;
        let records = vec![record("cr1", "ja", 50.0), record("cr2", "ja", 50.0)];

        let score = score_category(&refs(&records), &category, &Panel::open(1));

        assert!((score.normalized - 100.0).abs() < 1e-9);
        assert!((score.weighted - 30.0).abs() < 1e-9);
        assert!(score.weighted <= category.percentage);
    }
}
