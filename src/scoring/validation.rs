use crate::snapshot::Snapshot;
use std::collections::{HashMap, HashSet};

/// Validate a snapshot before tabulation.
/// Returns all findings at once (not just the first).
///
/// Findings are advisory: the engine degrades gracefully on every one of
/// them (malformed values read as zero, unknown ids simply never match),
/// so callers typically report them and proceed.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let contestant_ids: HashSet<&str> = snapshot
        .contestants
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    let judge_ids: HashSet<&str> = snapshot.judges.iter().map(|j| j.id.as_str()).collect();
    let round_ids: HashSet<&str> = snapshot.rounds.iter().map(|r| r.id.as_str()).collect();
    let category_ids: HashSet<&str> = snapshot.categories.iter().map(|c| c.id.as_str()).collect();

    let mut criterion_max: HashMap<&str, f64> = HashMap::new();

    // Categories and criteria
    for (i, category) in snapshot.categories.iter().enumerate() {
        if category.percentage < 0.0 {
            errors.push(format!(
                "categories[{}].percentage: must be non-negative (got {})",
                i, category.percentage
            ));
        }
        if let Some(round_id) = &category.round_id {
            if !round_ids.contains(round_id.as_str()) {
                errors.push(format!(
                    "categories[{}].round_id: unknown round '{}'",
                    i, round_id
                ));
            }
        }
        for (j, criterion) in category.criteria.iter().enumerate() {
            if criterion.max_points <= 0.0 {
                errors.push(format!(
                    "categories[{}].criteria[{}].max_points: must be positive (got {})",
                    i, j, criterion.max_points
                ));
            }
            criterion_max.insert(criterion.id.as_str(), criterion.max_points);
        }
    }

    // Per-round weight totals
    for round in &snapshot.rounds {
        let total: f64 = snapshot
            .categories
            .iter()
            .filter(|c| c.round_id.as_deref() == Some(round.id.as_str()))
            .map(|c| c.percentage)
            .sum();
        if total > 100.0 + 1e-9 {
            errors.push(format!(
                "rounds['{}']: category percentages sum to {} (expected at most 100)",
                round.id, total
            ));
        }
    }

    // Round configuration
    for (i, round) in snapshot.rounds.iter().enumerate() {
        if let (Some(advance), Some(max)) = (round.advance_per_gender, round.max_per_gender) {
            if advance > max {
                errors.push(format!(
                    "rounds[{}].advance_per_gender: {} exceeds max_per_gender {}",
                    i, advance, max
                ));
            }
        }
    }

    // Assignment tables
    for (round_id, assigned) in &snapshot.round_judges {
        if !round_ids.contains(round_id.as_str()) {
            errors.push(format!("round_judges['{}']: unknown round", round_id));
        }
        for judge_id in assigned {
            if !judge_ids.contains(judge_id.as_str()) {
                errors.push(format!(
                    "round_judges['{}']: unknown judge '{}'",
                    round_id, judge_id
                ));
            }
        }
    }
    for (category_id, assigned) in &snapshot.category_judges {
        if !category_ids.contains(category_id.as_str()) {
            errors.push(format!("category_judges['{}']: unknown category", category_id));
        }
        for judge_id in assigned {
            if !judge_ids.contains(judge_id.as_str()) {
                errors.push(format!(
                    "category_judges['{}']: unknown judge '{}'",
                    category_id, judge_id
                ));
            }
        }
    }

    // Score records
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
    for (i, record) in snapshot.scores.iter().enumerate() {
        if !record.contestant_id.is_empty() && !contestant_ids.contains(record.contestant_id.as_str())
        {
            errors.push(format!(
                "scores[{}].contestant_id: unknown contestant '{}'",
                i, record.contestant_id
            ));
        }
        if !record.judge_id.is_empty() && !judge_ids.contains(record.judge_id.as_str()) {
            errors.push(format!(
                "scores[{}].judge_id: unknown judge '{}'",
                i, record.judge_id
            ));
        }
        match criterion_max.get(record.criterion_id.as_str()) {
            None => errors.push(format!(
                "scores[{}].criterion_id: unknown criterion '{}'",
                i, record.criterion_id
            )),
            Some(max) => {
                if record.value.is_finite() && record.value > *max {
                    errors.push(format!(
                        "scores[{}].value: exceeds criterion max ({} > {})",
                        i, record.value, max
                    ));
                }
            }
        }
        if !record.value.is_finite() {
            errors.push(format!("scores[{}].value: not a finite number", i));
        } else if record.value < 0.0 {
            errors.push(format!(
                "scores[{}].value: must be non-negative (got {})",
                i, record.value
            ));
        }
        if !seen.insert((
            record.contestant_id.as_str(),
            record.criterion_id.as_str(),
            record.judge_id.as_str(),
        )) {
            errors.push(format!(
                "scores[{}]: duplicate record for contestant '{}', criterion '{}', judge '{}'",
                i, record.contestant_id, record.criterion_id, record.judge_id
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
