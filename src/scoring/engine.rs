use super::index::ScoreIndex;
use super::judges::{Panel, PanelResolver};
use super::round::{rank_round, score_entry, sort_and_rank, GenderBuckets, RoundResult, StandingEntry};
use crate::snapshot::{Category, Contestant, Snapshot};
use serde::Serialize;
use std::collections::HashSet;

/// Cross-round standings over every category, with no participation caps.
/// Caps are a round-scoped concept only.
#[derive(Debug, Clone, Serialize)]
pub struct OverallStandings {
    pub rankings: Vec<StandingEntry>,
    pub by_gender: GenderBuckets,
}

/// Complete output of one tabulation pass. A derived, disposable structure;
/// every invocation recomputes it from the snapshot alone.
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    pub overall: OverallStandings,
    pub rounds: Vec<RoundResult>,
}

/// Per-round participant counts after gender capping.
#[derive(Debug, Clone, Serialize)]
pub struct RoundProgression {
    pub round_id: String,
    pub round_name: String,
    pub male_count: usize,
    pub female_count: usize,
}

impl Standings {
    pub fn progression(&self) -> Vec<RoundProgression> {
        self.rounds
            .iter()
            .map(|result| RoundProgression {
                round_id: result.round.id.clone(),
                round_name: result.round.name.clone(),
                male_count: result.by_gender.male.len(),
                female_count: result.by_gender.female.len(),
            })
            .collect()
    }

    /// Mean completion rate across the overall rankings. Zero when nobody
    /// has been scored yet.
    pub fn average_completion(&self) -> f64 {
        let rankings = &self.overall.rankings;
        if rankings.is_empty() {
            return 0.0;
        }
        rankings.iter().map(|e| e.completion_rate).sum::<f64>() / rankings.len() as f64
    }
}

/// Compute standings for an entire competition from one snapshot.
///
/// Overall standings run every contestant through every category. Rounds
/// are then evaluated in `order_index` order, each ranking the pool handed
/// forward by its predecessor: the first round sees every contestant, later
/// rounds only the advancers. A round that produces no advancers (nothing
/// scored yet) leaves the pool unchanged so rounds not yet reached are not
/// starved.
pub fn compute_standings(snapshot: &Snapshot) -> Standings {
    let index = ScoreIndex::build(&snapshot.scores);
    let resolver = PanelResolver::new(snapshot);

    let overall_categories: Vec<(&Category, Panel)> = snapshot
        .categories
        .iter()
        .map(|category| (category, resolver.category_panel(category, None)))
        .collect();

    let mut overall_rankings: Vec<StandingEntry> = snapshot
        .contestants
        .iter()
        .map(|contestant| score_entry(contestant, &overall_categories, &index))
        .filter(|entry| entry.total_submissions > 0)
        .collect();
    sort_and_rank(&mut overall_rankings);

    let mut overall_by_gender = GenderBuckets::from_entries(&overall_rankings);
    overall_by_gender.annotate(None);

    let mut rounds_sorted: Vec<_> = snapshot.rounds.iter().collect();
    rounds_sorted.sort_by_key(|round| round.order_index);

    let mut pool: Vec<Contestant> = snapshot.contestants.clone();
    let mut rounds = Vec::with_capacity(rounds_sorted.len());

    for round in rounds_sorted {
        let panel = resolver.round_panel(round);
        let categories: Vec<(&Category, Panel)> = snapshot
            .categories
            .iter()
            .filter(|category| category.round_id.as_deref() == Some(round.id.as_str()))
            .map(|category| {
                let scoped = resolver.category_panel(category, Some(&panel));
                (category, scoped)
            })
            .collect();

        let result = rank_round(round, &categories, &pool, &index, panel.expected);

        if !result.participants.is_empty() {
            let advancing: HashSet<&str> =
                result.participants.iter().map(String::as_str).collect();
            pool.retain(|contestant| advancing.contains(contestant.id.as_str()));
        }

        rounds.push(result);
    }

    Standings {
        overall: OverallStandings {
            rankings: overall_rankings,
            by_gender: overall_by_gender,
        },
        rounds,
    }
}
