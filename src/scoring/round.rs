use super::category::{score_category, CategoryScore};
use super::index::ScoreIndex;
use super::judges::Panel;
use crate::snapshot::{Category, Contestant, Gender, Round};
use serde::Serialize;
use std::cmp::Ordering;

/// One ranked row in a standings table.
#[derive(Debug, Clone, Serialize)]
pub struct StandingEntry {
    pub contestant: Contestant,
    pub gender: Gender,
    pub total_weighted_score: f64,
    pub total_submissions: usize,

    /// Aggregate completion across the scored categories, clamped to [0, 1].
    pub completion_rate: f64,

    pub category_breakdown: Vec<CategoryScore>,

    /// 1-based position in the full ranking.
    pub overall_rank: usize,

    /// 1-based position within the gender bucket, assigned after bucketing.
    pub gender_rank: Option<usize>,

    pub is_highlighted: bool,
}

/// Per-gender partition of standings entries, relative order preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenderBuckets {
    pub male: Vec<StandingEntry>,
    pub female: Vec<StandingEntry>,
    pub other: Vec<StandingEntry>,
}

impl GenderBuckets {
    pub fn from_entries(entries: &[StandingEntry]) -> Self {
        let mut buckets = GenderBuckets::default();
        for entry in entries {
            buckets.bucket_mut(entry.gender).push(entry.clone());
        }
        buckets
    }

    pub fn get(&self, gender: Gender) -> &[StandingEntry] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
            Gender::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, gender: Gender) -> &mut Vec<StandingEntry> {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
            Gender::Other => &mut self.other,
        }
    }

    fn buckets_mut(&mut self) -> [&mut Vec<StandingEntry>; 3] {
        [&mut self.male, &mut self.female, &mut self.other]
    }

    pub fn truncate_each(&mut self, cap: usize) {
        for bucket in self.buckets_mut() {
            bucket.truncate(cap);
        }
    }

    /// Assign gender ranks and mark the top `highlight` entries per bucket.
    pub fn annotate(&mut self, highlight: Option<usize>) {
        for bucket in self.buckets_mut() {
            for (position, entry) in bucket.iter_mut().enumerate() {
                entry.gender_rank = Some(position + 1);
                entry.is_highlighted = highlight.is_some_and(|count| position < count);
            }
        }
    }

    /// Contestant ids across all buckets, male then female then other.
    pub fn contestant_ids(&self) -> Vec<String> {
        [&self.male, &self.female, &self.other]
            .into_iter()
            .flatten()
            .map(|entry| entry.contestant.id.clone())
            .collect()
    }
}

/// Standings for one round: the full scored ranking plus the capped,
/// annotated per-gender lists that are displayed and advance.
#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    pub round: Round,
    pub judge_count: usize,

    /// Every scored contestant in rank order, before gender capping.
    pub rankings: Vec<StandingEntry>,

    /// Participation-capped per-gender lists, gender-ranked and highlighted.
    pub by_gender: GenderBuckets,

    /// Identities advancing out of this round: the union of the capped
    /// lists. Seeds the next round's pool.
    pub participants: Vec<String>,
}

/// Score one contestant across a set of categories with their resolved
/// panels. Rank fields stay unassigned until the caller sorts.
pub(crate) fn score_entry(
    contestant: &Contestant,
    categories: &[(&Category, Panel)],
    index: &ScoreIndex,
) -> StandingEntry {
    let records = index.for_contestant(&contestant.id);

    let category_breakdown: Vec<CategoryScore> = categories
        .iter()
        .map(|(category, panel)| score_category(records, category, panel))
        .collect();

    let total_weighted_score = category_breakdown.iter().map(|c| c.weighted).sum();
    let total_submissions = category_breakdown.iter().map(|c| c.submissions).sum();
    let total_expected: usize = category_breakdown.iter().map(|c| c.expected).sum();
    let completion_rate = if total_expected > 0 {
        (total_submissions as f64 / total_expected as f64).min(1.0)
    } else {
        0.0
    };

    StandingEntry {
        contestant: contestant.clone(),
        gender: contestant.gender_bucket(),
        total_weighted_score,
        total_submissions,
        completion_rate,
        category_breakdown,
        overall_rank: 0,
        gender_rank: None,
        is_highlighted: false,
    }
}

/// Sort by total weighted score descending and assign 1-based ranks.
/// Ties order by contestant number ascending, then id ascending, so the
/// result never depends on input order.
pub(crate) fn sort_and_rank(entries: &mut [StandingEntry]) {
    entries.sort_by(|a, b| {
        b.total_weighted_score
            .partial_cmp(&a.total_weighted_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.contestant
                    .number
                    .unwrap_or(u32::MAX)
                    .cmp(&b.contestant.number.unwrap_or(u32::MAX))
            })
            .then_with(|| a.contestant.id.cmp(&b.contestant.id))
    });
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.overall_rank = position + 1;
    }
}

/// Rank a contestant pool within one round.
///
/// Contestants with zero submissions are dropped: they have not been scored
/// in this round yet and must not appear in its standings. A round with no
/// categories configured cannot be scored and returns empty rankings.
pub fn rank_round(
    round: &Round,
    categories: &[(&Category, Panel)],
    pool: &[Contestant],
    index: &ScoreIndex,
    judge_count: usize,
) -> RoundResult {
    if categories.is_empty() {
        return RoundResult {
            round: round.clone(),
            judge_count,
            rankings: Vec::new(),
            by_gender: GenderBuckets::default(),
            participants: Vec::new(),
        };
    }

    let mut rankings: Vec<StandingEntry> = pool
        .iter()
        .map(|contestant| score_entry(contestant, categories, index))
        .filter(|entry| entry.total_submissions > 0)
        .collect();
    sort_and_rank(&mut rankings);

    let mut by_gender = GenderBuckets::from_entries(&rankings);
    if let Some(cap) = round.max_per_gender {
        by_gender.truncate_each(cap);
    }
    by_gender.annotate(round.highlight_per_gender);
    let participants = by_gender.contestant_ids();

    RoundResult {
        round: round.clone(),
        judge_count,
        rankings,
        by_gender,
        participants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Criterion, ScoreRecord};

    fn contestant(id: &str, number: u32, gender: &str) -> Contestant {
        Contestant {
            id: id.to_string(),
            number: Some(number),
            name: format!("Contestant {number}"),
            gender: gender.to_string(),
            college: None,
        }
    }

    fn single_criterion_category(id: &str, round_id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: String::new(),
            percentage: 100.0,
            round_id: Some(round_id.to_string()),
            criteria: vec![Criterion {
                id: format!("{id}-cr"),
                name: String::new(),
                max_points: 100.0,
            }],
        }
    }

    fn round_with_caps(
        max_per_gender: Option<usize>,
        highlight_per_gender: Option<usize>,
    ) -> Round {
        Round {
            id: "r1".to_string(),
            name: "Finals".to_string(),
            order_index: 1,
            judge_target: Some(1),
            max_per_gender,
            advance_per_gender: None,
            highlight_per_gender,
        }
    }

    fn score(contestant_id: &str, criterion_id: &str, value: f64) -> ScoreRecord {
        ScoreRecord {
            contestant_id: contestant_id.to_string(),
            criterion_id: criterion_id.to_string(),
            judge_id: "j1".to_string(),
            value,
        }
    }

    struct Fixture {
        round: Round,
        category: Category,
        pool: Vec<Contestant>,
        scores: Vec<ScoreRecord>,
    }

    impl Fixture {
        fn rank(&self) -> RoundResult {
            let index = ScoreIndex::build(&self.scores);
            let categories = vec![(&self.category, Panel::open(1))];
            rank_round(&self.round, &categories, &self.pool, &index, 1)
        }
    }

    fn three_males(round: Round) -> Fixture {
        Fixture {
            category: single_criterion_category("cat1", &round.id),
            round,
            pool: vec![
                contestant("c1", 1, "M"),
                contestant("c2", 2, "M"),
                contestant("c3", 3, "M"),
            ],
            scores: vec![
                score("c1", "cat1-cr", 90.0),
                score("c2", "cat1-cr", 80.0),
                score("c3", "cat1-cr", 70.0),
            ],
        }
    }

    #[test]
    fn test_round_without_categories_is_empty() {
        let round = round_with_caps(None, None);
        let index = ScoreIndex::build(&[]);
        let result = rank_round(&round, &[], &[contestant("c1", 1, "M")], &index, 3);

        assert!(result.rankings.is_empty());
        assert!(result.participants.is_empty());
        assert_eq!(result.judge_count, 3);
    }

    #[test]
    fn test_unscored_contestants_are_dropped() {
        let mut fixture = three_males(round_with_caps(None, None));
        fixture.scores.retain(|s| s.contestant_id != "c3");
        let result = fixture.rank();

        assert_eq!(result.rankings.len(), 2);
        assert!(result.rankings.iter().all(|e| e.contestant.id != "c3"));
    }

    #[test]
    fn test_ranks_descend_by_weighted_score() {
        let result = three_males(round_with_caps(None, None)).rank();

        let ids: Vec<&str> = result.rankings.iter().map(|e| e.contestant.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
        assert_eq!(result.rankings[0].overall_rank, 1);
        assert_eq!(result.rankings[2].overall_rank, 3);
    }

    #[test]
    fn test_ties_break_by_contestant_number() {
        let mut fixture = three_males(round_with_caps(None, None));
        for s in &mut fixture.scores {
            s.value = 80.0;
        }
        // Shuffle the pool; number order must win regardless.
        fixture.pool.reverse();
        let result = fixture.rank();

        let numbers: Vec<u32> = result
            .rankings
            .iter()
            .map(|e| e.contestant.number.unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_participation_cap_limits_gender_bucket() {
        // Three males at 90/80/70 with a cap of two: the 70-scorer is out.
        let result = three_males(round_with_caps(Some(2), None)).rank();

        assert_eq!(result.by_gender.male.len(), 2);
        assert_eq!(result.by_gender.male[0].contestant.id, "c1");
        assert_eq!(result.by_gender.male[1].contestant.id, "c2");
        assert_eq!(result.participants, vec!["c1", "c2"]);
    }

    #[test]
    fn test_gender_ranks_assigned_within_buckets() {
        let mut fixture = three_males(round_with_caps(None, None));
        fixture.pool[1] = contestant("c2", 2, "F");
        let result = fixture.rank();

        assert_eq!(result.by_gender.male.len(), 2);
        assert_eq!(result.by_gender.female.len(), 1);
        assert_eq!(result.by_gender.male[0].gender_rank, Some(1));
        assert_eq!(result.by_gender.male[1].gender_rank, Some(2));
        assert_eq!(result.by_gender.female[0].gender_rank, Some(1));
        // Overall ranks still span the whole round.
        assert_eq!(result.by_gender.female[0].overall_rank, 2);
    }

    #[test]
    fn test_highlight_marks_top_of_capped_bucket() {
        let result = three_males(round_with_caps(Some(2), Some(1))).rank();

        assert!(result.by_gender.male[0].is_highlighted);
        assert!(!result.by_gender.male[1].is_highlighted);
        // Highlighting is presentational; both capped entries advance.
        assert_eq!(result.participants.len(), 2);
    }

    #[test]
    fn test_participants_subset_of_pool() {
        let fixture = three_males(round_with_caps(Some(1), None));
        let pool_ids: Vec<&str> = fixture.pool.iter().map(|c| c.id.as_str()).collect();
        let result = fixture.rank();

        assert!(result
            .participants
            .iter()
            .all(|id| pool_ids.contains(&id.as_str())));
    }

    #[test]
    fn test_full_rankings_ignore_caps() {
        let result = three_males(round_with_caps(Some(1), None)).rank();

        assert_eq!(result.rankings.len(), 3);
        assert_eq!(result.by_gender.male.len(), 1);
    }
}
