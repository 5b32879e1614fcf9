use crate::snapshot::ScoreRecord;
use std::collections::HashMap;

/// Score records grouped by contestant for O(1) lookup during scoring.
///
/// Records with an empty contestant id are dropped silently; they cannot be
/// attributed to anyone.
#[derive(Debug)]
pub struct ScoreIndex<'a> {
    by_contestant: HashMap<&'a str, Vec<&'a ScoreRecord>>,
}

impl<'a> ScoreIndex<'a> {
    pub fn build(scores: &'a [ScoreRecord]) -> Self {
        let mut by_contestant: HashMap<&str, Vec<&ScoreRecord>> = HashMap::new();
        for record in scores {
            if record.contestant_id.is_empty() {
                continue;
            }
            by_contestant
                .entry(record.contestant_id.as_str())
                .or_default()
                .push(record);
        }
        ScoreIndex { by_contestant }
    }

    /// All records for one contestant, in input order. Empty if none exist.
    pub fn for_contestant(&self, contestant_id: &str) -> &[&'a ScoreRecord] {
        self.by_contestant
            .get(contestant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
