use crate::snapshot::{Category, Round, Snapshot};
use std::collections::HashSet;

/// Resolved judging panel for one scoring scope: how many judges are
/// expected to submit, and (when restricted) which judges' records count.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Effective judge count, the expected-submission denominator. Can be
    /// zero when an explicit assignment list resolves to nobody.
    pub expected: usize,

    /// When set, only records from these judges count.
    pub allowed: Option<HashSet<String>>,
}

impl Panel {
    pub fn open(expected: usize) -> Self {
        Panel {
            expected,
            allowed: None,
        }
    }

    pub fn restricted(ids: HashSet<String>) -> Self {
        Panel {
            expected: ids.len(),
            allowed: Some(ids),
        }
    }

    pub fn admits(&self, judge_id: &str) -> bool {
        match &self.allowed {
            Some(ids) => ids.contains(judge_id),
            None => true,
        }
    }

    /// Scope this panel down to an explicit judge list. A restricted panel
    /// intersects with its existing set; an open panel intersects the list
    /// with the active-judge roster.
    fn narrowed(&self, ids: &[String], active: &HashSet<&str>) -> Panel {
        let scoped: HashSet<String> = match &self.allowed {
            Some(existing) => ids.iter().filter(|id| existing.contains(*id)).cloned().collect(),
            None => ids
                .iter()
                .filter(|id| active.contains(id.as_str()))
                .cloned()
                .collect(),
        };
        Panel::restricted(scoped)
    }
}

/// Resolves effective judge counts and allowed-judge sets from the roster
/// and the round/category assignment tables.
///
/// Per round, in priority order: an explicit assignment list (intersected
/// with active judges, kept even when the intersection is empty so an
/// unstaffed round reports zero expected coverage), then a configured judge
/// target, then the full active roster.
#[derive(Debug)]
pub struct PanelResolver<'a> {
    snapshot: &'a Snapshot,
    active: HashSet<&'a str>,
}

impl<'a> PanelResolver<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let active = snapshot
            .judges
            .iter()
            .filter(|judge| judge.active)
            .map(|judge| judge.id.as_str())
            .collect();
        PanelResolver { snapshot, active }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn round_panel(&self, round: &Round) -> Panel {
        if let Some(assigned) = self.snapshot.round_judges.get(&round.id) {
            let ids: HashSet<String> = assigned
                .iter()
                .filter(|id| self.active.contains(id.as_str()))
                .cloned()
                .collect();
            return Panel::restricted(ids);
        }
        if let Some(target) = round.judge_target {
            if target > 0 {
                return Panel::open(target as usize);
            }
        }
        Panel::open(self.active.len())
    }

    /// Judge count used when scoring outside any single round: the maximum
    /// of the per-round resolved counts, falling back to the full active
    /// roster when no rounds are configured.
    pub fn overall_count(&self) -> usize {
        match self
            .snapshot
            .rounds
            .iter()
            .map(|round| self.round_panel(round).expected)
            .max()
        {
            Some(count) => count,
            None => self.active.len(),
        }
    }

    /// Effective panel for one category. Inherits the round panel when one
    /// is supplied, otherwise resolves the overall scope (which still picks
    /// up the owning round's assignment set, if any). A category with its
    /// own assignment list scopes further to that list.
    pub fn category_panel(&self, category: &Category, round_panel: Option<&Panel>) -> Panel {
        let base = match round_panel {
            Some(panel) => panel.clone(),
            None => self.overall_base(category),
        };
        match self.snapshot.category_judges.get(&category.id) {
            Some(ids) => base.narrowed(ids, &self.active),
            None => base,
        }
    }

    fn overall_base(&self, category: &Category) -> Panel {
        if let Some(round_id) = &category.round_id {
            if self.snapshot.round_judges.contains_key(round_id) {
                if let Some(round) = self.snapshot.rounds.iter().find(|r| &r.id == round_id) {
                    return self.round_panel(round);
                }
            }
        }
        Panel::open(self.overall_count())
    }
}
