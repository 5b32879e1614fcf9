pub mod index;
pub mod judges;
pub mod category;
pub mod round;
pub mod engine;
pub mod validation;

pub use category::{score_category, CategoryScore, CriterionScore};
pub use engine::{compute_standings, OverallStandings, RoundProgression, Standings};
pub use index::ScoreIndex;
pub use judges::{Panel, PanelResolver};
pub use round::{rank_round, GenderBuckets, RoundResult, StandingEntry};
pub use validation::validate_snapshot;
