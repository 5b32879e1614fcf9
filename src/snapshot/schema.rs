use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Normalized gender bucket used to partition standings.
///
/// Registration data carries free-text labels; `from_label` is the defensive
/// fallback that maps them onto this enum. Anything unrecognized, including
/// an empty label, lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

const MALE_TOKENS: &[&str] = &["m", "male", "men", "masculine"];
const FEMALE_TOKENS: &[&str] = &["f", "female", "women", "feminine"];

impl Gender {
    /// Classify a free-text label. Total function: never fails.
    /// Male tokens are checked before female tokens.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return Gender::Other;
        }
        if MALE_TOKENS.iter().any(|token| lower.starts_with(token)) {
            return Gender::Male;
        }
        if FEMALE_TOKENS.iter().any(|token| lower.starts_with(token)) {
            return Gender::Female;
        }
        Gender::Other
    }
}

/// A competition entrant. Display attributes only; all scoring state lives
/// in `ScoreRecord` rows owned by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: String,

    /// Stage number. Also the deterministic tie-break key when two
    /// contestants land on exactly the same total.
    #[serde(default)]
    pub number: Option<u32>,

    #[serde(default)]
    pub name: String,

    /// Raw gender label as registered ("M", "female", "Women", ...).
    #[serde(default)]
    pub gender: String,

    #[serde(default)]
    pub college: Option<String>,
}

impl Contestant {
    pub fn gender_bucket(&self) -> Gender {
        Gender::from_label(&self.gender)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judge {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Inactive judges never count toward expected submissions.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// An ordered competition phase with its own category subset and
/// gender-based cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Rounds are evaluated in ascending `order_index`.
    #[serde(default)]
    pub order_index: i64,

    /// Explicit number of judges expected to score this round. Overridden
    /// by an explicit judge assignment list when one exists.
    #[serde(default)]
    pub judge_target: Option<u32>,

    /// Per-gender cap on how many contestants appear in (and advance from)
    /// this round's standings.
    #[serde(default)]
    pub max_per_gender: Option<usize>,

    /// Per-gender advancement cap from admin configuration. The advancing
    /// pool itself is the participation-capped list; this value is carried
    /// through and sanity-checked against `max_per_gender`.
    #[serde(default)]
    pub advance_per_gender: Option<usize>,

    /// Per-gender count of top entries flagged for on-stage callouts.
    #[serde(default)]
    pub highlight_per_gender: Option<usize>,
}

/// An atomic point-scale item within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Upper bound of the point scale. Expected positive; a non-positive
    /// maximum zeroes the category normalization rather than failing.
    #[serde(default)]
    pub max_points: f64,
}

/// A judged dimension with a percentage weight, composed of criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Weight of this category within the 0-100 total.
    #[serde(default)]
    pub percentage: f64,

    /// Round this category is scored in. None means the category only
    /// contributes to overall standings.
    #[serde(default)]
    pub round_id: Option<String>,

    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// One judge's score for one criterion of one contestant. At most one row
/// per (contestant, criterion, judge) is expected from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default)]
    pub contestant_id: String,

    pub criterion_id: String,

    #[serde(default)]
    pub judge_id: String,

    /// Submitted value. Accepts a number, a numeric string, or null;
    /// anything malformed coerces to 0 at parse time.
    #[serde(default, deserialize_with = "permissive_points")]
    pub value: f64,
}

fn permissive_points<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Immutable input to one tabulation pass. Supplied fresh per invocation;
/// the engine keeps no state between calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub contestants: Vec<Contestant>,

    #[serde(default)]
    pub judges: Vec<Judge>,

    #[serde(default)]
    pub rounds: Vec<Round>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub scores: Vec<ScoreRecord>,

    /// Round id -> judge ids assigned to score that round.
    #[serde(default)]
    pub round_judges: BTreeMap<String, Vec<String>>,

    /// Category id -> judge ids allowed to score that category.
    #[serde(default)]
    pub category_judges: BTreeMap<String, Vec<String>>,
}
