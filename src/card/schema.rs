use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Stat key reserved for the single free-text stat on every card.
pub const WEIRD_FLEX: &str = "Weird Flex";

/// Lowest and highest score the model is asked to produce.
pub const SCORE_RANGE: (f64, f64) = (1.0, 100.0);

/// Number of stats the model is asked to produce.
pub const EXPECTED_STAT_COUNT: usize = 4;

/// What the photo shows. Decides which tone the model is asked to write in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Human,
    Animal,
    Object,
    Food,
    Random,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Human,
        Category::Animal,
        Category::Object,
        Category::Food,
        Category::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Human => "Human",
            Category::Animal => "Animal",
            Category::Object => "Object",
            Category::Food => "Food",
            Category::Random => "Random",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Tone and voice the model is asked to use for this category.
    pub fn voice(&self) -> &'static str {
        match self {
            Category::Human => "Generate a funny nickname (MAX 4 WORDS). The 'Weird Flex' must be a unique, funny, and unexpected fact. The lore should be an over-the-top, two-sentence backstory.",
            Category::Animal => "Create a silly but heroic title (MAX 4 WORDS). The 'Weird Flex' must be a unique, funny, and unexpected fact. The lore should be a ridiculous, two-sentence evolutionary claim with meta-humor.",
            Category::Object => "Give an epic, meta-aware title to the mundane object (MAX 4 WORDS). The lore should be a mythic, two-sentence origin story referencing internet culture.",
            Category::Food => "Assign a dramatic, pop-culture-inspired battle name (MAX 4 WORDS). The lore should be a legendary, two-sentence tale about its consumption.",
            Category::Random => "The content must be abstract and reality-bending. The name should be a random, absurd phrase (MAX 4 WORDS), and the lore should be an unhinged statement about simulation theory or glitches.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card rarity, declared in ascending rank so the derived ordering is the
/// display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    /// Zero-based rank, Common = 0.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// The qualitative bar the model is asked to apply for this tier.
    pub fn rubric(&self) -> &'static str {
        match self {
            Rarity::Common => "Everyday objects, simple photos, generic selfies.",
            Rarity::Uncommon => "Interesting compositions, funny pet photos, unique food items.",
            Rarity::Rare => {
                "High-quality photography, very unusual situations or items, expressive portraits."
            }
            Rarity::Epic => {
                "Visually stunning images, perfectly timed photos, highly creative or bizarre concepts."
            }
            Rarity::Legendary => "Truly one-of-a-kind, iconic, or artistically exceptional images that are extremely rare to come across.",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stat value: a score, or free text for the reserved "Weird Flex" stat.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Score(f64),
    Text(String),
}

// Whole scores go back out as integers so a validated card re-serialises to
// the JSON it came from.
impl Serialize for StatValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            StatValue::Score(score) if is_whole(*score) => serializer.serialize_i64(*score as i64),
            StatValue::Score(score) => serializer.serialize_f64(*score),
            StatValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

fn is_whole(score: f64) -> bool {
    score.fract() == 0.0 && score.abs() < i64::MAX as f64
}

impl StatValue {
    pub fn as_score(&self) -> Option<f64> {
        match self {
            StatValue::Score(score) => Some(*score),
            StatValue::Text(_) => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Score(score) if is_whole(*score) => write!(f, "{}", *score as i64),
            StatValue::Score(score) => write!(f, "{score}"),
            StatValue::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub value: StatValue,
    #[serde(rename = "iconHint", skip_serializing_if = "Option::is_none")]
    pub icon_hint: Option<String>,
}

/// Accepts both the current `{value, iconHint}` shape and the bare values
/// that early saved cards used.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredStat {
    Full {
        value: StatValue,
        #[serde(rename = "iconHint", default)]
        icon_hint: Option<String>,
    },
    Bare(StatValue),
}

impl<'de> Deserialize<'de> for Stat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match StoredStat::deserialize(deserializer)? {
            StoredStat::Full { value, icon_hint } => Stat { value, icon_hint },
            StoredStat::Bare(value) => Stat {
                value,
                icon_hint: None,
            },
        })
    }
}

/// The structured result of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub category: Category,
    pub stats: IndexMap<String, Stat>,
    pub lore: String,
    pub rarity: Rarity,
}

impl Card {
    /// Load a card saved by an earlier session. Unlike [`validate`], this
    /// tolerates stats without icon hints.
    pub fn from_saved_json(json: &str) -> Result<Card, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Stats other than the reserved free-text one, in card order.
    pub fn scored_stats(&self) -> impl Iterator<Item = (&String, &Stat)> {
        self.stats.iter().filter(|(name, _)| name.as_str() != WEIRD_FLEX)
    }

    pub fn weird_flex(&self) -> Option<&Stat> {
        self.stats.get(WEIRD_FLEX)
    }

    /// Conventions the model was asked to follow but which validation does
    /// not enforce by default.
    pub fn convention_breaches(&self) -> Vec<String> {
        let mut breaches = Vec::new();
        if self.stats.len() != EXPECTED_STAT_COUNT {
            breaches.push(format!(
                "expected {EXPECTED_STAT_COUNT} stats, got {}",
                self.stats.len()
            ));
        }
        for (name, stat) in &self.stats {
            if let Some(score) = stat.value.as_score() {
                if !score_in_range(score) {
                    breaches.push(format!("stat '{name}' score {score} outside 1-100"));
                }
            }
        }
        breaches
    }
}

fn score_in_range(score: f64) -> bool {
    score >= SCORE_RANGE.0 && score <= SCORE_RANGE.1
}

/// Optional tightening of the default, deliberately lenient validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Reject cards that do not have exactly four stats.
    pub require_four_stats: bool,
    /// Reject scores outside 1-100.
    pub enforce_score_range: bool,
}

impl ValidationPolicy {
    pub fn strict() -> Self {
        Self {
            require_four_stats: true,
            enforce_score_range: true,
        }
    }
}

/// Parsed data that does not describe a card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    /// Dotted path to the offending field, `$` for the root.
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Validate model output with the default lenient policy.
pub fn validate(candidate: &Value) -> Result<Card, SchemaViolation> {
    validate_with(candidate, ValidationPolicy::default())
}

/// Validate model output: closed enums and stat shape are strict, stat count
/// and stat names are free unless `policy` says otherwise. Fields outside the
/// card shape are ignored.
pub fn validate_with(candidate: &Value, policy: ValidationPolicy) -> Result<Card, SchemaViolation> {
    let object = candidate
        .as_object()
        .ok_or_else(|| SchemaViolation::new("$", format!("expected object, got {}", kind(candidate))))?;

    let name = non_empty_string(object.get("name"), "name")?;
    let lore = non_empty_string(object.get("lore"), "lore")?;

    let category_raw = required_string(object.get("category"), "category")?;
    let category = Category::parse(category_raw).ok_or_else(|| {
        SchemaViolation::new(
            "category",
            format!("'{category_raw}' is not one of {}", join_names(Category::ALL.map(|c| c.as_str()))),
        )
    })?;

    let rarity_raw = required_string(object.get("rarity"), "rarity")?;
    let rarity = Rarity::parse(rarity_raw).ok_or_else(|| {
        SchemaViolation::new(
            "rarity",
            format!("'{rarity_raw}' is not one of {}", join_names(Rarity::ALL.map(|r| r.as_str()))),
        )
    })?;

    let stats_value = object
        .get("stats")
        .ok_or_else(|| SchemaViolation::new("stats", "missing required field"))?;
    let stats_object = stats_value.as_object().ok_or_else(|| {
        SchemaViolation::new("stats", format!("expected object, got {}", kind(stats_value)))
    })?;
    if stats_object.is_empty() {
        return Err(SchemaViolation::new("stats", "must contain at least one stat"));
    }
    if policy.require_four_stats && stats_object.len() != EXPECTED_STAT_COUNT {
        return Err(SchemaViolation::new(
            "stats",
            format!(
                "expected exactly {EXPECTED_STAT_COUNT} stats, got {}",
                stats_object.len()
            ),
        ));
    }

    let mut stats = IndexMap::with_capacity(stats_object.len());
    for (stat_name, raw) in stats_object {
        let stat = validate_stat(stat_name, raw, policy)?;
        stats.insert(stat_name.clone(), stat);
    }

    Ok(Card {
        name: name.to_string(),
        category,
        stats,
        lore: lore.to_string(),
        rarity,
    })
}

fn validate_stat(name: &str, raw: &Value, policy: ValidationPolicy) -> Result<Stat, SchemaViolation> {
    let path = format!("stats.{name}");
    let object = raw
        .as_object()
        .ok_or_else(|| SchemaViolation::new(&path, format!("expected object, got {}", kind(raw))))?;

    let value_path = format!("{path}.value");
    let value = match object.get("value") {
        Some(Value::Number(number)) => {
            let score = number.as_f64().ok_or_else(|| {
                SchemaViolation::new(&value_path, "number is not representable")
            })?;
            if policy.enforce_score_range && !score_in_range(score) {
                return Err(SchemaViolation::new(
                    &value_path,
                    format!("score {score} outside 1-100"),
                ));
            }
            StatValue::Score(score)
        }
        Some(Value::String(text)) if !text.trim().is_empty() => StatValue::Text(text.clone()),
        Some(Value::String(_)) => {
            return Err(SchemaViolation::new(&value_path, "text value must not be empty"))
        }
        Some(other) => {
            return Err(SchemaViolation::new(
                &value_path,
                format!("expected number or string, got {}", kind(other)),
            ))
        }
        None => return Err(SchemaViolation::new(&value_path, "missing required field")),
    };

    let hint_path = format!("{path}.iconHint");
    let icon_hint = required_string(object.get("iconHint"), &hint_path)?;

    Ok(Stat {
        value,
        icon_hint: Some(icon_hint.to_string()),
    })
}

fn required_string<'a>(value: Option<&'a Value>, path: &str) -> Result<&'a str, SchemaViolation> {
    match value {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(SchemaViolation::new(
            path,
            format!("expected string, got {}", kind(other)),
        )),
        None => Err(SchemaViolation::new(path, "missing required field")),
    }
}

fn non_empty_string<'a>(value: Option<&'a Value>, path: &str) -> Result<&'a str, SchemaViolation> {
    let text = required_string(value, path)?;
    if text.trim().is_empty() {
        return Err(SchemaViolation::new(path, "must not be empty"));
    }
    Ok(text)
}

fn join_names<const N: usize>(names: [&str; N]) -> String {
    names.join(", ")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
