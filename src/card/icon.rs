//! Stat icon resolution
//!
//! Every stat on a card is drawn with one icon. The model is asked to pick an
//! `iconHint` from a fixed vocabulary, but hints go missing or come back
//! misspelled, and saved cards from before hints existed carry none at all.
//! [`resolve_icon`] therefore never fails: it tries the hint, then a table of
//! stat names that shipped with the first card templates, then keyword
//! inference on the stat name, and finally settles on [`IconCategory::Default`].

use serde::{Deserialize, Serialize};

/// Semantic icon categories a stat can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    // Elements and nature
    Fire,
    Ice,
    Lightning,
    Water,
    Earth,
    Air,
    Sun,
    Moon,
    Leaf,
    Mountain,
    Snow,
    // Emotions
    Heart,
    Smile,
    Sleep,
    Eye,
    // Combat and power
    Sword,
    Shield,
    Magic,
    Bomb,
    Skull,
    Muscle,
    Fist,
    Hands,
    // Tech
    Rocket,
    Camera,
    Gamepad,
    Cog,
    // Rare things
    Star,
    Gem,
    Feather,
    // Food
    Pizza,
    Coffee,
    Utensils,
    Spice,
    Hamburger,
    // Animals
    Cat,
    Dog,
    Fish,
    Spider,
    // Arts
    Music,
    Film,
    Palette,
    // Physical
    Speed,
    Flex,
    Default,
}

/// Hints the model is told to choose from. Order is the order they appear
/// in the generation prompt.
pub const PROMPT_HINT_VOCABULARY: &[&str] = &[
    "fire", "ice", "lightning", "heart", "star", "shield", "sword", "magic", "gem", "skull",
    "rocket", "camera", "gamepad", "music", "pizza", "coffee", "muscle", "smile", "sleep",
    "spice", "bomb", "eye", "feather", "cog", "sun", "moon", "leaf", "water", "mountain", "fish",
    "cat", "dog", "utensils",
];

/// Stat names used by the original fixed card templates, kept so that cards
/// saved before icon hints existed still render with their familiar icons.
const LEGACY_STAT_ICONS: &[(&str, IconCategory)] = &[
    // Human
    ("Coolness", IconCategory::Spice),
    ("Snack Resistance", IconCategory::Pizza),
    ("Weird Flex", IconCategory::Flex),
    ("Boss Fight Potential", IconCategory::Sword),
    // Animal
    ("Cuteness Overload", IconCategory::Heart),
    ("Chaos Energy", IconCategory::Lightning),
    ("Nap Power", IconCategory::Sleep),
    ("Snack Acquisition Skill", IconCategory::Hamburger),
    // Object
    ("Durability", IconCategory::Shield),
    ("Vibe Strength", IconCategory::Magic),
    ("Danger to Humanity", IconCategory::Bomb),
    ("Secret Powers", IconCategory::Gem),
    // Food
    ("Flavor Explosion", IconCategory::Fire),
    ("Grease Factor", IconCategory::Coffee),
    ("Resistance to Sharing", IconCategory::Hands),
    ("Post-Meal Regret", IconCategory::Skull),
    // Random
    ("Absurdity Level", IconCategory::Eye),
    ("Meme Potential", IconCategory::Camera),
    ("Viral Energy", IconCategory::Rocket),
    ("Reality-Breaking Power", IconCategory::Cog),
];

/// Keyword buckets checked against the lower-cased stat name. The first bucket
/// with any matching substring wins, so order matters: "power" must hit the
/// muscle bucket before "Viral Energy"-style names reach lightning.
const KEYWORD_BUCKETS: &[(&[&str], IconCategory)] = &[
    (&["strength", "power", "muscle"], IconCategory::Muscle),
    (&["speed", "fast", "quick", "agility"], IconCategory::Speed),
    (
        &["defense", "shield", "armor", "protection"],
        IconCategory::Shield,
    ),
    (&["health", "life", "vitality", "hp"], IconCategory::Heart),
    (
        &["intelligence", "smart", "wisdom", "brain"],
        IconCategory::Cog,
    ),
    (&["magic", "mystical", "spell", "mana"], IconCategory::Magic),
    (&["luck", "fortune", "chance"], IconCategory::Star),
    (&["charisma", "charm", "social", "appeal"], IconCategory::Smile),
    (&["energy", "stamina", "endurance"], IconCategory::Lightning),
    (&["food", "eat", "hunger", "taste"], IconCategory::Utensils),
    (&["cool", "style", "swag", "vibe"], IconCategory::Spice),
    (&["cute", "adorable", "sweet"], IconCategory::Heart),
    (&["danger", "scary", "threat", "fear"], IconCategory::Skull),
    (&["weird", "strange", "odd", "flex"], IconCategory::Flex),
];

impl IconCategory {
    /// Parse a hint case-insensitively, accepting the aliases the model is
    /// known to produce ("bolt", "gear", "diamond", ...).
    pub fn from_hint(hint: &str) -> Option<Self> {
        let category = match hint.trim().to_lowercase().as_str() {
            "fire" => Self::Fire,
            "ice" => Self::Ice,
            "lightning" => Self::Lightning,
            "water" => Self::Water,
            "earth" => Self::Earth,
            "air" => Self::Air,
            "sun" => Self::Sun,
            "moon" => Self::Moon,
            "leaf" => Self::Leaf,
            "mountain" => Self::Mountain,
            "snow" => Self::Snow,
            "heart" => Self::Heart,
            "smile" => Self::Smile,
            "sleep" => Self::Sleep,
            "eye" => Self::Eye,
            "sword" => Self::Sword,
            "shield" => Self::Shield,
            "magic" => Self::Magic,
            "bomb" => Self::Bomb,
            "skull" => Self::Skull,
            "muscle" => Self::Muscle,
            "fist" => Self::Fist,
            "rocket" => Self::Rocket,
            "camera" => Self::Camera,
            "gamepad" => Self::Gamepad,
            "cog" | "gear" => Self::Cog,
            "star" => Self::Star,
            "gem" | "diamond" | "crystal" => Self::Gem,
            "feather" => Self::Feather,
            "pizza" => Self::Pizza,
            "coffee" | "drink" => Self::Coffee,
            "utensils" | "food" => Self::Utensils,
            "spice" => Self::Spice,
            "hamburger" => Self::Hamburger,
            "cat" => Self::Cat,
            "dog" => Self::Dog,
            "fish" => Self::Fish,
            "spider" => Self::Spider,
            "music" => Self::Music,
            "film" => Self::Film,
            "palette" | "art" => Self::Palette,
            "speed" | "bolt" => Self::Speed,
            "flex" => Self::Flex,
            "default" => Self::Default,
            _ => return None,
        };
        Some(category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Ice => "ice",
            Self::Lightning => "lightning",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Leaf => "leaf",
            Self::Mountain => "mountain",
            Self::Snow => "snow",
            Self::Heart => "heart",
            Self::Smile => "smile",
            Self::Sleep => "sleep",
            Self::Eye => "eye",
            Self::Sword => "sword",
            Self::Shield => "shield",
            Self::Magic => "magic",
            Self::Bomb => "bomb",
            Self::Skull => "skull",
            Self::Muscle => "muscle",
            Self::Fist => "fist",
            Self::Hands => "hands",
            Self::Rocket => "rocket",
            Self::Camera => "camera",
            Self::Gamepad => "gamepad",
            Self::Cog => "cog",
            Self::Star => "star",
            Self::Gem => "gem",
            Self::Feather => "feather",
            Self::Pizza => "pizza",
            Self::Coffee => "coffee",
            Self::Utensils => "utensils",
            Self::Spice => "spice",
            Self::Hamburger => "hamburger",
            Self::Cat => "cat",
            Self::Dog => "dog",
            Self::Fish => "fish",
            Self::Spider => "spider",
            Self::Music => "music",
            Self::Film => "film",
            Self::Palette => "palette",
            Self::Speed => "speed",
            Self::Flex => "flex",
            Self::Default => "default",
        }
    }

    /// Terminal glyph for the category.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Fire => "🔥",
            Self::Ice => "🧊",
            Self::Lightning => "🌩️",
            Self::Water => "💧",
            Self::Earth => "🌎",
            Self::Air => "🌬️",
            Self::Sun => "☀️",
            Self::Moon => "🌙",
            Self::Leaf => "🍃",
            Self::Mountain => "⛰️",
            Self::Snow => "❄️",
            Self::Heart => "❤️",
            Self::Smile => "😄",
            Self::Sleep => "🛏️",
            Self::Eye => "👁️",
            Self::Sword => "⚔️",
            Self::Shield => "🛡️",
            Self::Magic => "🪄",
            Self::Bomb => "💣",
            Self::Skull => "💀",
            Self::Muscle => "💪",
            Self::Fist => "👊",
            Self::Hands => "🙌",
            Self::Rocket => "🚀",
            Self::Camera => "📷",
            Self::Gamepad => "🎮",
            Self::Cog => "⚙️",
            Self::Star => "⭐",
            Self::Gem => "💎",
            Self::Feather => "🪶",
            Self::Pizza => "🍕",
            Self::Coffee => "☕",
            Self::Utensils => "🍴",
            Self::Spice => "🌶️",
            Self::Hamburger => "🍔",
            Self::Cat => "🐱",
            Self::Dog => "🐶",
            Self::Fish => "🐟",
            Self::Spider => "🕷️",
            Self::Music => "🎵",
            Self::Film => "🎬",
            Self::Palette => "🎨",
            Self::Speed => "⚡",
            Self::Flex => "🤳",
            Self::Default => "❔",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the icon for a stat.
///
/// An explicit, recognised hint always wins. A hint of `"default"` counts as
/// no hint so the stat name still gets a chance to pick something better.
pub fn resolve_icon(hint: Option<&str>, stat_name: Option<&str>) -> IconCategory {
    if let Some(category) = hint.and_then(IconCategory::from_hint) {
        if category != IconCategory::Default {
            return category;
        }
    }

    let Some(stat_name) = stat_name else {
        return IconCategory::Default;
    };

    if let Some(category) = legacy_icon(stat_name) {
        return category;
    }

    infer_from_name(stat_name).unwrap_or(IconCategory::Default)
}

fn legacy_icon(stat_name: &str) -> Option<IconCategory> {
    LEGACY_STAT_ICONS
        .iter()
        .find(|(name, _)| *name == stat_name)
        .map(|(_, category)| *category)
}

fn infer_from_name(stat_name: &str) -> Option<IconCategory> {
    let lower = stat_name.to_lowercase();
    KEYWORD_BUCKETS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(_, category)| *category)
}
