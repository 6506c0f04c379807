//! Instructions sent to the vision model.
//!
//! The card prompt is assembled from the same enums the validator checks, so
//! adding a category, rarity or icon hint changes both sides together.

use crate::card::icon::PROMPT_HINT_VOCABULARY;
use crate::card::schema::{Card, Category, Rarity, EXPECTED_STAT_COUNT, WEIRD_FLEX};

const CARD_PREAMBLE: &str = "You are an expert at analyzing images to create funny, engaging, and creative stats and lore for a card game.";

const CARD_SHAPE_EXAMPLE: &str = r#"{
  "category": "one of: Human, Animal, Object, Food, Random",
  "name": "the card name (MAX 4 WORDS!)",
  "lore": "the card lore",
  "rarity": "one of: Common, Uncommon, Rare, Epic, Legendary",
  "stats": {
    "Physical Strength": {
      "value": 75,
      "iconHint": "muscle"
    },
    "Battle Experience": {
      "value": 92,
      "iconHint": "sword"
    },
    "Social Charisma": {
      "value": 68,
      "iconHint": "smile"
    },
    "Weird Flex": {
      "value": "Can solve a Rubik's cube blindfolded",
      "iconHint": "gamepad"
    }
  }
}"#;

/// Build the card-generation instruction that accompanies the photo.
pub fn build_card_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("'{}'", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::with_capacity(4096);
    prompt.push_str(CARD_PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(&format!(
        "Analyze the provided image and determine its category from the following options: {categories}.\n\n"
    ));
    prompt.push_str(
        "Then, based on the category and a deep analysis of the visual details in the image (like clothing, expression, environment, species, pose, ingredients, etc.), generate the required content. Your output MUST be directly inspired by the visual information and avoid generic clichés at all costs.\n\n",
    );
    prompt.push_str(
        "IMPORTANT: Keep names SHORT! Maximum 4 words (like \"Sir Floofington the First\" or \"Captain Thunder Cat\"). Long names break the card layout.\n\n",
    );

    prompt.push_str("You must output ONLY a valid JSON object with this exact structure:\n");
    prompt.push_str(CARD_SHAPE_EXAMPLE);
    prompt.push_str("\n\n");

    prompt.push_str("CRITICAL RULES:\n");
    prompt.push_str(&format!(
        "- ALL stats except \"{WEIRD_FLEX}\" must have NUMBER values (1-100)\n"
    ));
    prompt.push_str(&format!(
        "- \"{WEIRD_FLEX}\" is the only stat with a TEXT value: a short, funny description\n"
    ));
    prompt.push_str("- EVERY stat must have an iconHint from the list below\n");
    prompt.push_str(&format!(
        "- Generate exactly {EXPECTED_STAT_COUNT} stats total (including {WEIRD_FLEX})\n"
    ));
    prompt.push_str("- Keep stat names creative but clear\n\n");

    prompt.push_str(&format!(
        "ICON HINTS - choose each iconHint from: {}. If nothing fits, use \"default\".\n\n",
        PROMPT_HINT_VOCABULARY.join(", ")
    ));

    prompt.push_str("CATEGORY VOICE:\n");
    for category in Category::ALL {
        prompt.push_str(&format!("- For '{}': {}\n", category.as_str(), category.voice()));
    }
    prompt.push('\n');

    prompt.push_str(
        "Finally, assign a rarity to the card based on the visual characteristics of the image. Be consistent for similar types of images.\n",
    );
    for rarity in Rarity::ALL {
        prompt.push_str(&format!("- {}: {}\n", rarity.as_str(), rarity.rubric()));
    }
    prompt.push_str(
        "Base your decision on factors like image quality, composition, subject matter uniqueness, and emotional impact.\n\n",
    );

    prompt.push_str("Return ONLY the JSON object, no additional text or formatting.");
    prompt
}

/// Build the storyteller instruction used to rewrite a card's lore.
pub fn build_lore_prompt(card: &Card, theme: &str) -> String {
    let stats = card
        .stats
        .iter()
        .map(|(name, stat)| format!("{name}: {}", stat.value))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a creative storyteller who crafts engaging lore descriptions for trading cards.

Based on the subject, stats, and theme provided, generate a lore description that enhances the card's narrative. Write at least two sentences of plain prose with no headings or formatting.

Subject: {subject}
Stats: {stats}
Theme: {theme}

Lore Description:"#,
        subject = card.name,
    )
}
