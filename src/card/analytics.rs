use crate::card::schema::{Card, Category, Rarity, StatValue};

/// Derived figures shown on a card's detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct CardAnalytics {
    pub total_power: i64,
    pub stat_average: i64,
    pub rarity_multiplier: &'static str,
    pub category_bonus: &'static str,
    pub meme_tier: &'static str,
    pub battle_rating: i64,
}

impl CardAnalytics {
    pub fn from_card(card: &Card) -> Self {
        let scores: Vec<f64> = card.scored_stats().map(|(_, stat)| numeric(&stat.value)).collect();
        let total: f64 = scores.iter().sum();
        let average = if scores.is_empty() {
            0
        } else {
            (total / scores.len() as f64).round() as i64
        };

        Self {
            total_power: total.round() as i64,
            stat_average: average,
            rarity_multiplier: rarity_multiplier(card.rarity),
            category_bonus: category_bonus(card.category),
            meme_tier: meme_tier(total),
            battle_rating: (total * battle_factor(card.rarity)).round() as i64,
        }
    }
}

/// Text values count for their leading integer, if any.
fn numeric(value: &StatValue) -> f64 {
    match value {
        StatValue::Score(score) => *score,
        StatValue::Text(text) => {
            let trimmed = text.trim_start();
            let end = trimmed
                .char_indices()
                .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());
            trimmed[..end].parse::<i64>().map(|n| n as f64).unwrap_or(0.0)
        }
    }
}

fn rarity_multiplier(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "1x",
        Rarity::Uncommon => "1.5x",
        Rarity::Rare => "2x",
        Rarity::Epic => "2.5x",
        Rarity::Legendary => "3x",
    }
}

fn battle_factor(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 1.0,
        Rarity::Uncommon => 1.1,
        Rarity::Rare => 1.2,
        Rarity::Epic => 1.3,
        Rarity::Legendary => 1.5,
    }
}

fn category_bonus(category: Category) -> &'static str {
    match category {
        Category::Human => "+15%",
        Category::Animal => "+10%",
        Category::Object => "+5%",
        Category::Food => "+20%",
        Category::Random => "+12%",
    }
}

fn meme_tier(total: f64) -> &'static str {
    if total > 80.0 {
        "S-Tier"
    } else if total > 60.0 {
        "A-Tier"
    } else if total > 40.0 {
        "B-Tier"
    } else if total > 20.0 {
        "C-Tier"
    } else {
        "D-Tier"
    }
}
