//! Plain-text rendering of a card for the terminal.

use std::fmt::Write as _;

use crate::card::{resolve_icon, Card, CardAnalytics};

pub fn render_card(card: &Card) -> String {
    let mut out = String::new();
    let name_width = card
        .stats
        .keys()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "✨ {}", card.name);
    let _ = writeln!(out, "   {} · {}", card.category, card.rarity);
    let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (name, stat) in &card.stats {
        let icon = resolve_icon(stat.icon_hint.as_deref(), Some(name));
        let _ = writeln!(out, "  {} {name:<name_width$}  {}", icon.glyph(), stat.value);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", card.lore);
    let _ = writeln!(out);

    let analytics = CardAnalytics::from_card(card);
    let _ = writeln!(
        out,
        "Power {} · Avg {} · {} · Battle {}",
        analytics.total_power, analytics.stat_average, analytics.meme_tier, analytics.battle_rating
    );
    let _ = write!(
        out,
        "Rarity {} · Category bonus {}",
        analytics.rarity_multiplier, analytics.category_bonus
    );
    out
}
