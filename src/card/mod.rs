pub mod analytics;
pub mod icon;
pub mod prompt;
pub mod response;
pub mod schema;

pub use analytics::CardAnalytics;
pub use icon::{resolve_icon, IconCategory};
pub use schema::{
    validate, validate_with, Card, Category, Rarity, SchemaViolation, Stat, StatValue,
    ValidationPolicy, WEIRD_FLEX,
};
