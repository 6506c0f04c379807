//! Mythicard turns photos into trading cards using a generative vision model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`card`] owns the card data contract: the schema and its validator, the
//!   icon resolver, prompt construction, model-response repair, and derived
//!   analytics.
//! - [`core`] runs the generation pipeline against a [`core::vision::VisionModel`],
//!   checks credentials, and loads configuration.
//! - [`api`] defines the wire payloads of the Generative Language API.
//! - [`utils`] holds URL and logging helpers.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod card;
pub mod cli;
pub mod core;
pub mod utils;
