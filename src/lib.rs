//! ticketsmith library crate
//!
//! Core pipeline for AI-assisted support-ticket replies: classify extracted
//! ticket content, assemble a structured prompt, and fetch a completion from
//! an OpenAI-compatible endpoint with a single endpoint-shape fallback.

pub mod actions;
pub mod api;
pub mod categorize;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod ticket;
pub mod util;
