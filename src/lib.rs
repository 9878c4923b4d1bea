//! Promptsmith - Conversational Prompt Engineering Assistant
//!
//! This crate turns a rough, free-text request into a high-quality
//! instruction prompt by matching the request against a catalog of
//! prompt-engineering frameworks, running a bounded clarification
//! dialogue, and composing the final prompt from the chosen framework's
//! template.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
