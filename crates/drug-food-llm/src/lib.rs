//! Generative narrative adapter for drug-food interactions.
//!
//! This crate wraps an external text-generation service (Gemini by default)
//! behind the [`NarrativeGenerator`] trait and exposes the two requests the
//! core makes of it: a free-text interaction narrative and a short summary of
//! official reference text. Generated text is untrusted and the service may be
//! unavailable; callers decide how to degrade.

pub mod adapter;
pub mod client;
pub mod prompts;

pub use adapter::*;
pub use client::*;
pub use prompts::*;
