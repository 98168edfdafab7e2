//! Domain models for drug-food interaction resolution.

mod interaction;
mod verdict;

pub use interaction::*;
pub use verdict::*;
