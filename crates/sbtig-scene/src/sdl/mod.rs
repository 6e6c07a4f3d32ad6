//! Text scene description consumed by the external ray tracer.
//!
//! [`emit`] writes it and [`parse`] reads it back into the same structure.
//! Formatting is not part of the contract; structure and numbers are.

mod emit;
mod parse;

pub use emit::{ROOT_NAME, emit};
pub use parse::parse;
