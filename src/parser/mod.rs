//! Instruction file parsing
//!
//! This module turns the textual instruction format consumed by the
//! host driver into typed programs:
//!
//! - [`program`] - `<D><N>` records, one instruction per line

pub mod program;

pub use program::{Instruction, ParseError, Program};
