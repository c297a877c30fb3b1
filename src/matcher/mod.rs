//! Word matching against candidate addresses.
//!
//! Two matching strategies share one offset-window scan:
//! - Dictionary: every word from an indexed word list
//! - Literal: a single fixed word

mod index;
mod mode;

pub use index::{IndexError, WordIndex};
pub use mode::SearchMode;
