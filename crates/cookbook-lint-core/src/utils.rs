//! Utility functions for rule implementations.

pub mod allowance;
pub mod text;

#[doc(inline)]
pub use allowance::{AllowCheck, AllowIndex};
#[doc(inline)]
pub use text::range_with_space_to_left;
