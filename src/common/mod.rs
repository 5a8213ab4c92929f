//! Common types, traits, clocks, and error definitions
//!
//! This module provides the foundational building blocks shared by the
//! message types and the crank driving planner.

pub mod types;
pub mod traits;
pub mod error;
pub mod clock;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use clock::*;
