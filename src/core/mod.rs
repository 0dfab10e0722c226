//! Core domain models
//!
//! Steps, the operator's answers, the shared run context, settings and
//! execution state.

pub mod answers;
pub mod config;
pub mod context;
pub mod state;
pub mod step;

pub use answers::*;
pub use config::ScaffoldSettings;
pub use context::*;
pub use state::*;
pub use step::*;
