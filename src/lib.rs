//! A runtime for hosts whose scope lifecycles are observable events.
//!

pub use atrium_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use atrium_internal::prelude::*;
}
