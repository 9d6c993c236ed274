//! Logging facade.
//!
//! With the `tracing` feature enabled this re-exports the `tracing` macros the
//! render path uses, so `linebox-render` logs through `linebox_core` without
//! depending on `tracing` itself. Without the feature only the target name
//! remains and every render log call site is compiled out.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info_span, trace};

/// Target used by render-path spans and events.
pub const RENDER_TARGET: &str = "linebox::render";
