//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

// Internal modules - not part of public API
pub(crate) mod clock;
pub(crate) mod display;
pub(crate) mod input;
pub(crate) mod logger;
pub(crate) mod proxy;
pub(crate) mod retry;

// Selective exports - only public utilities
pub use clock::{ManualClock, SystemClock};
pub use input::{FileSource, PromptSource, StaticSource};
pub use logger::setup_logger;
pub use proxy::{parse_pool, ProxyDescriptor, ProxyKind};
