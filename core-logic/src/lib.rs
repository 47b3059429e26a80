//! # Core Logic - Shared Utilities for the Campaign Automation Workspace
//!
//! This crate provides shared utilities used across platform bot
//! implementations: error taxonomy, rate-limit-aware retry, proxy descriptor
//! parsing, injectable time and input sources, and dual-layer logging.
//!
//! ## Modules
//!
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions (clock and input seams)
//! - [`utils`] - Utility modules (retry, proxy, clock, input, display, logger)

// Module declarations - internal modules marked pub(crate)
pub mod error;
pub mod traits;
pub(crate) mod utils;

// Selective exports - only public API types
pub use error::{AuthError, CampaignError, ConfigError, CoreError, NetworkError};
pub use traits::{Clock, InputSource};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    parse_pool, setup_logger, FileSource, ManualClock, PromptSource, ProxyDescriptor, ProxyKind,
    StaticSource, SystemClock,
};

// Export display and retry helpers
pub use utils::display::{format_countdown, short_address};
pub use utils::retry::{is_rate_limited, with_rate_limit_retry, RetryConfig};
