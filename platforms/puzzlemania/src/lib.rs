//! Puzzle Mania campaign bot
//!
//! Multi-identity task automation for the 0G Puzzle Mania platform: per-wallet
//! SIWE login, campaign task discovery and verification, daily check-in, and a
//! perpetual round-robin cycle with per-attempt proxy rotation.

pub mod auth;
pub mod campaign;
pub mod client;
pub mod config;
pub mod identity;
pub mod report;
pub mod scheduler;
pub mod titles;

pub use auth::AuthSession;
pub use client::AttemptClient;
pub use config::PuzzleConfig;
pub use identity::Identity;
pub use scheduler::Scheduler;
