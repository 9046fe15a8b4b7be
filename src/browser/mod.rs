//! Headless browser management
//!
//! A [`BrowserSession`] owns one Chrome process for the lifetime of a single
//! rendered fetch. Dropping the session kills the process.

pub mod config;
pub mod session;

pub use config::{DEFAULT_USER_AGENT, LaunchOptions};
pub use session::BrowserSession;
