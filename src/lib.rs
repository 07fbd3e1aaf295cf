//! Headless typing-session core. The terminal front end lives in the binary.

pub mod app_dirs;
pub mod config;
pub mod key;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod story;
pub mod time_series;

pub use key::{Key, Modifier};
pub use scoring::Outcome;
pub use session::{Mode, Session, Snapshot, Status, StatusChange};
