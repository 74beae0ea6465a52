#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod animation;
pub mod config;
pub mod dedup;
pub mod dom;
pub mod engine;
pub mod error;
pub mod progress;
pub mod registry;
pub mod scheduler;
pub mod telemetry;
pub mod toast;
pub mod types;

pub use config::{Callback, Config, EffectiveOptions, Options, OptionsOverride};
pub use engine::{NotificationRequest, Toaster};
pub use toast::Phase;
pub use types::Severity;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type Result<T> = std::result::Result<T, error::Error>;
