pub mod app_state;
pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub mod test_utils;

pub use app_state::AppState;
pub use config::Config;
pub use errors::{AttemptError, AttemptResult};
pub use services::attempt_session::AttemptSession;

/// Installs the `env_logger` backend for the `log` macros used throughout the
/// crate. `RUST_LOG` overrides the default `info` filter. Calling it more than
/// once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
