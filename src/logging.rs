//! Tracing subscriber setup
//!
//! `RUST_LOG` always wins. Without it, development logs this crate at debug
//! (prompts and raw model replies included) and production only reports
//! errors.

use crate::config::AppEnv;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

fn default_directive(environment: AppEnv) -> &'static str {
  match environment {
    AppEnv::Development => "info,daily_workout_lib=debug,daily_workout=debug,tower_http=debug",
    AppEnv::Production => "error",
  }
}

fn filter_for(environment: AppEnv) -> EnvFilter {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(environment)));

  // HTTP client internals are noisy at debug
  ["hyper=warn", "reqwest=warn"]
    .into_iter()
    .filter_map(|d| d.parse::<Directive>().ok())
    .fold(filter, |f, directive| f.add_directive(directive))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(environment: AppEnv) {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter_for(environment))
    .with_target(environment.is_development())
    .try_init();
}
