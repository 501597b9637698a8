use std::env;
use std::net::{IpAddr, SocketAddr};
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  Missing(&'static str),

  #[error("Invalid configuration for {var}: {reason}")]
  Invalid { var: &'static str, reason: String },
}

/// ---------------------------------------------------------------------------
/// Runtime Environment
/// ---------------------------------------------------------------------------

/// Development logs prompts and model output; production stays quiet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
  Development,
  Production,
}

impl AppEnv {
  fn parse(raw: &str) -> Option<Self> {
    match raw.trim().to_lowercase().as_str() {
      "development" | "dev" => Some(AppEnv::Development),
      "production" | "prod" => Some(AppEnv::Production),
      _ => None,
    }
  }

  pub fn is_development(&self) -> bool {
    *self == AppEnv::Development
  }
}

/// ---------------------------------------------------------------------------
/// Service Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
  pub openai_api_key: String,
  /// Shared secret callers present as `Authorization: Bearer <secret>`
  pub access_secret: String,
  pub model: String,
  /// Always ends with `/`
  pub api_base: Url,
  pub environment: AppEnv,
  pub bind_addr: SocketAddr,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    let openai_api_key = required("OPENAI_API_KEY")?;
    let access_secret = required("API_KEY")?;

    let model = optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let api_base = optional("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let api_base = parse_api_base(&api_base)?;

    let environment = match optional("APP_ENV") {
      Some(raw) => AppEnv::parse(&raw).ok_or_else(|| ConfigError::Invalid {
        var: "APP_ENV",
        reason: format!("expected development or production, got {}", raw),
      })?,
      None => AppEnv::Production,
    };

    let host = optional("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let host: IpAddr = host.parse().map_err(|e| ConfigError::Invalid {
      var: "HOST",
      reason: format!("{}: {}", host, e),
    })?;

    let port = match optional("PORT") {
      Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
        var: "PORT",
        reason: format!("{}: {}", raw, e),
      })?,
      None => DEFAULT_PORT,
    };

    Ok(Self {
      openai_api_key,
      access_secret,
      model,
      api_base,
      environment,
      bind_addr: SocketAddr::new(host, port),
    })
  }
}

/// Set and non-blank, trimmed
fn optional(var: &'static str) -> Option<String> {
  env::var(var)
    .ok()
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
  optional(var).ok_or(ConfigError::Missing(var))
}

fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
  let normalized = format!("{}/", raw.trim_end_matches('/'));
  let url = Url::parse(&normalized).map_err(|e| ConfigError::Invalid {
    var: "OPENAI_BASE_URL",
    reason: format!("{}: {}", raw, e),
  })?;

  if !matches!(url.scheme(), "http" | "https") {
    return Err(ConfigError::Invalid {
      var: "OPENAI_BASE_URL",
      reason: format!("unsupported scheme {}", url.scheme()),
    });
  }

  Ok(url)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 7] = [
    "OPENAI_API_KEY",
    "API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "APP_ENV",
    "HOST",
    "PORT",
  ];

  /// Run `f` with only the given variables set
  fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let mut pairs: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|k| (*k, None)).collect();
    for (k, v) in vars {
      if let Some(slot) = pairs.iter_mut().find(|(name, _)| name == k) {
        slot.1 = Some(*v);
      }
    }
    temp_env::with_vars(pairs, f)
  }

  #[test]
  #[serial]
  fn test_defaults() {
    let config = with_env(&[("OPENAI_API_KEY", "sk-test"), ("API_KEY", "secret")], Config::from_env)
      .unwrap();

    assert_eq!(config.openai_api_key, "sk-test");
    assert_eq!(config.access_secret, "secret");
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.api_base.as_str(), "https://api.openai.com/v1/");
    assert_eq!(config.environment, AppEnv::Production);
    assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
  }

  #[test]
  #[serial]
  fn test_overrides() {
    let config = with_env(
      &[
        ("OPENAI_API_KEY", "sk-test"),
        ("API_KEY", "secret"),
        ("OPENAI_MODEL", "gpt-4o-mini"),
        ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ("APP_ENV", "development"),
        ("HOST", "127.0.0.1"),
        ("PORT", "8787"),
      ],
      Config::from_env,
    )
    .unwrap();

    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.api_base.as_str(), "http://localhost:8080/v1/");
    assert!(config.environment.is_development());
    assert_eq!(config.bind_addr, "127.0.0.1:8787".parse().unwrap());
  }

  #[test]
  #[serial]
  fn test_missing_secret() {
    let err = with_env(&[("OPENAI_API_KEY", "sk-test"), ("API_KEY", "  ")], Config::from_env)
      .unwrap_err();

    assert!(matches!(err, ConfigError::Missing("API_KEY")));
  }

  #[test]
  #[serial]
  fn test_missing_api_key() {
    let err = with_env(&[("API_KEY", "secret")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
  }

  #[test]
  #[serial]
  fn test_invalid_values() {
    let base = [("OPENAI_API_KEY", "sk-test"), ("API_KEY", "secret")];

    let err = with_env(&[base[0], base[1], ("PORT", "eighty")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

    let err = with_env(&[base[0], base[1], ("APP_ENV", "staging")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "APP_ENV", .. }));

    let err = with_env(&[base[0], base[1], ("OPENAI_BASE_URL", "ftp://example.com")], Config::from_env)
      .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "OPENAI_BASE_URL", .. }));
  }

  #[test]
  fn test_app_env_aliases() {
    assert_eq!(AppEnv::parse("DEV"), Some(AppEnv::Development));
    assert_eq!(AppEnv::parse(" prod "), Some(AppEnv::Production));
    assert_eq!(AppEnv::parse("test"), None);
  }
}
