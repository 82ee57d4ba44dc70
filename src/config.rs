//! Configuration loader for the `riverguard` service.
//!
//! All runtime knobs are read once from environment variables (the caller
//! loads an optional `.env` first) into an immutable [`Config`]. Keeping the
//! `env::var` calls here means the rest of the crate only sees typed values.
use std::{env, time::Duration};

use anyhow::{anyhow, Result};

use crate::uploader::DEFAULT_MAX_IMAGES;
use crate::wizard::StepValidation;

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional boolean environment variable (`1|true|yes`, `0|false|no`).
macro_rules! parse_env_bool {
    ($var_name:expr, $default:expr) => {
        match env::var($var_name).ok().as_deref().map(str::trim) {
            None | Some("") => $default,
            Some(v) => parse_bool(v).ok_or_else(|| {
                anyhow!("Invalid {}: expected 1|true|yes or 0|false|no, got '{}'", $var_name, v)
            })?,
        }
    };
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Strongly typed application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Listen port; the server binds `0.0.0.0`.
    pub port: u16,

    /// Simulated latency of a report submission.
    pub report_submit_delay: Duration,

    /// Simulated latency of creating a discussion topic.
    pub topic_submit_delay: Duration,

    /// Simulated latency of posting a reply.
    pub reply_submit_delay: Duration,

    /// Simulated latency of the mock geocoder.
    pub geocode_delay: Duration,

    /// Cap on images per report.
    pub max_images: usize,

    /// Per-step wizard validation gates.
    pub wizard_validation: StepValidation,

    /// Nominatim-compatible search endpoint; the mock geocoder is used when unset.
    pub geocoder_url: Option<String>,

    /// Wizard drafts untouched for this long are dropped with their previews.
    pub draft_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        // ---
        Self {
            port: 8080,
            report_submit_delay: Duration::from_millis(1500),
            topic_submit_delay: Duration::from_millis(1500),
            reply_submit_delay: Duration::from_millis(1000),
            geocode_delay: Duration::from_millis(1000),
            max_images: DEFAULT_MAX_IMAGES,
            wizard_validation: StepValidation::default(),
            geocoder_url: None,
            draft_ttl: Duration::from_secs(3600),
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `PORT` – listen port (default: 8080)
/// - `REPORT_SUBMIT_DELAY_MS` – (default: 1500)
/// - `TOPIC_SUBMIT_DELAY_MS` – (default: 1500)
/// - `REPLY_SUBMIT_DELAY_MS` – (default: 1000)
/// - `GEOCODE_DELAY_MS` – (default: 1000)
/// - `MAX_IMAGES` – (default: 5)
/// - `WIZARD_VALIDATE_BASIC_INFO`, `WIZARD_VALIDATE_LOCATION`,
///   `WIZARD_VALIDATE_EVIDENCE` – (default: false)
/// - `GEOCODER_URL` – (default: unset)
/// - `DRAFT_TTL_SECS` – idle time before a draft is evicted (default: 3600)
///
/// Returns an error naming the variable if any value is invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let port = parse_env_u64!("PORT", u64::from(defaults.port));
    let port = u16::try_from(port).map_err(|_| anyhow!("Invalid PORT: {} is out of range", port))?;

    let max_images = parse_env_u64!("MAX_IMAGES", defaults.max_images as u64);
    if max_images == 0 {
        return Err(anyhow!("Invalid MAX_IMAGES: must be at least 1"));
    }

    let draft_ttl = parse_env_u64!("DRAFT_TTL_SECS", defaults.draft_ttl.as_secs());
    if draft_ttl == 0 {
        return Err(anyhow!("Invalid DRAFT_TTL_SECS: must be at least 1"));
    }

    let geocoder_url = env::var("GEOCODER_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(Config {
        port,
        report_submit_delay: Duration::from_millis(parse_env_u64!("REPORT_SUBMIT_DELAY_MS", 1500)),
        topic_submit_delay: Duration::from_millis(parse_env_u64!("TOPIC_SUBMIT_DELAY_MS", 1500)),
        reply_submit_delay: Duration::from_millis(parse_env_u64!("REPLY_SUBMIT_DELAY_MS", 1000)),
        geocode_delay: Duration::from_millis(parse_env_u64!("GEOCODE_DELAY_MS", 1000)),
        max_images: max_images as usize,
        wizard_validation: StepValidation {
            basic_info: parse_env_bool!("WIZARD_VALIDATE_BASIC_INFO", false),
            location: parse_env_bool!("WIZARD_VALIDATE_LOCATION", false),
            evidence: parse_env_bool!("WIZARD_VALIDATE_EVIDENCE", false),
        },
        geocoder_url,
        draft_ttl: Duration::from_secs(draft_ttl),
    })
}

impl Config {
    /// How often idle drafts are swept: a quarter of the TTL, at most a minute.
    pub fn draft_sweep_interval(&self) -> Duration {
        (self.draft_ttl / 4).clamp(Duration::from_millis(1), Duration::from_secs(60))
    }

    /// Log the loaded configuration.
    pub fn log_config(&self) {
        // ---
        let v = &self.wizard_validation;
        tracing::info!("Configuration loaded:");
        tracing::info!("  PORT                   : {}", self.port);
        tracing::info!("  REPORT_SUBMIT_DELAY_MS : {}", self.report_submit_delay.as_millis());
        tracing::info!("  TOPIC_SUBMIT_DELAY_MS  : {}", self.topic_submit_delay.as_millis());
        tracing::info!("  REPLY_SUBMIT_DELAY_MS  : {}", self.reply_submit_delay.as_millis());
        tracing::info!("  GEOCODE_DELAY_MS       : {}", self.geocode_delay.as_millis());
        tracing::info!("  MAX_IMAGES             : {}", self.max_images);
        tracing::info!(
            "  WIZARD_VALIDATE        : basic_info={} location={} evidence={}",
            v.basic_info,
            v.location,
            v.evidence
        );
        tracing::info!(
            "  GEOCODER_URL           : {}",
            self.geocoder_url.as_deref().unwrap_or("(mock)")
        );
        tracing::info!("  DRAFT_TTL_SECS         : {}", self.draft_ttl.as_secs());
    }
}

#[cfg(test)]
mod tests {
    // ---
    use std::sync::{Mutex, PoisonError};

    use super::*;

    #[test]
    fn test_parse_bool_spellings() {
        // ---
        for yes in ["1", "true", "YES", "True"] {
            assert_eq!(parse_bool(yes), Some(true));
        }
        for no in ["0", "false", "No"] {
            assert_eq!(parse_bool(no), Some(false));
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    /// Environment variables read by `load_from_env`.
    const VARS: [&str; 11] = [
        "PORT",
        "REPORT_SUBMIT_DELAY_MS",
        "TOPIC_SUBMIT_DELAY_MS",
        "REPLY_SUBMIT_DELAY_MS",
        "GEOCODE_DELAY_MS",
        "MAX_IMAGES",
        "WIZARD_VALIDATE_BASIC_INFO",
        "WIZARD_VALIDATE_LOCATION",
        "WIZARD_VALIDATE_EVIDENCE",
        "GEOCODER_URL",
        "DRAFT_TTL_SECS",
    ];

    /// The environment is process-global; tests touching it run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Run `load_from_env` with exactly `vars` set.
    fn load_with(vars: &[(&str, &str)]) -> Result<Config> {
        // ---
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        for name in VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }
        let loaded = load_from_env();
        for (name, _) in vars {
            env::remove_var(name);
        }
        loaded
    }

    fn load_err(vars: &[(&str, &str)]) -> String {
        load_with(vars).expect_err("config should be rejected").to_string()
    }

    #[test]
    fn test_load_without_overrides_matches_defaults() {
        // ---
        let cfg = load_with(&[]).expect("defaults load");
        let defaults = Config::default();
        assert_eq!(cfg.port, defaults.port);
        assert_eq!(cfg.max_images, defaults.max_images);
        assert_eq!(cfg.draft_ttl, defaults.draft_ttl);
        assert!(cfg.geocoder_url.is_none());
    }

    #[test]
    fn test_load_applies_overrides() {
        // ---
        let cfg = load_with(&[
            ("PORT", " 9090 "),
            ("REPORT_SUBMIT_DELAY_MS", "0"),
            ("MAX_IMAGES", "3"),
            ("WIZARD_VALIDATE_LOCATION", "yes"),
            ("WIZARD_VALIDATE_EVIDENCE", "0"),
            ("GEOCODER_URL", " https://nominatim.example/search "),
            ("DRAFT_TTL_SECS", "120"),
        ])
        .expect("overrides load");

        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.report_submit_delay, Duration::ZERO);
        assert_eq!(cfg.topic_submit_delay, Duration::from_millis(1500));
        assert_eq!(cfg.max_images, 3);
        assert_eq!(
            cfg.wizard_validation,
            StepValidation {
                basic_info: false,
                location: true,
                evidence: false,
            }
        );
        assert_eq!(cfg.geocoder_url.as_deref(), Some("https://nominatim.example/search"));
        assert_eq!(cfg.draft_ttl, Duration::from_secs(120));
    }

    #[test]
    fn test_blank_geocoder_url_means_mock() {
        // ---
        let cfg = load_with(&[("GEOCODER_URL", "   ")]).expect("blank url loads");
        assert!(cfg.geocoder_url.is_none());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        // ---
        let err = load_err(&[("PORT", "abc")]);
        assert!(err.starts_with("Invalid PORT"), "{err}");

        let err = load_err(&[("PORT", "70000")]);
        assert_eq!(err, "Invalid PORT: 70000 is out of range");

        let err = load_err(&[("PORT", "-1")]);
        assert!(err.starts_with("Invalid PORT"), "{err}");
    }

    #[test]
    fn test_zero_max_images_is_rejected() {
        // ---
        let err = load_err(&[("MAX_IMAGES", "0")]);
        assert_eq!(err, "Invalid MAX_IMAGES: must be at least 1");
    }

    #[test]
    fn test_zero_draft_ttl_is_rejected() {
        // ---
        let err = load_err(&[("DRAFT_TTL_SECS", "0")]);
        assert_eq!(err, "Invalid DRAFT_TTL_SECS: must be at least 1");
    }

    #[test]
    fn test_bad_delay_names_variable() {
        // ---
        let err = load_err(&[("GEOCODE_DELAY_MS", "1.5s")]);
        assert!(err.starts_with("Invalid GEOCODE_DELAY_MS"), "{err}");
    }

    #[test]
    fn test_bad_bool_is_rejected() {
        // ---
        let err = load_err(&[("WIZARD_VALIDATE_LOCATION", "maybe")]);
        assert_eq!(
            err,
            "Invalid WIZARD_VALIDATE_LOCATION: expected 1|true|yes or 0|false|no, got 'maybe'"
        );
    }

    #[test]
    fn test_sweep_interval_tracks_ttl() {
        // ---
        let mut cfg = Config::default();
        assert_eq!(cfg.draft_sweep_interval(), Duration::from_secs(60));
        cfg.draft_ttl = Duration::from_secs(20);
        assert_eq!(cfg.draft_sweep_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_defaults() {
        // ---
        let cfg = Config::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.report_submit_delay, Duration::from_millis(1500));
        assert_eq!(cfg.reply_submit_delay, Duration::from_millis(1000));
        assert_eq!(cfg.max_images, 5);
        assert_eq!(cfg.wizard_validation, StepValidation::default());
        assert!(cfg.geocoder_url.is_none());
    }
}
