//! Verification backend configuration.
//!
//! Defaults reproduce the portal's simulated round trips. Override via
//! environment variables or explicit construction for tests.

use std::time::Duration;

use udyam_core::Otp;

/// Latency of OTP dispatch, OTP confirmation and PAN validation.
pub const DEFAULT_VERIFY_LATENCY_MS: u64 = 2000;
/// Latency of the final submission.
pub const DEFAULT_SUBMIT_LATENCY_MS: u64 = 3000;
/// The only code the simulated OTP service accepts.
pub const DEFAULT_REFERENCE_OTP: &str = "123456";

/// Configuration of the simulated verification backend.
///
/// Custom `Debug` implementation redacts the reference OTP.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    pub verify_latency: Duration,
    pub submit_latency: Duration,
    pub reference_otp: String,
}

impl std::fmt::Debug for VerifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyConfig")
            .field("verify_latency", &self.verify_latency)
            .field("submit_latency", &self.submit_latency)
            .field("reference_otp", &"[REDACTED]")
            .finish()
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            verify_latency: Duration::from_millis(DEFAULT_VERIFY_LATENCY_MS),
            submit_latency: Duration::from_millis(DEFAULT_SUBMIT_LATENCY_MS),
            reference_otp: DEFAULT_REFERENCE_OTP.to_string(),
        }
    }
}

impl VerifyConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `UDYAM_VERIFY_LATENCY_MS` (default: 2000)
    /// - `UDYAM_SUBMIT_LATENCY_MS` (default: 3000)
    /// - `UDYAM_REFERENCE_OTP` (default: `123456`, must be 6 digits)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let reference_otp = match lookup("UDYAM_REFERENCE_OTP") {
            Some(raw) => Otp::new(raw.trim())
                .map_err(|_| ConfigError::InvalidOtp("UDYAM_REFERENCE_OTP".to_string()))?
                .as_str()
                .to_string(),
            None => DEFAULT_REFERENCE_OTP.to_string(),
        };
        Ok(Self {
            verify_latency: env_millis(&lookup, "UDYAM_VERIFY_LATENCY_MS", DEFAULT_VERIFY_LATENCY_MS)?,
            submit_latency: env_millis(&lookup, "UDYAM_SUBMIT_LATENCY_MS", DEFAULT_SUBMIT_LATENCY_MS)?,
            reference_otp,
        })
    }

    /// Zero latency, default reference code.
    pub fn instant() -> Self {
        Self {
            verify_latency: Duration::ZERO,
            submit_latency: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Same latency for every operation, submission included.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.verify_latency = latency;
        self.submit_latency = latency;
        self
    }
}

fn env_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidLatency(var.to_string(), e.to_string())),
        None => Ok(Duration::from_millis(default)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid latency for {0}: {1}")]
    InvalidLatency(String, String),
    #[error("{0} must be a 6-digit code")]
    InvalidOtp(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = VerifyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, VerifyConfig::default());
        assert_eq!(cfg.verify_latency, Duration::from_millis(2000));
        assert_eq!(cfg.submit_latency, Duration::from_millis(3000));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = VerifyConfig::from_lookup(lookup(&[
            ("UDYAM_VERIFY_LATENCY_MS", "15"),
            ("UDYAM_SUBMIT_LATENCY_MS", " 20 "),
            ("UDYAM_REFERENCE_OTP", "000111"),
        ]))
        .unwrap();
        assert_eq!(cfg.verify_latency, Duration::from_millis(15));
        assert_eq!(cfg.submit_latency, Duration::from_millis(20));
        assert_eq!(cfg.reference_otp, "000111");
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = VerifyConfig::from_lookup(lookup(&[("UDYAM_VERIFY_LATENCY_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("UDYAM_VERIFY_LATENCY_MS"));
        let err = VerifyConfig::from_lookup(lookup(&[("UDYAM_REFERENCE_OTP", "12ab56")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOtp(_)));
    }

    #[test]
    fn debug_redacts_reference_code() {
        let rendered = format!("{:?}", VerifyConfig::default());
        assert!(!rendered.contains("123456"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn instant_has_no_latency() {
        let cfg = VerifyConfig::instant();
        assert_eq!(cfg.verify_latency, Duration::ZERO);
        assert_eq!(cfg.reference_otp, DEFAULT_REFERENCE_OTP);
        let slow = cfg.with_latency(Duration::from_millis(5));
        assert_eq!(slow.submit_latency, Duration::from_millis(5));
    }
}
