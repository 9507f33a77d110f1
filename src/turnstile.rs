//! Cloudflare Turnstile token verification.

use serde::Deserialize;
use thiserror::Error;

use crate::config::TurnstileConfig;

#[derive(Debug, Error)]
pub enum TurnstileError {
    #[error("Turnstile secret key is not configured")]
    NotConfigured,

    #[error("Human verification failed: {0}")]
    Failed(String),

    #[error("Turnstile request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Check a widget token with `siteverify`; `Ok(())` means a human solved it
pub async fn verify_token(
    http: &reqwest::Client,
    config: &TurnstileConfig,
    token: &str,
    remote_ip: Option<&str>,
) -> Result<(), TurnstileError> {
    if config.secret_key.is_empty() {
        return Err(TurnstileError::NotConfigured);
    }

    let mut form = vec![("secret", config.secret_key.as_str()), ("response", token)];
    if let Some(ip) = remote_ip {
        form.push(("remoteip", ip));
    }

    let outcome: SiteverifyResponse = http
        .post(&config.verify_url)
        .form(&form)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    check_outcome(outcome)
}

fn check_outcome(outcome: SiteverifyResponse) -> Result<(), TurnstileError> {
    if outcome.success {
        return Ok(());
    }

    let reason = if outcome.error_codes.is_empty() {
        "unknown error".to_string()
    } else {
        outcome.error_codes.join(", ")
    };
    Err(TurnstileError::Failed(reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_lists_error_codes() {
        let outcome: SiteverifyResponse = serde_json::from_value(serde_json::json!({
            "success": false,
            "error-codes": ["invalid-input-response", "timeout-or-duplicate"]
        }))
        .unwrap();

        match check_outcome(outcome) {
            Err(TurnstileError::Failed(reason)) => {
                assert_eq!(reason, "invalid-input-response, timeout-or-duplicate")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn successful_outcome_passes() {
        let outcome: SiteverifyResponse = serde_json::from_value(serde_json::json!({ "success": true })).unwrap();
        assert!(check_outcome(outcome).is_ok());
    }

    #[tokio::test]
    async fn missing_secret_short_circuits() {
        let config = crate::config::AppConfig::development().turnstile;
        let result = verify_token(&reqwest::Client::new(), &config, "tok", None).await;
        assert!(matches!(result, Err(TurnstileError::NotConfigured)));
    }
}
