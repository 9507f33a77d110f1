//! Google OAuth2 authorization-code flow: consent redirect, code exchange,
//! and profile lookup.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::OAuthConfig;

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
];

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Google OAuth is not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("Invalid OAuth endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Google rejected the sign-in: {0}")]
    Rejected(String),

    #[error("Google profile has no email address")]
    MissingEmail,

    #[error("Google request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Profile fields we keep from the userinfo endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

pub struct GoogleOAuth<'a> {
    config: &'a OAuthConfig,
    http: &'a reqwest::Client,
}

impl<'a> GoogleOAuth<'a> {
    pub fn new(config: &'a OAuthConfig, http: &'a reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Consent screen URL; `state` comes back untouched on the callback
    pub fn authorize_url(&self, state: &str) -> Result<Url, OAuthError> {
        if self.config.google_client_id.is_empty() {
            return Err(OAuthError::NotConfigured("GOOGLE_CLIENT_ID"));
        }

        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.google_client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "online"),
                ("prompt", "select_account"),
                ("state", state),
            ],
        )?;

        Ok(url)
    }

    /// Trade the authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        if self.config.google_client_secret.is_empty() {
            return Err(OAuthError::NotConfigured("GOOGLE_CLIENT_SECRET"));
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.google_client_id.as_str()),
                ("client_secret", self.config.google_client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        // Google reports exchange failures as a JSON body with `error`, usually on a 400
        let token: TokenResponse = response.json().await?;

        if let Some(error) = token.error {
            let detail = match token.error_description {
                Some(description) => format!("{} ({})", error, description),
                None => error,
            };
            return Err(OAuthError::Rejected(detail));
        }

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| OAuthError::Rejected("no access token returned".to_string()))
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError> {
        let info: UserInfo = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        profile_from(info)
    }
}

fn profile_from(info: UserInfo) -> Result<GoogleProfile, OAuthError> {
    let email = info
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or(OAuthError::MissingEmail)?;

    let name = info
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string());

    Ok(GoogleProfile {
        email,
        name,
        picture: info.picture.filter(|p| !p.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn authorize_url_carries_client_and_state() {
        let mut config = AppConfig::development().oauth;
        config.google_client_id = "client-123".to_string();
        let http = reqwest::Client::new();

        let url = GoogleOAuth::new(&config, &http).authorize_url("nonce-1").unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["redirect_uri"], "http://localhost:5173/api/auth/callback");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], SCOPES.join(" "));
        assert_eq!(params["prompt"], "select_account");
        assert_eq!(params["state"], "nonce-1");
    }

    #[test]
    fn authorize_url_requires_client_id() {
        let config = AppConfig::development().oauth;
        let http = reqwest::Client::new();
        assert!(matches!(
            GoogleOAuth::new(&config, &http).authorize_url("s"),
            Err(OAuthError::NotConfigured("GOOGLE_CLIENT_ID"))
        ));
    }

    #[test]
    fn profile_falls_back_to_email_local_part() {
        let profile = profile_from(UserInfo {
            email: Some("runner@example.com".to_string()),
            name: None,
            picture: Some(String::new()),
        })
        .unwrap();

        assert_eq!(profile.name, "runner");
        assert_eq!(profile.picture, None);
    }

    #[test]
    fn profile_without_email_is_rejected() {
        let result = profile_from(UserInfo {
            email: None,
            name: Some("Nobody".to_string()),
            picture: None,
        });
        assert!(matches!(result, Err(OAuthError::MissingEmail)));
    }
}
