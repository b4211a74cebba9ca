//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret: SecretString,

    /// Stripe webhook endpoint signing secret
    pub stripe_endpoint_secret: SecretString,

    /// Where Stripe sends the customer after paying
    pub stripe_success_url: String,

    /// Where Stripe sends the customer after abandoning checkout
    pub stripe_cancel_url: String,

    /// Stripe API origin, overridable for local mocks
    #[serde(default = "default_api_base_url")]
    pub stripe_api_base_url: String,

    /// Maximum age of a signed webhook, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret.expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.stripe_secret.expose_secret();
        let endpoint_secret = self.stripe_endpoint_secret.expose_secret();

        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET"));
        }
        if endpoint_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_ENDPOINT_SECRET"));
        }

        // Verify key prefixes for safety
        if !secret.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !endpoint_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        validate_redirect("STRIPE_SUCCESS_URL", &self.stripe_success_url, environment)?;
        validate_redirect("STRIPE_CANCEL_URL", &self.stripe_cancel_url, environment)?;

        if self.webhook_tolerance_secs <= 0 {
            return Err(ValidationError::InvalidWebhookTolerance);
        }

        Ok(())
    }
}

fn validate_redirect(
    name: &'static str,
    url: &str,
    environment: &Environment,
) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or(ValidationError::InvalidRedirectUrl(name))?;
    if rest.is_empty() {
        return Err(ValidationError::InvalidRedirectUrl(name));
    }
    if *environment == Environment::Production && !url.starts_with("https://") {
        return Err(ValidationError::RedirectMustBeHttps(name));
    }
    Ok(())
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_webhook_tolerance() -> i64 {
    300
}
