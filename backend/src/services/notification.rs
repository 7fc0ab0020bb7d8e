//! Notification service for staff email alerts
//!
//! Low-stock alerts are batched into a single email to every active staff
//! user with an email address. Sending is synchronous; transport failures
//! surface to the caller, which decides whether to log and continue or
//! abort the request. Committed ledger state is never rolled back over a
//! failed email.

use sqlx::PgPool;

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};

/// Notification service for dispatching alert emails
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    email_client: Option<EmailClient>,
}

/// HTTP client for a transactional email API
#[derive(Clone)]
pub struct EmailClient {
    api_endpoint: String,
    api_key: String,
    from_address: String,
    http_client: reqwest::Client,
}

impl EmailClient {
    /// Build a client from configuration. Returns None when the email API
    /// is not configured, which disables sending.
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        if config.api_endpoint.is_empty() || config.api_key.is_empty() {
            return None;
        }

        Some(Self {
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Send one email to the given recipients
    pub async fn send(&self, recipients: &[String], subject: &str, body: &str) -> AppResult<()> {
        let payload = serde_json::json!({
            "from": self.from_address,
            "to": recipients,
            "subject": subject,
            "text": body,
        });

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Email(format!(
                "email API returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool, email_client: Option<EmailClient>) -> Self {
        Self { db, email_client }
    }

    /// Active staff users with a non-empty email address
    pub async fn staff_recipients(&self) -> AppResult<Vec<String>> {
        let recipients = sqlx::query_scalar::<_, String>(
            r#"
            SELECT email
            FROM users
            WHERE is_active = true
              AND role IN ('admin', 'staff')
              AND email IS NOT NULL AND email <> ''
            ORDER BY email
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(recipients)
    }

    /// Email a batch of low-stock alert lines to all staff recipients.
    ///
    /// Skipped silently when there is nothing to send, no recipients exist,
    /// or the email API is not configured. Returns the number of recipients
    /// the digest was sent to.
    pub async fn send_low_stock_digest(&self, lines: &[String]) -> AppResult<usize> {
        if lines.is_empty() {
            return Ok(0);
        }

        let recipients = self.staff_recipients().await?;
        if recipients.is_empty() {
            tracing::debug!("low-stock digest skipped: no staff recipients");
            return Ok(0);
        }

        let Some(client) = &self.email_client else {
            tracing::debug!("low-stock digest skipped: email not configured");
            return Ok(0);
        };

        let subject = "Stock alert: products below minimum";
        let body = lines.join("\n");
        client.send(&recipients, subject, &body).await?;

        tracing::info!(
            recipients = recipients.len(),
            alerts = lines.len(),
            "low-stock digest sent"
        );

        Ok(recipients.len())
    }
}
