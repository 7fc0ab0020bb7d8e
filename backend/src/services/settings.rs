//! System settings service
//!
//! A small enumerated key/value store. Keys are fixed; unknown keys are
//! rejected so typos never create silent dead settings. Threshold values
//! are validated together before being persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Settings service
#[derive(Clone)]
pub struct SettingsService {
    db: PgPool,
}

/// A system setting row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating a setting
#[derive(Debug, Deserialize)]
pub struct UpdateSettingInput {
    pub key: String,
    pub value: String,
}

/// The recognized setting keys
pub const STOCK_CRITICAL_THRESHOLD: &str = "stock_critical_threshold";
pub const STOCK_LOW_THRESHOLD: &str = "stock_low_threshold";
pub const AUTO_GENERATE_PURCHASE_ORDERS: &str = "auto_generate_purchase_orders";
pub const MAINTENANCE_MODE: &str = "maintenance_mode";

const KNOWN_KEYS: &[&str] = &[
    STOCK_CRITICAL_THRESHOLD,
    STOCK_LOW_THRESHOLD,
    AUTO_GENERATE_PURCHASE_ORDERS,
    MAINTENANCE_MODE,
];

const SETTING_COLUMNS: &str = "id, key, value, updated_at";

impl SettingsService {
    /// Create a new SettingsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all settings
    pub async fn list(&self) -> AppResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM system_settings ORDER BY key",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(settings)
    }

    /// Get a setting by key
    pub async fn get(&self, key: &str) -> AppResult<Setting> {
        let setting = sqlx::query_as::<_, Setting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM system_settings WHERE key = $1",
        ))
        .bind(key)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Setting".to_string()))?;

        Ok(setting)
    }

    /// Update a setting, creating the row on first write
    pub async fn update(&self, input: UpdateSettingInput) -> AppResult<Setting> {
        if !KNOWN_KEYS.contains(&input.key.as_str()) {
            return Err(AppError::Validation {
                field: "key".to_string(),
                message: format!("Unknown setting key '{}'", input.key),
                message_es: format!("Clave de configuración desconocida '{}'", input.key),
            });
        }

        self.validate_value(&input).await?;

        let setting = sqlx::query_as::<_, Setting>(&format!(
            r#"
            INSERT INTO system_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            RETURNING {SETTING_COLUMNS}
            "#,
        ))
        .bind(&input.key)
        .bind(&input.value)
        .fetch_one(&self.db)
        .await?;

        Ok(setting)
    }

    /// Read a boolean setting, defaulting when unset
    pub async fn get_bool(&self, key: &str, default: bool) -> AppResult<bool> {
        match self.get(key).await {
            Ok(setting) => Ok(setting.value == "true"),
            Err(AppError::NotFound(_)) => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Validate a value against the semantics of its key. Thresholds are
    /// checked as a pair so critical stays strictly below low.
    async fn validate_value(&self, input: &UpdateSettingInput) -> AppResult<()> {
        match input.key.as_str() {
            STOCK_CRITICAL_THRESHOLD | STOCK_LOW_THRESHOLD => {
                let value: i32 = input.value.parse().map_err(|_| AppError::Validation {
                    field: "value".to_string(),
                    message: "Threshold must be an integer".to_string(),
                    message_es: "El umbral debe ser un número entero".to_string(),
                })?;

                let counterpart_key = if input.key == STOCK_CRITICAL_THRESHOLD {
                    STOCK_LOW_THRESHOLD
                } else {
                    STOCK_CRITICAL_THRESHOLD
                };

                let counterpart = match self.get(counterpart_key).await {
                    Ok(s) => s.value.parse::<i32>().ok(),
                    Err(AppError::NotFound(_)) => None,
                    Err(e) => return Err(e),
                };

                if let Some(other) = counterpart {
                    let (critical, low) = if input.key == STOCK_CRITICAL_THRESHOLD {
                        (value, other)
                    } else {
                        (other, value)
                    };

                    shared::validate_alert_thresholds(critical, low).map_err(|msg| {
                        AppError::Validation {
                            field: "value".to_string(),
                            message: msg.to_string(),
                            message_es: "Umbrales de alerta inválidos".to_string(),
                        }
                    })?;
                } else if value < 0 {
                    return Err(AppError::Validation {
                        field: "value".to_string(),
                        message: "Threshold cannot be negative".to_string(),
                        message_es: "El umbral no puede ser negativo".to_string(),
                    });
                }
            }
            AUTO_GENERATE_PURCHASE_ORDERS | MAINTENANCE_MODE => {
                if input.value != "true" && input.value != "false" {
                    return Err(AppError::Validation {
                        field: "value".to_string(),
                        message: "Value must be 'true' or 'false'".to_string(),
                        message_es: "El valor debe ser 'true' o 'false'".to_string(),
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }
}
