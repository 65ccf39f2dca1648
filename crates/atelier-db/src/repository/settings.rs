//! # Store Settings
//!
//! A single-row table holding store identity and the tax configuration the
//! cart reads at startup.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use atelier_core::TaxRate;

/// Store-wide configuration, persisted as the single row `id = 1`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub store_name: String,
    pub address: String,
    pub phone: String,
    pub tax_enabled: bool,
    /// Tax rate in basis points (825 = 8.25%).
    pub tax_rate_bps: u32,
}

impl StoreSettings {
    /// The tax rate the cart should apply. Zero when tax is disabled.
    pub fn tax_rate(&self) -> TaxRate {
        if self.tax_enabled {
            TaxRate::from_bps(self.tax_rate_bps)
        } else {
            TaxRate::zero()
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            store_name: "Atelier".to_string(),
            address: String::new(),
            phone: String::new(),
            tax_enabled: false,
            tax_rate_bps: 0,
        }
    }
}

/// Repository for the settings row.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the settings row, falling back to defaults when none is saved.
    pub async fn load(&self) -> DbResult<StoreSettings> {
        let row: Option<StoreSettings> = sqlx::query_as(
            r#"
            SELECT store_name, address, phone, tax_enabled, tax_rate_bps
            FROM store_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.unwrap_or_default())
    }

    /// Saves the settings row, inserting or replacing the single row.
    pub async fn save(&self, settings: &StoreSettings) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO store_settings
                (id, store_name, address, phone, tax_enabled, tax_rate_bps, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                store_name = excluded.store_name,
                address = excluded.address,
                phone = excluded.phone,
                tax_enabled = excluded.tax_enabled,
                tax_rate_bps = excluded.tax_rate_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.store_name)
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(settings.tax_enabled)
        .bind(settings.tax_rate_bps)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(store_name = %settings.store_name, "Store settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_load_defaults_when_unsaved() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let settings = db.settings().load().await.unwrap();
        assert_eq!(settings, StoreSettings::default());
        assert_eq!(settings.tax_rate().bps(), 0);
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        let mut settings = StoreSettings::default();
        settings.store_name = "Atelier Lagos".to_string();
        settings.tax_enabled = true;
        settings.tax_rate_bps = 750;
        repo.save(&settings).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.store_name, "Atelier Lagos");
        assert_eq!(loaded.tax_rate().bps(), 750);

        // Second save overwrites the single row
        settings.tax_enabled = false;
        repo.save(&settings).await.unwrap();
        let reloaded = repo.load().await.unwrap();
        assert!(!reloaded.tax_enabled);
        assert_eq!(reloaded.tax_rate().bps(), 0);
    }
}
