use async_trait::async_trait;
use sea_orm::{ sea_query::OnConflict, ActiveValue, DatabaseConnection, EntityTrait };

use crate::db::entity::ticker_cache::{ self, TICKER_ROW_ID };
use crate::error::{ AppError, Result };
use crate::providers::TickerSnapshot;
use crate::services::ticker_service::TickerStore;

/// The single `ticker_cache` row.
#[derive(Clone)]
pub struct TickerRepository {
    db: DatabaseConnection,
}

impl TickerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn active_model(snapshot: &TickerSnapshot) -> Result<ticker_cache::ActiveModel> {
        let data = serde_json
            ::to_value(snapshot)
            .map_err(|e| AppError::Internal(format!("Failed to encode ticker snapshot: {}", e)))?;

        Ok(ticker_cache::ActiveModel {
            id: ActiveValue::Set(TICKER_ROW_ID.to_string()),
            data: ActiveValue::Set(data),
            updated_at: ActiveValue::Set(snapshot.updated_at),
        })
    }

    /// Create the row with placeholder data if it does not exist yet.
    pub async fn ensure_placeholder(&self) -> Result<bool> {
        let model = Self::active_model(&TickerSnapshot::placeholder())?;

        let inserted = ticker_cache::Entity
            ::insert(model)
            .on_conflict(OnConflict::column(ticker_cache::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db).await?;

        Ok(inserted > 0)
    }
}

#[async_trait]
impl TickerStore for TickerRepository {
    async fn load(&self) -> Result<Option<TickerSnapshot>> {
        let Some(row) = ticker_cache::Entity::find_by_id(TICKER_ROW_ID).one(&self.db).await? else {
            return Ok(None);
        };

        match serde_json::from_value::<TickerSnapshot>(row.data) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(error = %e, "ticker row holds unreadable data; treating as empty");
                Ok(None)
            }
        }
    }

    async fn save(&self, snapshot: &TickerSnapshot) -> Result<()> {
        let model = Self::active_model(snapshot)?;

        ticker_cache::Entity
            ::insert(model)
            .on_conflict(
                OnConflict::column(ticker_cache::Column::Id)
                    .update_columns([ticker_cache::Column::Data, ticker_cache::Column::UpdatedAt])
                    .to_owned()
            )
            .exec_without_returning(&self.db).await?;

        Ok(())
    }
}
