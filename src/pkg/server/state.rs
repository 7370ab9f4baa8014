use sqlx::{PgPool, Pool, Postgres, Transaction, postgres::PgPoolOptions};
use std::sync::Arc;

use crate::{conf::settings, prelude::Result};

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

impl GetTxn for PgPool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
        })
    }
}
