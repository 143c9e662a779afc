pub mod company_handlers;
pub mod insight_handlers;
pub mod listing_handlers;
pub mod salary_handlers;
pub mod system_handlers;
pub mod user_handlers;

pub use company_handlers::*;
pub use insight_handlers::*;
pub use listing_handlers::*;
pub use salary_handlers::*;
pub use system_handlers::*;
pub use user_handlers::*;

use crate::database::DatabaseConfig;
use crate::web::types::StandardErrorResponse;
use rocket::serde::json::Json;
use sqlx::SqlitePool;
use tracing::error;

pub(crate) fn pool_or_error<'a>(
    db_config: &'a DatabaseConfig,
    conversation_id: &Option<String>,
) -> Result<&'a SqlitePool, Json<StandardErrorResponse>> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {}", e);
        Json(StandardErrorResponse::database(conversation_id.clone()))
    })
}

pub(crate) fn database_failure(
    operation: &str,
    e: anyhow::Error,
    conversation_id: Option<String>,
) -> Json<StandardErrorResponse> {
    error!("{} failed: {:#}", operation, e);
    Json(StandardErrorResponse::database(conversation_id))
}
