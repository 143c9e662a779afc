// src/web/handlers/system_handlers.rs
use crate::auth::OptionalAuth;
use crate::database::DatabaseConfig;
use crate::demo::{self, DemoFilter};
use crate::types::ScoredCompany;
use crate::web::types::{ApiResult, DataResponse, StandardRequest, WithConversationId};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn health_handler(auth: OptionalAuth, db_config: &State<DatabaseConfig>) -> Json<&'static str> {
    match auth.user {
        Some(user) => info!("Health check by user {}", user.user().open_id),
        None => info!("Health check by anonymous user"),
    }

    match db_config.health_check().await {
        Ok(()) => Json("OK"),
        Err(e) => {
            error!("Health check failed: {:#}", e);
            Json("DEGRADED")
        }
    }
}

pub async fn demo_companies_handler() -> ApiResult<Vec<ScoredCompany>> {
    let companies = demo::companies();
    Ok(Json(DataResponse::success(
        format!("{} demo companies", companies.len()),
        companies,
        None,
    )))
}

pub async fn demo_company_handler(company_id: i64) -> ApiResult<Option<ScoredCompany>> {
    Ok(Json(DataResponse::success(
        "Demo company",
        demo::company_by_id(company_id),
        None,
    )))
}

pub async fn demo_filter_handler(
    request: Json<StandardRequest<DemoFilter>>,
) -> ApiResult<Vec<ScoredCompany>> {
    let companies = demo::filter_companies(&request.data);
    Ok(Json(DataResponse::success(
        format!("{} demo companies match the filter", companies.len()),
        companies,
        request.conversation_id(),
    )))
}
