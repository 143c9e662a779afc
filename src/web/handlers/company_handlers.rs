// src/web/handlers/company_handlers.rs
use crate::database::DatabaseConfig;
use crate::scoring::{FilterCriteria, DEFAULT_FILTER_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::services::{CompanyService, ReviewService};
use crate::types::{
    AggregateScore, AnonymousReview, Company, CompanyDetail, NewReview, ReviewStats, ScoredCompany,
};
use crate::utils::page_limit;
use crate::web::handlers::{database_failure, pool_or_error};
use crate::web::types::{
    ApiResult, ChangedResponse, CreatedResponse, DataResponse, StandardErrorResponse,
    StandardRequest, WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

const DEFAULT_REVIEW_PAGE: i64 = 20;
const MAX_PAGE: i64 = 500;

pub async fn list_companies_handler(
    limit: Option<i64>,
    offset: Option<i64>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<ScoredCompany>> {
    let pool = pool_or_error(db_config, &None)?;
    let limit = page_limit(limit, DEFAULT_FILTER_LIMIT as i64, MAX_PAGE);

    match CompanyService::new(pool).list(limit, offset.unwrap_or(0)).await {
        Ok(companies) => Ok(Json(DataResponse::success(
            format!("{} companies", companies.len()),
            companies,
            None,
        ))),
        Err(e) => Err(database_failure("Listing companies", e, None)),
    }
}

pub async fn get_company_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<CompanyDetail>> {
    let pool = pool_or_error(db_config, &None)?;

    match CompanyService::new(pool).detail(company_id).await {
        Ok(detail) => {
            let message = match &detail {
                Some(detail) => format!("Company {}", detail.company.name),
                None => format!("No company with id {}", company_id),
            };
            Ok(Json(DataResponse::success(message, detail, None)))
        }
        Err(e) => Err(database_failure("Loading company detail", e, None)),
    }
}

pub async fn company_aggregate_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<AggregateScore>> {
    let pool = pool_or_error(db_config, &None)?;

    match CompanyService::new(pool).aggregate(company_id).await {
        Ok(aggregate) => Ok(Json(DataResponse::success("Aggregate score", aggregate, None))),
        Err(e) => Err(database_failure("Aggregating scores", e, None)),
    }
}

pub async fn search_companies_handler(
    query: &str,
    limit: Option<i64>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<Company>> {
    let pool = pool_or_error(db_config, &None)?;
    let limit = page_limit(limit, DEFAULT_SEARCH_LIMIT as i64, MAX_PAGE) as usize;

    match CompanyService::new(pool).search(query, limit).await {
        Ok(companies) => Ok(Json(DataResponse::success(
            format!("{} companies match '{}'", companies.len(), query),
            companies,
            None,
        ))),
        Err(e) => Err(database_failure("Searching companies", e, None)),
    }
}

pub async fn filter_companies_handler(
    request: Json<StandardRequest<FilterCriteria>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<ScoredCompany>> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match CompanyService::new(pool).filter(&request.data).await {
        Ok(companies) => Ok(Json(DataResponse::success(
            format!("{} companies match the filter", companies.len()),
            companies,
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Filtering companies", e, conversation_id)),
    }
}

pub async fn submit_review_handler(
    request: Json<StandardRequest<NewReview>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<CreatedResponse> {
    let conversation_id = request.conversation_id();

    if let Err(e) = request.data.validate() {
        warn!("Rejected review for company {}: {}", request.data.company_id, e);
        return Err(Json(StandardErrorResponse::validation(
            e.to_string(),
            conversation_id,
        )));
    }

    let pool = pool_or_error(db_config, &conversation_id)?;
    match ReviewService::new(pool).submit(&request.data).await {
        Ok(id) => {
            info!("Review {} submitted for company {}", id, request.data.company_id);
            Ok(Json(DataResponse::success(
                "Review submitted",
                CreatedResponse { id },
                conversation_id,
            )))
        }
        Err(e) => Err(database_failure("Submitting review", e, conversation_id)),
    }
}

pub async fn company_reviews_handler(
    company_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<AnonymousReview>> {
    let pool = pool_or_error(db_config, &None)?;
    let limit = page_limit(limit, DEFAULT_REVIEW_PAGE, MAX_PAGE);

    match ReviewService::new(pool)
        .page(company_id, limit, offset.unwrap_or(0))
        .await
    {
        Ok(reviews) => Ok(Json(DataResponse::success(
            format!("{} reviews", reviews.len()),
            reviews,
            None,
        ))),
        Err(e) => Err(database_failure("Loading reviews", e, None)),
    }
}

pub async fn review_stats_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<ReviewStats>> {
    let pool = pool_or_error(db_config, &None)?;

    match ReviewService::new(pool).stats(company_id).await {
        Ok(stats) => Ok(Json(DataResponse::success("Review statistics", stats, None))),
        Err(e) => Err(database_failure("Computing review statistics", e, None)),
    }
}

pub async fn flag_review_handler(
    review_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    let pool = pool_or_error(db_config, &None)?;

    match ReviewService::new(pool).flag(review_id).await {
        Ok(changed) => {
            info!("Review {} flagged: {}", review_id, changed);
            Ok(Json(DataResponse::success(
                "Review flagged",
                ChangedResponse { changed },
                None,
            )))
        }
        Err(e) => Err(database_failure("Flagging review", e, None)),
    }
}
