// src/web/handlers/listing_handlers.rs
use crate::database::DatabaseConfig;
use crate::integrations::jsearch::{JobSearchParams, JobSearchResponse};
use crate::integrations::linkedin_jobs::LinkedInJob;
use crate::integrations::Integrations;
use crate::services::{JobService, NewsService, SyncOutcome};
use crate::types::{CompanyNews, JobOpening};
use crate::web::handlers::{database_failure, pool_or_error};
use crate::web::types::{
    ApiResult, CompanyIdRequest, DataResponse, StandardErrorResponse, StandardRequest,
    WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

const NEWS_PAGE: i64 = 10;

pub async fn company_jobs_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<JobOpening>> {
    let pool = pool_or_error(db_config, &None)?;

    match JobService::new(pool, None).by_company(company_id).await {
        Ok(jobs) => Ok(Json(DataResponse::success(
            format!("{} job openings", jobs.len()),
            jobs,
            None,
        ))),
        Err(e) => Err(database_failure("Loading job openings", e, None)),
    }
}

pub async fn refresh_jobs_handler(
    request: Json<StandardRequest<CompanyIdRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<SyncOutcome> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;
    let company_id = request.data.company_id;

    match JobService::new(pool, integrations.jsearch.as_ref())
        .refresh(company_id)
        .await
    {
        Ok(Some(outcome)) => {
            info!("Job refresh for company {}: {:?}", company_id, outcome);
            Ok(Json(DataResponse::success("Job openings refreshed", outcome, conversation_id)))
        }
        Ok(None) => Err(Json(StandardErrorResponse::not_found("Company", conversation_id))),
        Err(e) => Err(database_failure("Refreshing job openings", e, conversation_id)),
    }
}

pub async fn company_news_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<CompanyNews>> {
    let pool = pool_or_error(db_config, &None)?;

    match NewsService::new(pool, None, None)
        .by_company(company_id, NEWS_PAGE)
        .await
    {
        Ok(news) => Ok(Json(DataResponse::success(
            format!("{} news items", news.len()),
            news,
            None,
        ))),
        Err(e) => Err(database_failure("Loading company news", e, None)),
    }
}

pub async fn industry_news_handler(
    category: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<CompanyNews>> {
    let pool = pool_or_error(db_config, &None)?;

    match NewsService::new(pool, None, None)
        .by_industry(category, NEWS_PAGE)
        .await
    {
        Ok(news) => Ok(Json(DataResponse::success(
            format!("{} news items for {}", news.len(), category),
            news,
            None,
        ))),
        Err(e) => Err(database_failure("Loading industry news", e, None)),
    }
}

pub async fn refresh_news_handler(
    request: Json<StandardRequest<CompanyIdRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<SyncOutcome> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;
    let company_id = request.data.company_id;

    let service = NewsService::new(pool, integrations.news.as_ref(), integrations.llm.as_ref());
    match service.refresh(company_id).await {
        Ok(Some(outcome)) => Ok(Json(DataResponse::success("News refreshed", outcome, conversation_id))),
        Ok(None) => Err(Json(StandardErrorResponse::not_found("Company", conversation_id))),
        Err(e) => Err(database_failure("Refreshing news", e, conversation_id)),
    }
}

pub async fn search_jobs_handler(
    request: Json<StandardRequest<JobSearchParams>>,
    integrations: &State<Integrations>,
) -> ApiResult<JobSearchResponse> {
    let conversation_id = request.conversation_id();

    let Some(client) = integrations.jsearch.as_ref() else {
        warn!("Job search requested but RAPIDAPI_JSEARCH_KEY is not configured");
        return Err(Json(StandardErrorResponse::external_service(
            "Job search is not configured",
            conversation_id,
        )));
    };

    match client.search(&request.data).await {
        Ok(response) => Ok(Json(DataResponse::success(
            format!("{} jobs found", response.data.len()),
            response,
            conversation_id,
        ))),
        Err(e) => {
            error!("JSearch request for '{}' failed: {:#}", request.data.query, e);
            Err(Json(StandardErrorResponse::external_service(
                "Job search failed",
                conversation_id,
            )))
        }
    }
}

/// Null when the provider is unavailable or does not know the job
pub async fn job_details_handler(
    job_id: &str,
    integrations: &State<Integrations>,
) -> ApiResult<Option<LinkedInJob>> {
    let details = match integrations.linkedin_jobs.as_ref() {
        Some(client) => client.job_details(job_id).await,
        None => {
            warn!("Job details requested but RAPIDAPI_LINKEDIN_JOBS_KEY is not configured");
            None
        }
    };

    Ok(Json(DataResponse::success("Job details", details, None)))
}
