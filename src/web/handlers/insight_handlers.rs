// src/web/handlers/insight_handlers.rs
use crate::database::DatabaseConfig;
use crate::integrations::Integrations;
use crate::services::recommendations::{RecommendationOutcome, SimilarOutcome};
use crate::services::{
    ChatbotService, FetchOutcome, GlassdoorService, PreferenceCriteria, RecommendationService,
};
use crate::types::{GlassdoorMetrics, InterviewRecord};
use crate::web::handlers::{database_failure, pool_or_error};
use crate::web::types::{
    ApiResult, ChatReply, ChatRequest, DataResponse, FetchAndCacheRequest,
    SimilarCompaniesRequest, StandardErrorResponse, StandardRequest, WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

const DEFAULT_SIMILAR: usize = 5;
const INTERVIEW_PAGE: i64 = 20;
const INTERVIEWS_BY_TITLE: i64 = 10;

pub async fn similar_companies_handler(
    request: Json<StandardRequest<SimilarCompaniesRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<SimilarOutcome> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;
    let limit = request.data.limit.unwrap_or(DEFAULT_SIMILAR);

    match RecommendationService::new(pool, integrations.llm.as_ref())
        .similar_with_reasons(request.data.company_id, limit)
        .await
    {
        Ok(Some(outcome)) => {
            info!(
                "Similar companies for {}: {} ({})",
                request.data.company_id,
                outcome.len(),
                if outcome.is_ai() { "ai" } else { "heuristic" }
            );
            Ok(Json(DataResponse::success("Similar companies", outcome, conversation_id)))
        }
        Ok(None) => Err(Json(StandardErrorResponse::not_found("Company", conversation_id))),
        Err(e) => Err(database_failure("Ranking similar companies", e, conversation_id)),
    }
}

pub async fn recommendations_handler(
    request: Json<StandardRequest<PreferenceCriteria>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<RecommendationOutcome> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match RecommendationService::new(pool, integrations.llm.as_ref())
        .recommend(&request.data)
        .await
    {
        Ok(outcome) => Ok(Json(DataResponse::success(
            format!("{} recommendations", outcome.len()),
            outcome,
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Building recommendations", e, conversation_id)),
    }
}

pub async fn company_interviews_handler(
    company_id: i64,
    job_title: Option<&str>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<InterviewRecord>> {
    let pool = pool_or_error(db_config, &None)?;
    let service = GlassdoorService::new(pool, None);

    let interviews = match job_title.filter(|title| !title.is_empty()) {
        Some(title) => {
            service
                .interviews_by_title(company_id, title, INTERVIEWS_BY_TITLE)
                .await
        }
        None => service.interviews(company_id, INTERVIEW_PAGE).await,
    };

    match interviews {
        Ok(interviews) => Ok(Json(DataResponse::success(
            format!("{} interviews", interviews.len()),
            interviews,
            None,
        ))),
        Err(e) => Err(database_failure("Loading interviews", e, None)),
    }
}

pub async fn glassdoor_metrics_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<GlassdoorMetrics>> {
    let pool = pool_or_error(db_config, &None)?;

    match GlassdoorService::new(pool, None).metrics(company_id).await {
        Ok(metrics) => Ok(Json(DataResponse::success("Glassdoor metrics", metrics, None))),
        Err(e) => Err(database_failure("Loading Glassdoor metrics", e, None)),
    }
}

/// Always answers with an outcome; upstream failures are inside it
pub async fn fetch_glassdoor_handler(
    request: Json<StandardRequest<FetchAndCacheRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<FetchOutcome> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    let outcome = GlassdoorService::new(pool, integrations.glassdoor.as_ref())
        .fetch_and_cache(request.data.company_id, &request.data.company_name)
        .await;

    Ok(Json(DataResponse::success("Glassdoor sync finished", outcome, conversation_id)))
}

pub async fn chat_handler(
    request: Json<StandardRequest<ChatRequest>>,
    integrations: &State<Integrations>,
) -> ApiResult<ChatReply> {
    let conversation_id = request.conversation_id();

    match ChatbotService::new(integrations.llm.as_ref())
        .chat(
            &request.data.messages,
            request.data.company_context.as_deref(),
        )
        .await
    {
        Ok(response) => Ok(Json(DataResponse::success(
            "Assistant reply",
            ChatReply { response },
            conversation_id,
        ))),
        Err(e) => Err(Json(StandardErrorResponse::external_service(
            e.to_string(),
            conversation_id,
        ))),
    }
}
