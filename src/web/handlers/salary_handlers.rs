// src/web/handlers/salary_handlers.rs
use crate::database::DatabaseConfig;
use crate::services::comparison::{ComparisonData, MetricsSummary};
use crate::services::{ComparisonService, SalaryService};
use crate::types::salary::{
    SalaryCompareFilter, SalaryInsights, SalaryRange, SalaryStats, SalaryTrendFilter,
};
use crate::types::SalaryRecord;
use crate::web::handlers::{database_failure, pool_or_error};
use crate::web::types::{
    ApiResult, CompanyIdsRequest, DataResponse, RoleComparisonRequest, StandardRequest,
    WithConversationId,
};

use rocket::serde::json::Json;
use rocket::State;

pub async fn company_salaries_handler(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SalaryRecord>> {
    let pool = pool_or_error(db_config, &None)?;

    match SalaryService::new(pool).by_company(company_id).await {
        Ok(records) => Ok(Json(DataResponse::success(
            format!("{} salary records", records.len()),
            records,
            None,
        ))),
        Err(e) => Err(database_failure("Loading company salaries", e, None)),
    }
}

pub async fn compare_salaries_handler(
    request: Json<StandardRequest<SalaryCompareFilter>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SalaryRecord>> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match SalaryService::new(pool).compare(&request.data).await {
        Ok(records) => Ok(Json(DataResponse::success(
            format!("{} salary records", records.len()),
            records,
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Comparing salaries", e, conversation_id)),
    }
}

pub async fn salary_stats_handler(
    job_title: &str,
    level: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<SalaryStats>> {
    let pool = pool_or_error(db_config, &None)?;

    match SalaryService::new(pool).stats(job_title, level).await {
        Ok(stats) => Ok(Json(DataResponse::success(
            format!("Compensation for {} ({})", job_title, level),
            stats,
            None,
        ))),
        Err(e) => Err(database_failure("Computing salary statistics", e, None)),
    }
}

pub async fn job_titles_handler(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<String>> {
    let pool = pool_or_error(db_config, &None)?;

    match SalaryService::new(pool).job_titles().await {
        Ok(titles) => Ok(Json(DataResponse::success("Job titles", titles, None))),
        Err(e) => Err(database_failure("Listing job titles", e, None)),
    }
}

pub async fn levels_handler(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<String>> {
    let pool = pool_or_error(db_config, &None)?;

    match SalaryService::new(pool).levels().await {
        Ok(levels) => Ok(Json(DataResponse::success("Levels", levels, None))),
        Err(e) => Err(database_failure("Listing levels", e, None)),
    }
}

pub async fn salary_trends_handler(
    request: Option<Json<StandardRequest<SalaryTrendFilter>>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<SalaryInsights> {
    let (filter, conversation_id) = match request {
        Some(request) => {
            let conversation_id = request.conversation_id();
            (request.into_inner().data, conversation_id)
        }
        None => (SalaryTrendFilter::default(), None),
    };
    let pool = pool_or_error(db_config, &conversation_id)?;

    match SalaryService::new(pool).trends(&filter).await {
        Ok(insights) => Ok(Json(DataResponse::success("Salary trends", insights, conversation_id))),
        Err(e) => Err(database_failure("Computing salary trends", e, conversation_id)),
    }
}

pub async fn salary_range_handler(
    job_title: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<SalaryRange> {
    let pool = pool_or_error(db_config, &None)?;

    match SalaryService::new(pool).range_by_role(job_title).await {
        Ok(range) => Ok(Json(DataResponse::success(
            format!("Salary range for {}", job_title),
            range,
            None,
        ))),
        Err(e) => Err(database_failure("Computing salary range", e, None)),
    }
}

pub async fn comparison_data_handler(
    request: Json<StandardRequest<CompanyIdsRequest>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<ComparisonData>> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match ComparisonService::new(pool)
        .comparison_data(&request.data.company_ids)
        .await
    {
        Ok(data) => Ok(Json(DataResponse::success(
            format!("Comparing {} companies", data.len()),
            data,
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Loading comparison data", e, conversation_id)),
    }
}

pub async fn metrics_summary_handler(
    request: Json<StandardRequest<CompanyIdsRequest>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<MetricsSummary>> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match ComparisonService::new(pool)
        .metrics_summary(&request.data.company_ids)
        .await
    {
        Ok(summaries) => Ok(Json(DataResponse::success(
            "Metrics summary",
            summaries,
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Summarizing metrics", e, conversation_id)),
    }
}

pub async fn role_comparison_handler(
    request: Json<StandardRequest<RoleComparisonRequest>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SalaryRecord>> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;
    let RoleComparisonRequest {
        company_ids,
        job_title,
        level,
    } = request.into_inner().data;

    match ComparisonService::new(pool)
        .salary_comparison(company_ids, job_title, level)
        .await
    {
        Ok(records) => Ok(Json(DataResponse::success(
            format!("{} salary records", records.len()),
            records,
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Comparing role salaries", e, conversation_id)),
    }
}
