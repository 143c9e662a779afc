// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::auth::{AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::core::ConfigManager;
use crate::database::DatabaseConfig;
use crate::demo::DemoFilter;
use crate::integrations::jsearch::{JobSearchParams, JobSearchResponse};
use crate::integrations::linkedin_jobs::LinkedInJob;
use crate::integrations::Integrations;
use crate::scoring::FilterCriteria;
use crate::services::comparison::{ComparisonData, MetricsSummary};
use crate::services::recommendations::{RecommendationOutcome, SimilarOutcome};
use crate::services::{FetchOutcome, PreferenceCriteria, SyncOutcome};
use crate::types::salary::{
    SalaryCompareFilter, SalaryInsights, SalaryRange, SalaryStats, SalaryTrendFilter,
};
use crate::types::user::{ComparisonDraft, ComparisonUpdate};
use crate::types::{
    AggregateScore, AnonymousReview, Company, CompanyDetail, CompanyNews, GlassdoorMetrics,
    InterviewRecord, JobOpening, NewReview, ReviewStats, SalaryRecord, SavedComparison,
    ScoredCompany, User,
};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{CookieJar, Header, Status};
use rocket::serde::json::Json;
use rocket::{
    catchers, delete, get, options, patch, post, routes, Build, Config, Request, Response,
    Rocket, State,
};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PATCH, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Companies and reviews

#[get("/companies?<limit>&<offset>")]
pub async fn list_companies(
    limit: Option<i64>,
    offset: Option<i64>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<ScoredCompany>> {
    handlers::list_companies_handler(limit, offset, db_config).await
}

#[get("/companies/search?<q>&<limit>")]
pub async fn search_companies(
    q: &str,
    limit: Option<i64>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<Company>> {
    handlers::search_companies_handler(q, limit, db_config).await
}

#[post("/companies/filter", data = "<request>")]
pub async fn filter_companies(
    request: Json<StandardRequest<FilterCriteria>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<ScoredCompany>> {
    handlers::filter_companies_handler(request, db_config).await
}

#[get("/companies/<company_id>")]
pub async fn get_company(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<CompanyDetail>> {
    handlers::get_company_handler(company_id, db_config).await
}

#[get("/companies/<company_id>/aggregate")]
pub async fn company_aggregate(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<AggregateScore>> {
    handlers::company_aggregate_handler(company_id, db_config).await
}

#[post("/reviews", data = "<request>")]
pub async fn submit_review(
    request: Json<StandardRequest<NewReview>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<CreatedResponse> {
    handlers::submit_review_handler(request, db_config).await
}

#[get("/companies/<company_id>/reviews?<limit>&<offset>")]
pub async fn company_reviews(
    company_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<AnonymousReview>> {
    handlers::company_reviews_handler(company_id, limit, offset, db_config).await
}

#[get("/companies/<company_id>/reviews/stats")]
pub async fn review_stats(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<ReviewStats>> {
    handlers::review_stats_handler(company_id, db_config).await
}

#[post("/reviews/<review_id>/flag")]
pub async fn flag_review(review_id: i64, db_config: &State<DatabaseConfig>) -> ApiResult<ChangedResponse> {
    handlers::flag_review_handler(review_id, db_config).await
}

// Jobs and news

#[get("/companies/<company_id>/jobs")]
pub async fn company_jobs(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<JobOpening>> {
    handlers::company_jobs_handler(company_id, db_config).await
}

#[post("/jobs/refresh", data = "<request>")]
pub async fn refresh_jobs(
    request: Json<StandardRequest<CompanyIdRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<SyncOutcome> {
    handlers::refresh_jobs_handler(request, db_config, integrations).await
}

#[get("/companies/<company_id>/news")]
pub async fn company_news(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<CompanyNews>> {
    handlers::company_news_handler(company_id, db_config).await
}

#[get("/news/industry/<category>")]
pub async fn industry_news(
    category: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<CompanyNews>> {
    handlers::industry_news_handler(category, db_config).await
}

#[post("/news/refresh", data = "<request>")]
pub async fn refresh_news(
    request: Json<StandardRequest<CompanyIdRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<SyncOutcome> {
    handlers::refresh_news_handler(request, db_config, integrations).await
}

#[post("/linkedin-jobs/search", data = "<request>")]
pub async fn search_jobs(
    request: Json<StandardRequest<JobSearchParams>>,
    integrations: &State<Integrations>,
) -> ApiResult<JobSearchResponse> {
    handlers::search_jobs_handler(request, integrations).await
}

#[get("/linkedin-jobs/<job_id>")]
pub async fn job_details(job_id: &str, integrations: &State<Integrations>) -> ApiResult<Option<LinkedInJob>> {
    handlers::job_details_handler(job_id, integrations).await
}

// Salary and comparison

#[get("/companies/<company_id>/salaries")]
pub async fn company_salaries(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SalaryRecord>> {
    handlers::company_salaries_handler(company_id, db_config).await
}

#[post("/salary/compare", data = "<request>")]
pub async fn compare_salaries(
    request: Json<StandardRequest<SalaryCompareFilter>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SalaryRecord>> {
    handlers::compare_salaries_handler(request, db_config).await
}

#[get("/salary/stats?<job_title>&<level>")]
pub async fn salary_stats(
    job_title: &str,
    level: &str,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<SalaryStats>> {
    handlers::salary_stats_handler(job_title, level, db_config).await
}

#[get("/salary/job-titles")]
pub async fn salary_job_titles(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<String>> {
    handlers::job_titles_handler(db_config).await
}

#[get("/salary/levels")]
pub async fn salary_levels(db_config: &State<DatabaseConfig>) -> ApiResult<Vec<String>> {
    handlers::levels_handler(db_config).await
}

#[post("/salary/trends", data = "<request>")]
pub async fn salary_trends(
    request: Option<Json<StandardRequest<SalaryTrendFilter>>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<SalaryInsights> {
    handlers::salary_trends_handler(request, db_config).await
}

#[get("/salary/range?<job_title>")]
pub async fn salary_range(job_title: &str, db_config: &State<DatabaseConfig>) -> ApiResult<SalaryRange> {
    handlers::salary_range_handler(job_title, db_config).await
}

#[post("/comparison/data", data = "<request>")]
pub async fn comparison_data(
    request: Json<StandardRequest<CompanyIdsRequest>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<ComparisonData>> {
    handlers::comparison_data_handler(request, db_config).await
}

#[post("/comparison/metrics", data = "<request>")]
pub async fn metrics_summary(
    request: Json<StandardRequest<CompanyIdsRequest>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<MetricsSummary>> {
    handlers::metrics_summary_handler(request, db_config).await
}

#[post("/comparison/salaries", data = "<request>")]
pub async fn role_comparison(
    request: Json<StandardRequest<RoleComparisonRequest>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SalaryRecord>> {
    handlers::role_comparison_handler(request, db_config).await
}

// Recommendations, Glassdoor and the assistant

#[post("/recommendations/similar", data = "<request>")]
pub async fn similar_companies(
    request: Json<StandardRequest<SimilarCompaniesRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<SimilarOutcome> {
    handlers::similar_companies_handler(request, db_config, integrations).await
}

#[post("/recommendations", data = "<request>")]
pub async fn recommendations(
    request: Json<StandardRequest<PreferenceCriteria>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<RecommendationOutcome> {
    handlers::recommendations_handler(request, db_config, integrations).await
}

#[get("/companies/<company_id>/interviews?<job_title>")]
pub async fn company_interviews(
    company_id: i64,
    job_title: Option<&str>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<InterviewRecord>> {
    handlers::company_interviews_handler(company_id, job_title, db_config).await
}

#[get("/companies/<company_id>/glassdoor")]
pub async fn glassdoor_metrics(
    company_id: i64,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Option<GlassdoorMetrics>> {
    handlers::glassdoor_metrics_handler(company_id, db_config).await
}

#[post("/glassdoor/fetch", data = "<request>")]
pub async fn fetch_glassdoor(
    request: Json<StandardRequest<FetchAndCacheRequest>>,
    db_config: &State<DatabaseConfig>,
    integrations: &State<Integrations>,
) -> ApiResult<FetchOutcome> {
    handlers::fetch_glassdoor_handler(request, db_config, integrations).await
}

#[post("/chatbot", data = "<request>")]
pub async fn chat(
    request: Json<StandardRequest<ChatRequest>>,
    integrations: &State<Integrations>,
) -> ApiResult<ChatReply> {
    handlers::chat_handler(request, integrations).await
}

// Favorites and saved comparisons

#[get("/favorites")]
pub async fn list_favorites(auth: OptionalAuth, db_config: &State<DatabaseConfig>) -> ApiResult<Vec<Company>> {
    handlers::list_favorites_handler(auth, db_config).await
}

#[post("/favorites", data = "<request>")]
pub async fn add_favorite(
    request: Json<StandardRequest<CompanyIdRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::add_favorite_handler(request, auth, db_config).await
}

#[delete("/favorites/<company_id>")]
pub async fn remove_favorite(
    company_id: i64,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    handlers::remove_favorite_handler(company_id, auth, db_config).await
}

#[get("/favorites/<company_id>/check")]
pub async fn check_favorite(
    company_id: i64,
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<bool> {
    handlers::check_favorite_handler(company_id, auth, db_config).await
}

#[get("/comparisons")]
pub async fn list_comparisons(
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SavedComparison>> {
    handlers::list_comparisons_handler(auth, db_config).await
}

#[post("/comparisons", data = "<request>")]
pub async fn save_comparison(
    request: Json<StandardRequest<ComparisonDraft>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<CreatedResponse> {
    handlers::save_comparison_handler(request, auth, db_config).await
}

#[patch("/comparisons", data = "<request>")]
pub async fn update_comparison(
    request: Json<StandardRequest<ComparisonUpdate>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    handlers::update_comparison_handler(request, auth, db_config).await
}

#[delete("/comparisons/<comparison_id>")]
pub async fn delete_comparison(
    comparison_id: i64,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    handlers::delete_comparison_handler(comparison_id, auth, db_config).await
}

// Demo, auth and health

#[get("/demo/companies")]
pub async fn demo_companies() -> ApiResult<Vec<ScoredCompany>> {
    handlers::demo_companies_handler().await
}

#[get("/demo/companies/<company_id>")]
pub async fn demo_company(company_id: i64) -> ApiResult<Option<ScoredCompany>> {
    handlers::demo_company_handler(company_id).await
}

#[post("/demo/companies/filter", data = "<request>")]
pub async fn demo_filter(request: Json<StandardRequest<DemoFilter>>) -> ApiResult<Vec<ScoredCompany>> {
    handlers::demo_filter_handler(request).await
}

#[get("/auth/me")]
pub async fn current_user(auth: OptionalAuth) -> ApiResult<Option<User>> {
    handlers::current_user_handler(auth).await
}

#[post("/auth/logout")]
pub async fn logout(cookies: &CookieJar<'_>) -> Json<ActionResponse> {
    handlers::logout_handler(cookies).await
}

#[get("/health")]
pub async fn health(auth: OptionalAuth, db_config: &State<DatabaseConfig>) -> Json<&'static str> {
    handlers::health_handler(auth, db_config).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        BAD_REQUEST.to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::not_authenticated(None))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {}", request.uri()),
        NOT_FOUND.to_string(),
        vec!["All endpoints live under /api".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        VALIDATION_ERROR.to_string(),
        vec!["Field names are camelCase".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        INTERNAL_ERROR.to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Assemble the API with its managed state; launching is left to the caller
pub fn build_rocket(
    db_config: DatabaseConfig,
    auth_config: AuthConfig,
    integrations: Integrations,
) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(db_config)
        .manage(auth_config)
        .manage(integrations)
        .register(
            "/",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                list_companies,
                search_companies,
                filter_companies,
                get_company,
                company_aggregate,
                submit_review,
                company_reviews,
                review_stats,
                flag_review,
                company_jobs,
                refresh_jobs,
                company_news,
                industry_news,
                refresh_news,
                search_jobs,
                job_details,
                company_salaries,
                compare_salaries,
                salary_stats,
                salary_job_titles,
                salary_levels,
                salary_trends,
                salary_range,
                comparison_data,
                metrics_summary,
                role_comparison,
                similar_companies,
                recommendations,
                company_interviews,
                glassdoor_metrics,
                fetch_glassdoor,
                chat,
                list_favorites,
                add_favorite,
                remove_favorite,
                check_favorite,
                list_comparisons,
                save_comparison,
                update_comparison,
                delete_comparison,
                demo_companies,
                demo_company,
                demo_filter,
                current_user,
                logout,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    let auth_config = AuthConfig::new(config.service.session_secret.clone());
    let integrations = Integrations::from_config(&config.service)?;

    info!("Starting Culture Map API server on port {}", port);
    info!("Database: {}", db_config.database_path.display());

    let figment = Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    build_rocket(db_config, auth_config, integrations)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SessionIdentity;
    use crate::services::test_support::{seed_company, seeded_pool};
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};

    const SECRET: &str = "route-test-secret";

    async fn client_with(db: DatabaseConfig) -> Client {
        let rocket = build_rocket(db, AuthConfig::new(SECRET.into()), Integrations::default());
        Client::tracked(rocket).await.unwrap()
    }

    fn bearer(open_id: &str) -> Header<'static> {
        let token = AuthConfig::new(SECRET.into())
            .sign_session(&SessionIdentity {
                open_id: open_id.into(),
                ..Default::default()
            })
            .unwrap();
        Header::new("Authorization", format!("Bearer {}", token))
    }

    async fn json_of(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
        response.into_json::<Value>().await.unwrap()
    }

    /// Expect the list envelope and a null detail for an unknown id
    #[tokio::test]
    async fn test_company_routes() {
        let db = seeded_pool().await;
        let id = seed_company(db.pool().unwrap(), "Acme", "Technology", None, &[4.0, 5.0]).await;
        let client = client_with(db).await;

        let body = json_of(client.get("/api/companies").dispatch().await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["name"], "Acme");
        assert_eq!(body["data"][0]["aggregateScore"]["overallRating"], 4.5);

        let body = json_of(client.get(format!("/api/companies/{}", id + 100)).dispatch().await).await;
        assert!(body["data"].is_null());

        let body = json_of(
            client
                .post("/api/companies/filter")
                .header(ContentType::JSON)
                .body(json!({"industry": "Technology", "minScore": 4.6}).to_string())
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_search_honours_limit_and_zero_filter_limit() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        for name in ["Apple", "Pineapple", "Snapple"] {
            seed_company(pool, name, "Food", None, &[4.0]).await;
        }
        let client = client_with(db).await;

        let body = json_of(client.get("/api/companies/search?q=APPLE").dispatch().await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let body = json_of(
            client
                .get("/api/companies/search?q=apple&limit=2")
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let body = json_of(
            client
                .post("/api/companies/filter")
                .header(ContentType::JSON)
                .body(json!({"limit": 0}).to_string())
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_favorites_require_a_session() {
        let db = seeded_pool().await;
        let id = seed_company(db.pool().unwrap(), "Acme", "Technology", None, &[4.0]).await;
        let client = client_with(db).await;

        let body = json_of(client.get("/api/favorites").dispatch().await).await;
        assert_eq!(body["data"], json!([]));

        let response = client
            .post("/api/favorites")
            .header(ContentType::JSON)
            .body(json!({"companyId": id}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(json_of(response).await["error_code"], NOT_AUTHENTICATED);

        let response = client
            .post("/api/favorites")
            .header(ContentType::JSON)
            .header(bearer("open-1"))
            .body(json!({"companyId": id}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body = json_of(client.get("/api/favorites").header(bearer("open-1")).dispatch().await).await;
        assert_eq!(body["data"][0]["id"], id);
        let body = json_of(
            client
                .get(format!("/api/favorites/{}/check", id))
                .header(bearer("open-2"))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"], false);
    }

    #[tokio::test]
    async fn test_invalid_review_is_a_validation_error() {
        let db = seeded_pool().await;
        let id = seed_company(db.pool().unwrap(), "Acme", "Technology", None, &[]).await;
        let client = client_with(db).await;

        let body = json_of(
            client
                .post("/api/reviews")
                .header(ContentType::JSON)
                .body(json!({"companyId": id, "rating": 6}).to_string())
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_unconfigured_integrations_degrade() {
        let client = client_with(seeded_pool().await).await;

        let body = json_of(
            client
                .post("/api/chatbot")
                .header(ContentType::JSON)
                .body(json!({"messages": [{"role": "user", "content": "hi"}]}).to_string())
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["error"], "Failed to get response from AI assistant");

        let body = json_of(client.get("/api/linkedin-jobs/123").dispatch().await).await;
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_me_logout_and_unknown_route() {
        let client = client_with(seeded_pool().await).await;

        let body = json_of(client.get("/api/auth/me").header(bearer("open-9")).dispatch().await).await;
        assert_eq!(body["data"]["openId"], "open-9");
        let body = json_of(client.get("/api/auth/me").dispatch().await).await;
        assert!(body["data"].is_null());

        let body = json_of(client.post("/api/auth/logout").dispatch().await).await;
        assert_eq!(body["success"], true);

        let response = client.get("/api/nowhere").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(json_of(response).await["error_code"], NOT_FOUND);
    }
}
