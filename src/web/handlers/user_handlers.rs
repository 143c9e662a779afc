// src/web/handlers/user_handlers.rs
use crate::auth::{AuthenticatedUser, OptionalAuth, SESSION_COOKIE};
use crate::database::{ComparisonRepository, DatabaseConfig, FavoriteRepository};
use crate::types::user::{ComparisonDraft, ComparisonUpdate};
use crate::types::{Company, SavedComparison, User};
use crate::web::handlers::{database_failure, pool_or_error};
use crate::web::types::{
    ActionResponse, ApiResult, ChangedResponse, CompanyIdRequest, CreatedResponse, DataResponse,
    StandardErrorResponse, StandardRequest, WithConversationId,
};

use rocket::http::{Cookie, CookieJar};
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn list_favorites_handler(
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<Company>> {
    let Some(user_id) = auth.user_id() else {
        return Ok(Json(DataResponse::success("No favorites", Vec::new(), None)));
    };
    let pool = pool_or_error(db_config, &None)?;

    match FavoriteRepository::new(pool).companies_for_user(user_id).await {
        Ok(companies) => Ok(Json(DataResponse::success(
            format!("{} favorites", companies.len()),
            companies,
            None,
        ))),
        Err(e) => Err(database_failure("Listing favorites", e, None)),
    }
}

pub async fn add_favorite_handler(
    request: Json<StandardRequest<CompanyIdRequest>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;
    let company_id = request.data.company_id;

    match FavoriteRepository::new(pool).add(auth.id(), company_id).await {
        Ok(()) => {
            info!("User {} saved company {}", auth.id(), company_id);
            Ok(Json(ActionResponse::success(
                "Company added to favorites",
                "favorite_added",
                conversation_id,
            )))
        }
        Err(e) => Err(database_failure("Adding favorite", e, conversation_id)),
    }
}

pub async fn remove_favorite_handler(
    company_id: i64,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    let pool = pool_or_error(db_config, &None)?;

    match FavoriteRepository::new(pool).remove(auth.id(), company_id).await {
        Ok(changed) => Ok(Json(DataResponse::success(
            "Favorite removed",
            ChangedResponse { changed },
            None,
        ))),
        Err(e) => Err(database_failure("Removing favorite", e, None)),
    }
}

pub async fn check_favorite_handler(
    company_id: i64,
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<bool> {
    let Some(user_id) = auth.user_id() else {
        return Ok(Json(DataResponse::success("Not a favorite", false, None)));
    };
    let pool = pool_or_error(db_config, &None)?;

    match FavoriteRepository::new(pool).exists(user_id, company_id).await {
        Ok(found) => Ok(Json(DataResponse::success("Favorite status", found, None))),
        Err(e) => Err(database_failure("Checking favorite", e, None)),
    }
}

pub async fn list_comparisons_handler(
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<Vec<SavedComparison>> {
    let Some(user_id) = auth.user_id() else {
        return Ok(Json(DataResponse::success("No saved comparisons", Vec::new(), None)));
    };
    let pool = pool_or_error(db_config, &None)?;

    match ComparisonRepository::new(pool).list_for_user(user_id).await {
        Ok(comparisons) => Ok(Json(DataResponse::success(
            format!("{} saved comparisons", comparisons.len()),
            comparisons,
            None,
        ))),
        Err(e) => Err(database_failure("Listing saved comparisons", e, None)),
    }
}

pub async fn save_comparison_handler(
    request: Json<StandardRequest<ComparisonDraft>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<CreatedResponse> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match ComparisonRepository::new(pool)
        .create(auth.id(), &request.data)
        .await
    {
        Ok(id) => {
            info!(
                "User {} saved comparison '{}' ({})",
                auth.id(),
                request.data.comparison_name,
                id
            );
            Ok(Json(DataResponse::success(
                "Comparison saved",
                CreatedResponse { id },
                conversation_id,
            )))
        }
        Err(e) => Err(database_failure("Saving comparison", e, conversation_id)),
    }
}

pub async fn update_comparison_handler(
    request: Json<StandardRequest<ComparisonUpdate>>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    let conversation_id = request.conversation_id();
    let pool = pool_or_error(db_config, &conversation_id)?;

    match ComparisonRepository::new(pool)
        .update(auth.id(), &request.data)
        .await
    {
        Ok(changed) => Ok(Json(DataResponse::success(
            "Comparison updated",
            ChangedResponse { changed },
            conversation_id,
        ))),
        Err(e) => Err(database_failure("Updating comparison", e, conversation_id)),
    }
}

pub async fn delete_comparison_handler(
    comparison_id: i64,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ChangedResponse> {
    let pool = pool_or_error(db_config, &None)?;

    match ComparisonRepository::new(pool)
        .delete(auth.id(), comparison_id)
        .await
    {
        Ok(changed) => Ok(Json(DataResponse::success(
            "Comparison deleted",
            ChangedResponse { changed },
            None,
        ))),
        Err(e) => Err(database_failure("Deleting comparison", e, None)),
    }
}

pub async fn current_user_handler(auth: OptionalAuth) -> ApiResult<Option<User>> {
    let user = auth.user.map(|authenticated| authenticated.user);
    let message = match &user {
        Some(user) => format!("Signed in as {}", user.open_id),
        None => "Not signed in".to_string(),
    };
    Ok(Json(DataResponse::success(message, user, None)))
}

pub async fn logout_handler(cookies: &CookieJar<'_>) -> Json<ActionResponse> {
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Json(ActionResponse::success("Signed out", "logout", None))
}
