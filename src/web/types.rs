// src/web/types.rs
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

pub const NOT_AUTHENTICATED: &str = "NOT_AUTHENTICATED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
pub const EXTERNAL_SERVICE_ERROR: &str = "EXTERNAL_SERVICE_ERROR";
pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// What every data route returns
pub type ApiResult<T> = Result<Json<DataResponse<T>>, Json<StandardErrorResponse>>;

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn success(message: impl Into<String>, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message: message.into(),
            data,
            conversation_id,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>, action: &str, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message: message.into(),
            action: action.to_string(),
            conversation_id,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }

    pub fn not_authenticated(conversation_id: Option<String>) -> Self {
        Self::new(
            "Not authenticated".to_string(),
            NOT_AUTHENTICATED.to_string(),
            vec!["Sign in and retry the request".to_string()],
            conversation_id,
        )
    }

    pub fn not_found(what: &str, conversation_id: Option<String>) -> Self {
        Self::new(
            format!("{} not found", what),
            NOT_FOUND.to_string(),
            vec![format!("Check the {} id", what.to_lowercase())],
            conversation_id,
        )
    }

    pub fn validation(error: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self::new(
            error.into(),
            VALIDATION_ERROR.to_string(),
            vec!["Fix the highlighted field and resubmit".to_string()],
            conversation_id,
        )
    }

    pub fn database(conversation_id: Option<String>) -> Self {
        Self::new(
            "Database operation failed".to_string(),
            DATABASE_ERROR.to_string(),
            vec!["Try again in a few moments".to_string()],
            conversation_id,
        )
    }

    pub fn external_service(error: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self::new(
            error.into(),
            EXTERNAL_SERVICE_ERROR.to_string(),
            vec![
                "The upstream provider may be unavailable".to_string(),
                "Try again later".to_string(),
            ],
            conversation_id,
        )
    }
}

// Request bodies carry an optional conversation_id next to their own fields
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CompanyIdRequest {
    pub company_id: i64,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CompanyIdsRequest {
    pub company_ids: Vec<i64>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SimilarCompaniesRequest {
    pub company_id: i64,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct RoleComparisonRequest {
    pub company_ids: Vec<i64>,
    pub job_title: String,
    pub level: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct FetchAndCacheRequest {
    pub company_id: i64,
    pub company_name: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<crate::services::chatbot::ConversationTurn>,
    pub company_context: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ChatReply {
    pub response: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ChangedResponse {
    pub changed: bool,
}
