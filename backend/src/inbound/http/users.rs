//! Account API handlers.
//!
//! ```text
//! POST   /api/v1/users {"name":"Nguyễn Ngọc Quyết","phone":"0123456789"}
//! GET    /api/v1/users?id=<uuid> | ?user_name=<username>
//! DELETE /api/v1/users/<uuid>
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::RegistrationRequest;
use crate::domain::{Account, AccountId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub position: Option<String>,
}

impl From<CreateUserRequest> for RegistrationRequest {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            position: value.position,
        }
    }
}

/// Query string for `GET /api/v1/users`. `id` wins when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub id: Option<String>,
    pub user_name: Option<String>,
}

fn parse_account_id(raw: &str) -> Result<AccountId, Error> {
    AccountId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

fn account_not_found(field: &str, value: &str) -> Error {
    Error::not_found("User not found").with_details(json!({
        "field": field,
        "value": value,
    }))
}

/// Register an account and return it with its derived username and email.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let account = state
        .registration
        .register(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(account))
}

/// Look up one account by `id` or `user_name`, or list all of them.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use registration::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Vec<Account>>> {
    let ListUsersQuery { id, user_name } = query.into_inner();

    if let Some(raw) = id.filter(|value| !value.is_empty()) {
        let id = parse_account_id(&raw)?;
        let account = state
            .accounts
            .find_by_id(&id)
            .await?
            .ok_or_else(|| account_not_found("id", &raw))?;
        return Ok(web::Json(vec![account]));
    }

    if let Some(username) = user_name.filter(|value| !value.is_empty()) {
        let account = state
            .accounts
            .find_by_username(&username)
            .await?
            .ok_or_else(|| account_not_found("user_name", &username))?;
        return Ok(web::Json(vec![account]));
    }

    Ok(web::Json(state.accounts.list_accounts().await?))
}

/// Remove an account.
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_account_id(&path.into_inner())?;
    state.removal.remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
