//! Route handlers for the HTML shell and the names API.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{info, warn};
use namebook_core::{FieldIssue, NameField, NameRecord, NameValidationError, NewName};
use serde::Deserialize;
use serde_json::Value;

use crate::csrf::session_from_headers;
use crate::error::{ApiError, ApiResult};
use crate::shell::render_shell;
use crate::state::AppState;

const APP_JS: &str = include_str!("../assets/app.js");

/// `POST /api/names` body. Fields stay untyped so non-strings can be reported.
#[derive(Debug, Default, Deserialize)]
pub struct CreateNameBody {
    #[serde(default)]
    pub first_name: Option<Value>,
    #[serde(default)]
    pub last_name: Option<Value>,
}

impl CreateNameBody {
    /// Applies `required|string` to both fields.
    pub fn into_new_name(self) -> Result<NewName, NameValidationError> {
        let mut type_issues = Vec::new();
        let first = string_field(NameField::FirstName, self.first_name.as_ref(), &mut type_issues);
        let last = string_field(NameField::LastName, self.last_name.as_ref(), &mut type_issues);

        NewName::from_optional(first, last).map_err(|err| {
            let mut issues = type_issues;
            for issue in err.issues() {
                if !issues.iter().any(|known| known.field == issue.field) {
                    issues.push(*issue);
                }
            }
            NameValidationError::from_issues(issues).unwrap_or(err)
        })
    }
}

fn string_field<'a>(
    field: NameField,
    value: Option<&'a Value>,
    issues: &mut Vec<FieldIssue>,
) -> Option<&'a str> {
    match value {
        Some(Value::String(text)) => Some(text.as_str()),
        None | Some(Value::Null) => None,
        Some(_) => {
            issues.push(FieldIssue::not_a_string(field));
            None
        }
    }
}

/// `GET /` serves the shell and opens a session when needed.
pub async fn index_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let existing = session_from_headers(&headers);
    let session = state.csrf().issue(existing.as_deref());
    let page = Html(render_shell(&session.token));

    if !session.is_new {
        return page.into_response();
    }

    let mut response = page.into_response();
    match HeaderValue::from_str(&session.set_cookie_value()) {
        Ok(cookie) => {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
        Err(err) => warn!("event=session_open module=api status=error error={err}"),
    }
    response
}

pub async fn app_js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}

/// `GET /api/names` lists every record in insertion order.
pub async fn list_names_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<NameRecord>>> {
    let names = state.with_service(|service| service.list_names()).await?;
    info!(
        "event=name_list module=api status=ok count={}",
        names.len()
    );
    Ok(Json(names))
}

/// `POST /api/names` validates and stores one record.
pub async fn create_name_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateNameBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<NameRecord>)> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(
            "event=name_create module=api status=rejected reason=malformed_body http_status={}",
            rejection.status().as_u16()
        );
        ApiError::MalformedBody(rejection.body_text())
    })?;

    let new_name = body.into_new_name().map_err(|err| {
        let fields = err
            .issues()
            .iter()
            .map(|issue| issue.field.as_str())
            .collect::<Vec<_>>()
            .join(",");
        warn!("event=name_create module=api status=rejected reason=validation fields={fields}");
        ApiError::from(err)
    })?;

    let record = state
        .with_service(move |service| service.create_name(&new_name))
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    use super::CreateNameBody;
    use namebook_core::{FieldIssueKind, NameField};
    use serde_json::json;

    fn body(value: serde_json::Value) -> CreateNameBody {
        serde_json::from_value(value).expect("object body")
    }

    #[test]
    fn strings_are_trimmed_into_new_name() {
        let name = body(json!({"first_name": " Ada ", "last_name": "Lovelace"}))
            .into_new_name()
            .expect("valid body");
        assert_eq!(name.first_name(), "Ada");
    }

    #[test]
    fn non_string_value_reports_type_issue_not_required() {
        let err = body(json!({"first_name": 42, "last_name": ""}))
            .into_new_name()
            .expect_err("invalid body");

        let issues = err.issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, NameField::FirstName);
        assert_eq!(issues[0].kind, FieldIssueKind::NotAString);
        assert_eq!(issues[1].field, NameField::LastName);
        assert_eq!(issues[1].kind, FieldIssueKind::Required);
    }

    #[test]
    fn null_and_missing_fields_are_required() {
        let err = body(json!({"first_name": null}))
            .into_new_name()
            .expect_err("invalid body");
        assert!(err.fails(NameField::FirstName));
        assert!(err.fails(NameField::LastName));
    }
}
