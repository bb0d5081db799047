use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{parse_date, Role, User};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Handler outcome: the result payload, or a ready-made error envelope.
pub type HandlerResult = Result<serde_json::Value, serde_json::Value>;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Result<Option<String>, serde_json::Value> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| err(&req.id, "bad_params", format!("{} must be a string", key), None)),
    }
}

/// Reads a `YYYY-MM-DD` param, falling back to the state's current day.
pub fn date_or_today(
    state: &AppState,
    req: &Request,
    key: &str,
) -> Result<NaiveDate, serde_json::Value> {
    match optional_str(req, key)? {
        None => Ok(state.today()),
        Some(raw) => parse_date(&raw).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("{} must be YYYY-MM-DD", key),
                Some(serde_json::json!({ "value": raw })),
            )
        }),
    }
}

pub fn string_list(req: &Request, key: &str) -> Result<Vec<String>, serde_json::Value> {
    let Some(raw) = req.params.get(key).and_then(|v| v.as_array()) else {
        return Err(err(&req.id, "bad_params", format!("missing {}", key), None));
    };
    raw.iter()
        .map(|v| {
            v.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                err(
                    &req.id,
                    "bad_params",
                    format!("{} must contain only strings", key),
                    None,
                )
            })
        })
        .collect()
}

pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    serde_json::from_value(req.params.clone())
        .map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}

pub fn require_session<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a User, serde_json::Value> {
    state
        .session
        .as_ref()
        .ok_or_else(|| err(&req.id, "not_authenticated", "log in first", None))
}

pub fn require_admin<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a User, serde_json::Value> {
    let user = require_session(state, req)?;
    if user.role != Role::Admin {
        return Err(err(
            &req.id,
            "forbidden",
            "administrator role required",
            Some(serde_json::json!({ "method": req.method })),
        ));
    }
    Ok(user)
}

pub fn respond(req: &Request, result: HandlerResult) -> serde_json::Value {
    match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}
