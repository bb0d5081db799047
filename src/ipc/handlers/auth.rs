use crate::ipc::error::store_err;
use crate::ipc::helpers::{required_str, respond, HandlerResult};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use tracing::{info, warn};

fn auth_login(state: &mut AppState, req: &Request) -> HandlerResult {
    let username = required_str(req, "username")?;
    let password = required_str(req, "password")?;
    match state.store.authenticate(&username, &password) {
        Ok(user) => {
            info!(user_id = %user.id, role = ?user.role, "login succeeded");
            state.session = Some(user.clone());
            Ok(json!({ "user": user }))
        }
        Err(e) => {
            warn!(%username, "login failed");
            Err(store_err(&req.id, e))
        }
    }
}

fn auth_logout(state: &mut AppState, _req: &Request) -> HandlerResult {
    if let Some(user) = state.session.take() {
        info!(user_id = %user.id, "logged out");
    }
    Ok(json!({ "signedIn": false }))
}

fn auth_session(state: &mut AppState, _req: &Request) -> HandlerResult {
    Ok(json!({ "user": state.session }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "auth.login" => auth_login(state, req),
        "auth.logout" => auth_logout(state, req),
        "auth.session" => auth_session(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
