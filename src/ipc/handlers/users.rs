use crate::ipc::error::store_err;
use crate::ipc::helpers::{parse_params, require_admin, required_str, respond, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::model::{Submission, UserDraft};
use serde_json::json;

fn users_list(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    Ok(json!({ "users": state.store.users() }))
}

fn users_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let draft: UserDraft = parse_params(req)?;
    let user = state
        .store
        .save_user(Submission::New(draft))
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "user": user }))
}

fn users_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let id = required_str(req, "id")?;
    let draft: UserDraft = parse_params(req)?;
    let user = state
        .store
        .save_user(Submission::Existing { id, draft })
        .map_err(|e| store_err(&req.id, e))?;
    // Keep the signed-in copy in step with edits to one's own account.
    if state.session.as_ref().map(|s| s.id == user.id).unwrap_or(false) {
        state.session = Some(user.clone());
    }
    Ok(json!({ "user": user }))
}

fn users_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let id = required_str(req, "id")?;
    state
        .store
        .delete_user(&id)
        .map_err(|e| store_err(&req.id, e))?;
    if state.session.as_ref().map(|s| s.id == id).unwrap_or(false) {
        state.session = None;
    }
    Ok(json!({ "deleted": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "users.list" => users_list(state, req),
        "users.create" => users_create(state, req),
        "users.update" => users_update(state, req),
        "users.delete" => users_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
