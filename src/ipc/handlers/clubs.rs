use crate::ipc::error::store_err;
use crate::ipc::helpers::{
    optional_str, parse_params, require_admin, require_session, required_str, respond,
    HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{ClubDraft, Submission};
use serde_json::json;

fn clubs_list(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let search = optional_str(req, "search")?.unwrap_or_default();
    let clubs = state.store.search_clubs(&search);
    Ok(json!({
        "clubs": clubs,
        "total": state.store.clubs().len()
    }))
}

fn clubs_members(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let club_id = required_str(req, "clubId")?;
    let students = state
        .store
        .club_members(&club_id)
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "clubId": club_id, "students": students }))
}

fn clubs_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let draft: ClubDraft = parse_params(req)?;
    let club = state
        .store
        .save_club(Submission::New(draft))
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "club": club }))
}

fn clubs_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let id = required_str(req, "id")?;
    let draft: ClubDraft = parse_params(req)?;
    let club = state
        .store
        .save_club(Submission::Existing { id, draft })
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "club": club }))
}

fn clubs_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_admin(state, req)?;
    let id = required_str(req, "id")?;
    let removed = state
        .store
        .delete_club(&id)
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "deleted": id, "attendanceRemoved": removed }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "clubs.list" => clubs_list(state, req),
        "clubs.members" => clubs_members(state, req),
        "clubs.create" => clubs_create(state, req),
        "clubs.update" => clubs_update(state, req),
        "clubs.delete" => clubs_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
