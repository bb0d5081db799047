use crate::ipc::error::store_err;
use crate::ipc::helpers::{require_session, required_str, respond, string_list, HandlerResult};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn classes_groups(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    Ok(json!({ "groups": state.store.grade_groups() }))
}

fn classes_grades(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    Ok(json!({ "grades": state.store.grade_options() }))
}

fn classes_assign(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let student_ids = string_list(req, "studentIds")?;
    let grade = required_str(req, "grade")?;
    let moved = state
        .store
        .reassign_grade(&student_ids, &grade)
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "moved": moved }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "classes.groups" => classes_groups(state, req),
        "classes.grades" => classes_grades(state, req),
        "classes.assign" => classes_assign(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
