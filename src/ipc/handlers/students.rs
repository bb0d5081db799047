use crate::ipc::error::store_err;
use crate::ipc::helpers::{
    optional_str, parse_params, require_session, required_str, respond, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{StudentDraft, Submission};
use serde_json::json;

fn students_list(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let search = optional_str(req, "search")?.unwrap_or_default();
    let students = state.store.search_students(&search);
    Ok(json!({
        "students": students,
        "total": state.store.students().len()
    }))
}

fn students_create(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let draft: StudentDraft = parse_params(req)?;
    let student = state
        .store
        .save_student(Submission::New(draft))
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "student": student }))
}

fn students_update(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let id = required_str(req, "id")?;
    let draft: StudentDraft = parse_params(req)?;
    let student = state
        .store
        .save_student(Submission::Existing { id, draft })
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "student": student }))
}

fn students_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let id = required_str(req, "id")?;
    state
        .store
        .delete_student(&id)
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "deleted": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => students_list(state, req),
        "students.create" => students_create(state, req),
        "students.update" => students_update(state, req),
        "students.delete" => students_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
