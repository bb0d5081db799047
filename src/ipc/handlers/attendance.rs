use crate::ipc::error::{err, store_err};
use crate::ipc::helpers::{
    date_or_today, optional_str, require_session, required_str, respond, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::StatusMap;
use serde_json::json;

fn parse_status_map(req: &Request) -> Result<StatusMap, serde_json::Value> {
    let Some(raw) = req.params.get("records") else {
        return Err(err(&req.id, "bad_params", "missing records", None));
    };
    serde_json::from_value::<StatusMap>(raw.clone()).map_err(|e| {
        err(
            &req.id,
            "bad_params",
            "records must map student ids to present, absent or late",
            Some(json!({ "reason": e.to_string() })),
        )
    })
}

fn attendance_open(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let club_id = required_str(req, "clubId")?;
    let date = date_or_today(state, req, "date")?;
    let members = state
        .store
        .club_members(&club_id)
        .map_err(|e| store_err(&req.id, e))?;
    let sheet = state
        .store
        .attendance_sheet(&club_id, date)
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "sheet": sheet, "members": members }))
}

fn attendance_save(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let club_id = required_str(req, "clubId")?;
    let date = date_or_today(state, req, "date")?;
    let records = parse_status_map(req)?;
    let saved = state
        .store
        .save_attendance(&club_id, date, records)
        .map_err(|e| store_err(&req.id, e))?;
    Ok(json!({ "attendance": saved }))
}

fn attendance_list(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let club_id = optional_str(req, "clubId")?;
    Ok(json!({
        "attendance": state.store.attendance_for_club(club_id.as_deref())
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.open" => attendance_open(state, req),
        "attendance.save" => attendance_save(state, req),
        "attendance.list" => attendance_list(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
