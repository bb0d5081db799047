use crate::calc::{self, Window};
use crate::ipc::error::err;
use crate::ipc::helpers::{
    date_or_today, optional_str, require_session, required_str, respond, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceStatus, Student};
use crate::store::Snapshot;
use chrono::NaiveDate;
use serde_json::json;
use std::collections::HashMap;

fn parse_window(req: &Request) -> Result<Window, serde_json::Value> {
    match optional_str(req, "window")? {
        None => Ok(Window::Weekly),
        Some(raw) => Window::parse(&raw).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                "window must be weekly or monthly",
                Some(json!({ "value": raw })),
            )
        }),
    }
}

fn counts_value(snap: &Snapshot, today: NaiveDate, window: Window) -> serde_json::Value {
    json!({
        "window": window,
        "cutoff": calc::cutoff_date(today, window).to_string(),
        "counts": calc::windowed_counts(&snap.attendance, today, window)
    })
}

/// Resolved daily statuses joined with their students. Ids that no longer
/// resolve to a student are left out.
fn day_entries(snap: &Snapshot, date: NaiveDate) -> Vec<serde_json::Value> {
    let by_id: HashMap<&str, &Student> = snap
        .students
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();
    calc::day_statuses(&snap.attendance, date)
        .into_iter()
        .filter_map(|r| {
            let student = by_id.get(r.student_id.as_str())?;
            Some(json!({ "student": student, "status": r.status }))
        })
        .collect()
}

fn dashboard_counts(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let window = parse_window(req)?;
    let today = state.today();
    Ok(counts_value(&state.store.snapshot(), today, window))
}

fn dashboard_drilldown(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let window = parse_window(req)?;
    let raw_status = required_str(req, "status")?;
    let Some(status) = AttendanceStatus::parse(&raw_status) else {
        return Err(err(
            &req.id,
            "bad_params",
            "status must be present, absent or late",
            Some(json!({ "value": raw_status })),
        ));
    };
    let today = state.today();
    let snap = state.store.snapshot();
    let ids = calc::drilldown_student_ids(&snap.attendance, today, window, status);
    let students: Vec<&Student> = snap
        .students
        .iter()
        .filter(|s| ids.contains(&s.id))
        .collect();
    Ok(json!({
        "title": format!("{} Students ({})", status.label(), window.as_str()),
        "status": status,
        "window": window,
        "students": students
    }))
}

fn dashboard_today(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let date = date_or_today(state, req, "date")?;
    let snap = state.store.snapshot();
    Ok(json!({
        "date": date.to_string(),
        "entries": day_entries(&snap, date)
    }))
}

fn dashboard_summary(state: &mut AppState, req: &Request) -> HandlerResult {
    require_session(state, req)?;
    let window = parse_window(req)?;
    let today = state.today();
    let snap = state.store.snapshot();
    Ok(json!({
        "totalStudents": snap.students.len(),
        "totalClubs": snap.clubs.len(),
        "chart": counts_value(&snap, today, window),
        "today": {
            "date": today.to_string(),
            "entries": day_entries(&snap, today)
        }
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "dashboard.counts" => dashboard_counts(state, req),
        "dashboard.drilldown" => dashboard_drilldown(state, req),
        "dashboard.today" => dashboard_today(state, req),
        "dashboard.summary" => dashboard_summary(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
