use crate::model::{Attendance, AttendanceStatus};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Weekly,
    Monthly,
}

impl Window {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn days(self) -> u64 {
        match self {
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }
}

/// First calendar day included in `window` when counting back from `today`.
pub fn cutoff_date(today: NaiveDate, window: Window) -> NaiveDate {
    today
        .checked_sub_days(Days::new(window.days()))
        .unwrap_or(NaiveDate::MIN)
}

/// Lower bound only: records dated after `today` still count.
fn in_window<'a>(
    records: &'a [Attendance],
    today: NaiveDate,
    window: Window,
) -> impl Iterator<Item = &'a Attendance> {
    let cutoff = cutoff_date(today, window);
    records.iter().filter(move |a| a.date >= cutoff)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: AttendanceStatus,
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
}

/// Per-status tallies over every status mark in the window. Always three
/// entries, ordered Present, Absent, Late. A student marked in two clubs on
/// the same day is counted twice.
pub fn windowed_counts(
    records: &[Attendance],
    today: NaiveDate,
    window: Window,
) -> Vec<StatusCount> {
    let mut present = 0usize;
    let mut absent = 0usize;
    let mut late = 0usize;
    for att in in_window(records, today, window) {
        for status in att.records.values() {
            match status {
                AttendanceStatus::Present => present += 1,
                AttendanceStatus::Absent => absent += 1,
                AttendanceStatus::Late => late += 1,
            }
        }
    }

    AttendanceStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            label: status.label(),
            count: match status {
                AttendanceStatus::Present => present,
                AttendanceStatus::Absent => absent,
                AttendanceStatus::Late => late,
            },
            color: status.color(),
        })
        .collect()
}

/// Distinct student ids with at least one `status` mark in the window.
pub fn drilldown_student_ids(
    records: &[Attendance],
    today: NaiveDate,
    window: Window,
    status: AttendanceStatus,
) -> BTreeSet<String> {
    in_window(records, today, window)
        .flat_map(|att| att.records.iter())
        .filter(|(_, s)| **s == status)
        .map(|(student_id, _)| student_id.clone())
        .collect()
}

/// Merge rule for a student seen in several clubs on one day.
/// Present always wins, late beats absent, the first observation seeds.
pub fn resolve_status(
    current: Option<AttendanceStatus>,
    observed: AttendanceStatus,
) -> AttendanceStatus {
    match (current, observed) {
        (None, v) => v,
        (Some(_), AttendanceStatus::Present) => AttendanceStatus::Present,
        (Some(AttendanceStatus::Absent), AttendanceStatus::Late) => AttendanceStatus::Late,
        (Some(r), _) => r,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStatus {
    pub student_id: String,
    pub status: AttendanceStatus,
}

/// One status per student marked on `date`, sorted present, late, absent and
/// then by student id.
pub fn day_statuses(records: &[Attendance], date: NaiveDate) -> Vec<ResolvedStatus> {
    let mut resolved: BTreeMap<&str, AttendanceStatus> = BTreeMap::new();
    for att in records.iter().filter(|a| a.date == date) {
        for (student_id, status) in &att.records {
            let next = resolve_status(resolved.get(student_id.as_str()).copied(), *status);
            resolved.insert(student_id.as_str(), next);
        }
    }

    let mut out: Vec<ResolvedStatus> = resolved
        .into_iter()
        .map(|(student_id, status)| ResolvedStatus {
            student_id: student_id.to_string(),
            status,
        })
        .collect();
    // BTreeMap iteration already ordered by id; the sort is stable.
    out.sort_by_key(|r| r.status.display_rank());
    out
}
