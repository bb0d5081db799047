use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grade label shown for students with an empty grade.
pub const UNASSIGNED_GRADE: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
}

/// Serialized lowercase; parsed case-insensitively everywhere it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Present => "#10B981",
            Self::Absent => "#EF4444",
            Self::Late => "#F59E0B",
        }
    }

    /// Display rank for the daily list: present, then late, then absent.
    pub fn display_rank(self) -> u8 {
        match self {
            Self::Present => 0,
            Self::Late => 1,
            Self::Absent => 2,
        }
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("unknown attendance status: {:?}", raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub student_id: String,
    pub grade: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub advisor: String,
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub advisor: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[serde(default)]
    pub username: String,
    /// `None` on an existing account keeps the stored password.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Teacher
}

pub type StatusMap = BTreeMap<String, AttendanceStatus>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub club_id: String,
    pub date: NaiveDate,
    pub records: StatusMap,
}

/// A form payload for either a new entity or an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<D> {
    New(D),
    Existing { id: String, draft: D },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeGroup {
    pub grade: String,
    pub students: Vec<Student>,
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn default_photo_url(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/100", seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_mixed_case() {
        assert_eq!(AttendanceStatus::parse("Present"), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::parse(" late "), Some(AttendanceStatus::Late));
        assert_eq!(AttendanceStatus::parse("excused"), None);
    }

    #[test]
    fn status_map_reads_mixed_case_and_writes_lowercase() {
        let map: StatusMap =
            serde_json::from_value(serde_json::json!({ "s1": "Present", "s2": "LATE" }))
                .expect("status map");
        assert_eq!(map.get("s1"), Some(&AttendanceStatus::Present));
        assert_eq!(map.get("s2"), Some(&AttendanceStatus::Late));
        assert_eq!(
            serde_json::to_value(&map).expect("serialize"),
            serde_json::json!({ "s1": "present", "s2": "late" })
        );
        let unknown = serde_json::from_value::<StatusMap>(serde_json::json!({ "s1": "excused" }));
        assert!(unknown.is_err());
    }

    #[test]
    fn user_password_is_never_serialized() {
        let u = User {
            id: "u1".to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            name: "Admin User".to_string(),
            role: Role::Admin,
        };
        let v = serde_json::to_value(&u).expect("serialize user");
        assert!(v.get("password").is_none());
        assert_eq!(v["role"], "admin");
    }

    #[test]
    fn attendance_date_serializes_as_iso_day() {
        let a = Attendance {
            id: "a1".to_string(),
            club_id: "c1".to_string(),
            date: parse_date("2026-03-07").expect("date"),
            records: StatusMap::from([("s1".to_string(), AttendanceStatus::Late)]),
        };
        let v = serde_json::to_value(&a).expect("serialize");
        assert_eq!(v["date"], "2026-03-07");
        assert_eq!(v["clubId"], "c1");
        assert_eq!(v["records"]["s1"], "late");
    }
}
