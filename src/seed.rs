use crate::model::{
    default_photo_url, Attendance, AttendanceStatus, Club, Role, StatusMap, Student, User,
};
use crate::store::Store;
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedProfile {
    /// 24 students across four grades.
    Demo,
    /// 168 students split into `<grade> Green` / `<grade> Blue` classes.
    Roster,
    /// Only the administrator account.
    Empty,
}

impl SeedProfile {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Some(Self::Demo),
            "roster" => Some(Self::Roster),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Roster => "roster",
            Self::Empty => "empty",
        }
    }
}

const NAMES: [&str; 24] = [
    "Liam Smith",
    "Olivia Johnson",
    "Noah Williams",
    "Emma Brown",
    "Oliver Jones",
    "Ava Garcia",
    "Elijah Miller",
    "Charlotte Davis",
    "William Rodriguez",
    "Sophia Martinez",
    "James Hernandez",
    "Amelia Lopez",
    "Benjamin Gonzalez",
    "Isabella Wilson",
    "Lucas Anderson",
    "Mia Thomas",
    "Henry Taylor",
    "Evelyn Moore",
    "Alexander Jackson",
    "Harper White",
    "Sebastian Harris",
    "Abigail Martin",
    "Michael Thompson",
    "Emily Garcia",
];

const DEMO_GRADES: [&str; 4] = ["10th", "11th", "9th", "12th"];

const FIRST_NAMES: [&str; 20] = [
    "Mason", "Ethan", "Logan", "Lucas", "Jackson", "Aiden", "Elijah", "James", "Benjamin",
    "Henry", "Zoe", "Lily", "Chloe", "Grace", "Riley", "Nora", "Scarlett", "Mila", "Aubrey",
    "Hannah",
];

const LAST_NAMES: [&str; 20] = [
    "Lee", "Kim", "Patel", "Chen", "Singh", "Wang", "Ali", "Das", "Khan", "Kumar", "Scott",
    "Green", "Adams", "Baker", "Nelson", "Carter", "Mitchell", "Perez", "Roberts", "Turner",
];

const ROSTER_GRADES: [&str; 7] = ["5th", "6th", "7th", "8th", "9th", "10th", "11th"];
const ROSTER_EXTRA: usize = 144;
const ROSTER_CLASS_SIZE: usize = 12;

fn student(n: usize, name: String, grade: String) -> Student {
    let id = format!("s{}", n);
    Student {
        photo_url: default_photo_url(&id),
        student_id: format!("S{:03}", n),
        id,
        name,
        grade,
    }
}

fn demo_students() -> Vec<Student> {
    NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            student(
                i + 1,
                name.to_string(),
                DEMO_GRADES[i % DEMO_GRADES.len()].to_string(),
            )
        })
        .collect()
}

fn roster_students() -> Vec<Student> {
    let mut names: Vec<String> = NAMES.iter().map(|n| n.to_string()).collect();
    names.extend((0..ROSTER_EXTRA).map(|i| {
        format!(
            "{} {}",
            FIRST_NAMES[i % FIRST_NAMES.len()],
            LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()]
        )
    }));

    let grades: Vec<String> = ROSTER_GRADES
        .iter()
        .flat_map(|g| {
            ["Green", "Blue"].into_iter().flat_map(move |colour| {
                std::iter::repeat(format!("{} {}", g, colour)).take(ROSTER_CLASS_SIZE)
            })
        })
        .collect();

    names
        .into_iter()
        .zip(grades)
        .enumerate()
        .map(|(i, (name, grade))| student(i + 1, name, grade))
        .collect()
}

fn club(id: &str, name: &str, advisor: &str, members: &[&str]) -> Club {
    Club {
        id: id.to_string(),
        name: name.to_string(),
        advisor: advisor.to_string(),
        member_ids: members.iter().map(|m| m.to_string()).collect(),
    }
}

fn seed_clubs() -> Vec<Club> {
    vec![
        club("c1", "Debate Club", "Mr. Peterson", &["s1", "s2", "s3", "s4", "s5", "s20"]),
        club("c2", "Science Olympiad", "Ms. Chen", &["s6", "s7", "s8", "s9", "s10", "s21"]),
        club("c3", "Art Club", "Mrs. Diaz", &["s11", "s12", "s13", "s14", "s15", "s22"]),
        club(
            "c4",
            "Coding Club",
            "Mr. Smith",
            &["s16", "s17", "s18", "s19", "s1", "s8", "s23"],
        ),
        club(
            "c5",
            "Literary Magazine",
            "Ms. Rowling",
            &["s20", "s21", "s22", "s23", "s24", "s2", "s12"],
        ),
    ]
}

fn user(id: &str, name: &str, username: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        password: "password".to_string(),
        name: name.to_string(),
        role,
    }
}

fn seed_users() -> Vec<User> {
    vec![
        user("u1", "Admin User", "admin", Role::Admin),
        user("u2", "John Teacher", "teacher1", Role::Teacher),
        user("u3", "Jane Teacher", "teacher2", Role::Teacher),
    ]
}

fn days_ago(today: NaiveDate, n: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

fn attendance(
    id: &str,
    club_id: &str,
    date: NaiveDate,
    marks: &[(&str, AttendanceStatus)],
) -> Attendance {
    Attendance {
        id: id.to_string(),
        club_id: club_id.to_string(),
        date,
        records: marks
            .iter()
            .map(|(s, v)| (s.to_string(), *v))
            .collect::<StatusMap>(),
    }
}

/// The four sample sessions, dated relative to `today`.
fn seed_attendance(today: NaiveDate) -> Vec<Attendance> {
    use AttendanceStatus::{Absent, Late, Present};
    vec![
        attendance(
            "a1",
            "c1",
            days_ago(today, 1),
            &[
                ("s1", Present),
                ("s2", Present),
                ("s3", Absent),
                ("s4", Late),
                ("s5", Present),
                ("s20", Present),
            ],
        ),
        attendance(
            "a2",
            "c2",
            days_ago(today, 1),
            &[
                ("s6", Present),
                ("s7", Present),
                ("s8", Present),
                ("s9", Present),
                ("s10", Present),
                ("s21", Absent),
            ],
        ),
        attendance(
            "a3",
            "c4",
            days_ago(today, 2),
            &[
                ("s16", Present),
                ("s17", Late),
                ("s18", Late),
                ("s19", Present),
                ("s1", Absent),
                ("s8", Present),
                ("s23", Present),
            ],
        ),
        attendance(
            "a4",
            "c1",
            days_ago(today, 8),
            &[
                ("s1", Present),
                ("s2", Absent),
                ("s3", Present),
                ("s4", Present),
                ("s5", Present),
                ("s20", Late),
            ],
        ),
    ]
}

pub fn seed_store(profile: SeedProfile, today: NaiveDate) -> Store {
    match profile {
        SeedProfile::Demo => Store::from_parts(
            demo_students(),
            seed_clubs(),
            seed_attendance(today),
            seed_users(),
        ),
        SeedProfile::Roster => Store::from_parts(
            roster_students(),
            seed_clubs(),
            seed_attendance(today),
            seed_users(),
        ),
        SeedProfile::Empty => Store::from_parts(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![user("u1", "Admin User", "admin", Role::Admin)],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_date;

    fn today() -> NaiveDate {
        parse_date("2026-03-10").expect("date")
    }

    #[test]
    fn demo_seed_matches_sample_data() {
        let store = seed_store(SeedProfile::Demo, today());
        assert_eq!(store.students().len(), 24);
        assert_eq!(store.clubs().len(), 5);
        assert_eq!(store.users().len(), 3);
        let s4 = store.student("s4").expect("s4");
        assert_eq!(s4.name, "Emma Brown");
        assert_eq!(s4.student_id, "S004");
        assert_eq!(s4.grade, "12th");
        assert_eq!(s4.photo_url, "https://picsum.photos/seed/s4/100");

        let dates: Vec<String> = store.attendance().iter().map(|a| a.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-03-09", "2026-03-09", "2026-03-08", "2026-03-02"]);
    }

    #[test]
    fn roster_seed_fills_green_and_blue_classes() {
        let store = seed_store(SeedProfile::Roster, today());
        assert_eq!(store.students().len(), 168);
        assert_eq!(store.student("s1").map(|s| s.grade.as_str()), Some("5th Green"));
        assert_eq!(store.student("s13").map(|s| s.grade.as_str()), Some("5th Blue"));
        assert_eq!(store.student("s168").map(|s| s.grade.as_str()), Some("11th Blue"));
        assert_eq!(store.student("s25").map(|s| s.name.as_str()), Some("Mason Lee"));
        assert_eq!(store.student("s45").map(|s| s.name.as_str()), Some("Mason Kim"));
        assert_eq!(store.student("s168").map(|s| s.student_id.as_str()), Some("S168"));
    }

    #[test]
    fn empty_seed_keeps_an_admin_to_log_in_with() {
        let store = seed_store(SeedProfile::Empty, today());
        assert!(store.students().is_empty());
        assert!(store.authenticate("admin", "password").is_ok());
    }
}
