use crate::error::{StoreError, StoreResult};
use crate::model::{
    default_photo_url, Attendance, AttendanceStatus, Club, ClubDraft, GradeGroup, StatusMap,
    Student, StudentDraft, Submission, User, UserDraft, UNASSIGNED_GRADE,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

fn new_id(prefix: char) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

/// Read-only view of every collection at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub students: Arc<Vec<Student>>,
    pub clubs: Arc<Vec<Club>>,
    pub attendance: Arc<Vec<Attendance>>,
    pub users: Arc<Vec<User>>,
}

/// Owner of the four ClubTrack collections.
///
/// Mutations never edit a collection in place: each one builds the next
/// version of every collection it touches and swaps them in together, so a
/// [`Snapshot`] taken earlier keeps seeing the old state.
#[derive(Debug, Clone, Default)]
pub struct Store {
    students: Arc<Vec<Student>>,
    clubs: Arc<Vec<Club>>,
    attendance: Arc<Vec<Attendance>>,
    users: Arc<Vec<User>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    pub club_id: String,
    pub date: NaiveDate,
    /// Id of the saved record, if the (club, date) pair has one.
    pub attendance_id: Option<String>,
    pub records: StatusMap,
}

impl Store {
    pub fn from_parts(
        students: Vec<Student>,
        clubs: Vec<Club>,
        attendance: Vec<Attendance>,
        users: Vec<User>,
    ) -> Self {
        Self {
            students: Arc::new(students),
            clubs: Arc::new(clubs),
            attendance: Arc::new(attendance),
            users: Arc::new(users),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            students: Arc::clone(&self.students),
            clubs: Arc::clone(&self.clubs),
            attendance: Arc::clone(&self.attendance),
            users: Arc::clone(&self.users),
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn attendance(&self) -> &[Attendance] {
        &self.attendance
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn club(&self, id: &str) -> Option<&Club> {
        self.clubs.iter().find(|c| c.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> StoreResult<User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned()
            .ok_or(StoreError::InvalidCredentials)
    }

    pub fn save_user(&mut self, submission: Submission<UserDraft>) -> StoreResult<User> {
        let (existing_id, draft) = match submission {
            Submission::New(d) => (None, d),
            Submission::Existing { id, draft } => (Some(id), draft),
        };
        let name = draft.name.trim().to_string();
        let username = draft.username.trim().to_string();
        let password = draft.password.filter(|p| !p.is_empty());
        if name.is_empty() {
            return Err(StoreError::validation("name must not be empty"));
        }
        if username.is_empty() {
            return Err(StoreError::validation("username must not be empty"));
        }
        if self
            .users
            .iter()
            .any(|u| u.username == username && Some(&u.id) != existing_id.as_ref())
        {
            return Err(StoreError::validation(format!(
                "username already taken: {}",
                username
            )));
        }

        let mut next = self.users.as_ref().clone();
        let saved = match existing_id {
            None => {
                let Some(password) = password else {
                    return Err(StoreError::validation("password is required for new users"));
                };
                let user = User {
                    id: new_id('u'),
                    username,
                    password,
                    name,
                    role: draft.role,
                };
                next.push(user.clone());
                info!(user_id = %user.id, role = ?user.role, "user created");
                user
            }
            Some(id) => {
                let Some(slot) = next.iter_mut().find(|u| u.id == id) else {
                    return Err(StoreError::not_found("user", &id));
                };
                slot.username = username;
                slot.name = name;
                slot.role = draft.role;
                if let Some(p) = password {
                    slot.password = p;
                }
                info!(user_id = %slot.id, "user updated");
                slot.clone()
            }
        };
        self.users = Arc::new(next);
        Ok(saved)
    }

    pub fn delete_user(&mut self, id: &str) -> StoreResult<()> {
        if self.user(id).is_none() {
            return Err(StoreError::not_found("user", id));
        }
        let next: Vec<User> = self.users.iter().filter(|u| u.id != id).cloned().collect();
        self.users = Arc::new(next);
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Case-insensitive substring match on the student name; empty query lists everyone.
    pub fn search_students(&self, query: &str) -> Vec<Student> {
        let q = query.trim().to_lowercase();
        self.students
            .iter()
            .filter(|s| q.is_empty() || s.name.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    pub fn save_student(&mut self, submission: Submission<StudentDraft>) -> StoreResult<Student> {
        let (existing_id, draft) = match submission {
            Submission::New(d) => (None, d),
            Submission::Existing { id, draft } => (Some(id), draft),
        };
        let name = draft.name.trim().to_string();
        let student_id = draft.student_id.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::validation("name must not be empty"));
        }
        if student_id.is_empty() {
            return Err(StoreError::validation("studentId must not be empty"));
        }
        if draft.grade.trim().is_empty() {
            return Err(StoreError::validation("grade must not be empty"));
        }
        let grade = stored_grade(&draft.grade);
        if self
            .students
            .iter()
            .any(|s| s.student_id == student_id && Some(&s.id) != existing_id.as_ref())
        {
            return Err(StoreError::validation(format!(
                "studentId already in use: {}",
                student_id
            )));
        }

        let mut next = self.students.as_ref().clone();
        let saved = match existing_id {
            None => {
                let id = new_id('s');
                let photo_url = photo_or_default(&draft.photo_url, &student_id, &id);
                let student = Student {
                    id,
                    name,
                    student_id,
                    grade,
                    photo_url,
                };
                next.push(student.clone());
                info!(student_id = %student.id, "student created");
                student
            }
            Some(id) => {
                let Some(slot) = next.iter_mut().find(|s| s.id == id) else {
                    return Err(StoreError::not_found("student", &id));
                };
                slot.photo_url = photo_or_default(&draft.photo_url, &student_id, &slot.id);
                slot.name = name;
                slot.student_id = student_id;
                slot.grade = grade;
                info!(student_id = %slot.id, "student updated");
                slot.clone()
            }
        };
        self.students = Arc::new(next);
        Ok(saved)
    }

    /// Removes the student and drops it from every club roster.
    pub fn delete_student(&mut self, id: &str) -> StoreResult<()> {
        if self.student(id).is_none() {
            return Err(StoreError::not_found("student", id));
        }
        let students: Vec<Student> = self
            .students
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        let clubs: Vec<Club> = self
            .clubs
            .iter()
            .map(|c| Club {
                member_ids: c.member_ids.iter().filter(|m| *m != id).cloned().collect(),
                ..c.clone()
            })
            .collect();

        self.students = Arc::new(students);
        self.clubs = Arc::new(clubs);
        info!(student_id = %id, "student deleted");
        Ok(())
    }

    /// Sets `grade` on every listed student. Unknown ids are skipped; the
    /// `Unassigned` label clears the grade. Returns how many students changed.
    pub fn reassign_grade(&mut self, student_ids: &[String], grade: &str) -> StoreResult<usize> {
        if student_ids.is_empty() {
            return Err(StoreError::validation("select at least one student"));
        }
        let target = stored_grade(grade);
        let wanted: HashSet<&str> = student_ids.iter().map(|s| s.as_str()).collect();
        let mut moved = 0usize;
        let next: Vec<Student> = self
            .students
            .iter()
            .map(|s| {
                if wanted.contains(s.id.as_str()) {
                    moved += 1;
                    Student {
                        grade: target.clone(),
                        ..s.clone()
                    }
                } else {
                    s.clone()
                }
            })
            .collect();
        self.students = Arc::new(next);
        info!(count = moved, grade = %target, "students reassigned");
        Ok(moved)
    }

    /// Students grouped by grade label. The `Unassigned` group is always
    /// first (possibly empty); the others follow in case-insensitive label order.
    pub fn grade_groups(&self) -> Vec<GradeGroup> {
        let mut groups: HashMap<&str, Vec<Student>> = HashMap::new();
        let mut unassigned = Vec::new();
        for s in self.students.iter() {
            if s.grade.is_empty() {
                unassigned.push(s.clone());
            } else {
                groups.entry(s.grade.as_str()).or_default().push(s.clone());
            }
        }
        let mut out = vec![GradeGroup {
            grade: UNASSIGNED_GRADE.to_string(),
            students: unassigned,
        }];
        let mut graded: Vec<(&str, Vec<Student>)> = groups.into_iter().collect();
        graded.sort_by(|a, b| grade_order(a.0, b.0));
        out.extend(graded.into_iter().map(|(grade, students)| GradeGroup {
            grade: grade.to_string(),
            students,
        }));
        out
    }

    /// Target labels for reassignment: `Unassigned` then every distinct grade.
    pub fn grade_options(&self) -> Vec<String> {
        let mut distinct: Vec<&str> = self
            .students
            .iter()
            .map(|s| s.grade.as_str())
            .filter(|g| !g.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        distinct.sort_by(|a, b| grade_order(a, b));
        std::iter::once(UNASSIGNED_GRADE)
            .chain(distinct)
            .map(|g| g.to_string())
            .collect()
    }

    pub fn search_clubs(&self, query: &str) -> Vec<Club> {
        let q = query.trim().to_lowercase();
        self.clubs
            .iter()
            .filter(|c| q.is_empty() || c.name.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    pub fn save_club(&mut self, submission: Submission<ClubDraft>) -> StoreResult<Club> {
        let (existing_id, draft) = match submission {
            Submission::New(d) => (None, d),
            Submission::Existing { id, draft } => (Some(id), draft),
        };
        let name = draft.name.trim().to_string();
        let advisor = draft.advisor.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::validation("name must not be empty"));
        }
        if advisor.is_empty() {
            return Err(StoreError::validation("advisor must not be empty"));
        }
        let mut seen = HashSet::new();
        let member_ids: Vec<String> = draft
            .member_ids
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty() && seen.insert(m.clone()))
            .collect();

        let mut next = self.clubs.as_ref().clone();
        let saved = match existing_id {
            None => {
                let club = Club {
                    id: new_id('c'),
                    name,
                    advisor,
                    member_ids,
                };
                next.push(club.clone());
                info!(club_id = %club.id, members = club.member_ids.len(), "club created");
                club
            }
            Some(id) => {
                let Some(slot) = next.iter_mut().find(|c| c.id == id) else {
                    return Err(StoreError::not_found("club", &id));
                };
                slot.name = name;
                slot.advisor = advisor;
                slot.member_ids = member_ids;
                info!(club_id = %slot.id, members = slot.member_ids.len(), "club updated");
                slot.clone()
            }
        };
        self.clubs = Arc::new(next);
        Ok(saved)
    }

    /// Removes the club together with every attendance record that references it.
    pub fn delete_club(&mut self, id: &str) -> StoreResult<usize> {
        if self.club(id).is_none() {
            return Err(StoreError::not_found("club", id));
        }
        let clubs: Vec<Club> = self.clubs.iter().filter(|c| c.id != id).cloned().collect();
        let attendance: Vec<Attendance> = self
            .attendance
            .iter()
            .filter(|a| a.club_id != id)
            .cloned()
            .collect();
        let removed = self.attendance.len() - attendance.len();

        self.clubs = Arc::new(clubs);
        self.attendance = Arc::new(attendance);
        info!(club_id = %id, attendance_removed = removed, "club deleted");
        Ok(removed)
    }

    /// Roster students who belong to the club, in roster order. Member ids
    /// that no longer resolve are skipped.
    pub fn club_members(&self, club_id: &str) -> StoreResult<Vec<Student>> {
        let club = self
            .club(club_id)
            .ok_or_else(|| StoreError::not_found("club", club_id))?;
        let members: HashSet<&str> = club.member_ids.iter().map(|m| m.as_str()).collect();
        Ok(self
            .students
            .iter()
            .filter(|s| members.contains(s.id.as_str()))
            .cloned()
            .collect())
    }

    pub fn attendance_for_club(&self, club_id: Option<&str>) -> Vec<Attendance> {
        self.attendance
            .iter()
            .filter(|a| club_id.map(|c| a.club_id == c).unwrap_or(true))
            .cloned()
            .collect()
    }

    /// The marks to edit for a (club, date) pair: the saved record if there is
    /// one, otherwise every current member marked absent.
    pub fn attendance_sheet(&self, club_id: &str, date: NaiveDate) -> StoreResult<AttendanceSheet> {
        if let Some(existing) = self
            .attendance
            .iter()
            .find(|a| a.club_id == club_id && a.date == date)
        {
            return Ok(AttendanceSheet {
                club_id: club_id.to_string(),
                date,
                attendance_id: Some(existing.id.clone()),
                records: existing.records.clone(),
            });
        }
        let records: StatusMap = self
            .club_members(club_id)?
            .into_iter()
            .map(|s| (s.id, AttendanceStatus::Absent))
            .collect();
        Ok(AttendanceSheet {
            club_id: club_id.to_string(),
            date,
            attendance_id: None,
            records,
        })
    }

    /// Inserts the record for (club, date) or replaces the marks of the one
    /// already saved, keeping its id.
    pub fn save_attendance(
        &mut self,
        club_id: &str,
        date: NaiveDate,
        records: StatusMap,
    ) -> StoreResult<Attendance> {
        let club_id = club_id.trim();
        if club_id.is_empty() {
            return Err(StoreError::validation("please select a club"));
        }
        if self.club(club_id).is_none() {
            return Err(StoreError::not_found("club", club_id));
        }

        let mut next = self.attendance.as_ref().clone();
        let saved = match next
            .iter_mut()
            .find(|a| a.club_id == club_id && a.date == date)
        {
            Some(slot) => {
                slot.records = records;
                info!(attendance_id = %slot.id, club_id, %date, "attendance replaced");
                slot.clone()
            }
            None => {
                let att = Attendance {
                    id: new_id('a'),
                    club_id: club_id.to_string(),
                    date,
                    records,
                };
                next.push(att.clone());
                info!(attendance_id = %att.id, club_id, %date, "attendance recorded");
                att
            }
        };
        self.attendance = Arc::new(next);
        Ok(saved)
    }
}

/// Grades are stored trimmed; the `Unassigned` label is stored as the empty grade.
fn stored_grade(label: &str) -> String {
    match label.trim() {
        UNASSIGNED_GRADE => String::new(),
        g => g.to_string(),
    }
}

/// Case-insensitive label order, with the raw label breaking ties.
fn grade_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Photo default policy: a blank url becomes a placeholder seeded by the
/// student number, or by the entity id when the number is blank too.
fn photo_or_default(photo_url: &str, student_id: &str, id: &str) -> String {
    let trimmed = photo_url.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    if student_id.is_empty() {
        default_photo_url(id)
    } else {
        default_photo_url(student_id)
    }
}
