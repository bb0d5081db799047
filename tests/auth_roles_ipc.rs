use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_clubtrackd");
    let mut child = Command::new(exe)
        .env("CLUBTRACK_SEED", "demo")
        .env("CLUBTRACK_TODAY", "2026-03-10")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn clubtrackd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn login_rejects_wrong_password_and_gates_methods() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let before = request(&mut stdin, &mut reader, "1", "students.list", json!({}));
    assert_eq!(error_code(&before), "not_authenticated");

    let bad = request(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "admin", "password": "wrong" }),
    );
    assert_eq!(error_code(&bad), "invalid_credentials");
    assert_eq!(
        bad["error"]["message"].as_str(),
        Some("Invalid username or password.")
    );

    let ok = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "auth.login",
        json!({ "username": "admin", "password": "password" }),
    );
    assert_eq!(ok["user"]["role"], "admin");
    assert!(ok["user"].get("password").is_none());

    let session = request_ok(&mut stdin, &mut reader, "4", "auth.session", json!({}));
    assert_eq!(session["user"]["username"], "admin");

    let _ = request_ok(&mut stdin, &mut reader, "5", "auth.logout", json!({}));
    let after = request(&mut stdin, &mut reader, "6", "clubs.list", json!({}));
    assert_eq!(error_code(&after), "not_authenticated");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn teacher_cannot_manage_users_or_delete_clubs() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "username": "teacher1", "password": "password" }),
    );

    let users = request(&mut stdin, &mut reader, "2", "users.list", json!({}));
    assert_eq!(error_code(&users), "forbidden");

    let del = request(&mut stdin, &mut reader, "3", "clubs.delete", json!({ "id": "c1" }));
    assert_eq!(error_code(&del), "forbidden");

    // Teachers still edit clubs and take attendance.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "clubs.update",
        json!({
            "id": "c1",
            "name": "Debate Society",
            "advisor": "Mr. Peterson",
            "memberIds": ["s1"],
        }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "attendance.save",
        json!({ "clubId": "c1", "date": "2026-03-10", "records": { "s1": "present" } }),
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn admin_manages_accounts_and_password_survives_blank_edit() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "username": "admin", "password": "password" }),
    );

    let missing_pw = request(
        &mut stdin,
        &mut reader,
        "2",
        "users.create",
        json!({ "username": "coach", "name": "Coach Carter", "role": "teacher" }),
    );
    assert_eq!(error_code(&missing_pw), "bad_params");

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "users.create",
        json!({
            "username": "coach",
            "password": "whistle",
            "name": "Coach Carter",
            "role": "teacher",
        }),
    );
    let user_id = created["user"]["id"].as_str().expect("user id").to_string();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "users.update",
        json!({ "id": user_id, "username": "coach", "name": "Coach K", "role": "admin" }),
    );
    let listed = request_ok(&mut stdin, &mut reader, "5", "users.list", json!({}));
    let users = listed["users"].as_array().cloned().unwrap_or_default();
    assert_eq!(users.len(), 4);
    assert!(users.iter().all(|u| u.get("password").is_none()));

    let _ = request_ok(&mut stdin, &mut reader, "6", "auth.logout", json!({}));
    let relogin = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "auth.login",
        json!({ "username": "coach", "password": "whistle" }),
    );
    assert_eq!(relogin["user"]["name"], "Coach K");
    assert_eq!(relogin["user"]["role"], "admin");

    let _ = request_ok(&mut stdin, &mut reader, "8", "users.delete", json!({ "id": "u3" }));
    let gone = request(&mut stdin, &mut reader, "9", "users.delete", json!({ "id": "u3" }));
    assert_eq!(error_code(&gone), "not_found");

    drop(stdin);
    let _ = child.wait();
}
