//! End-to-end tests for a full operator session
//!
//! These use wiremock for the platform and a scripted channel for the
//! operator, and drive the coordinator from login to delivery.

use crate::common::{config_for, files, messages, ChannelEvent, RecordingAudit, RootLevel, ScriptedChannel};
use course_sweep::crawler::{BatchStatus, RunOutcome};
use course_sweep::{Coordinator, HttpPlatformApi, SweepError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPECTED_TEXT: &str = "\n📁 Intro\n=========\n\n\
    \n  📁 Basics\n  ==========\n\n\
    \x20   🎬 Lecture 1: https://cdn.example.com/lecture.mp4\n\
    \x20   📝 Slides: https://cdn.example.com/slides\n";

struct Session {
    outcome: Result<RunOutcome, SweepError>,
    events: Vec<ChannelEvent>,
    audit: Vec<(String, String)>,
}

async fn run_session(server: &MockServer, replies: &[&str]) -> Session {
    let config = config_for(&server.uri());
    let api = HttpPlatformApi::new(&config.api, &config.client).unwrap();
    let (channel, events): (_, Arc<Mutex<Vec<ChannelEvent>>>) = ScriptedChannel::new(replies);
    let audit = RecordingAudit::default();

    let mut coordinator = Coordinator::new(
        config,
        Box::new(api),
        Box::new(channel),
        Box::new(audit.clone()),
    );
    let outcome = coordinator.run().await;

    let events = events.lock().unwrap().clone();
    let audit = audit.records.lock().unwrap().clone();
    Session {
        outcome,
        events,
        audit,
    }
}

async fn mount_listing(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/app-content-ws/api/v1/getAllPurchasedCourses"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"courseId": 101, "courseTitle": "Polity"},
            {"courseId": 202, "courseTitle": "Economy"}
        ]})))
        .mount(server)
        .await;
}

async fn mount_level(server: &MockServer, version: &str, parent: Option<&str>, body: Value) {
    let tree_path = format!("/app-content-ws/{}/course/getDetails", version);
    let mock = Mock::given(method("GET"))
        .and(path(tree_path.as_str()))
        .and(query_param("courseId", "101"));
    let mock = match parent {
        Some(parent_id) => mock.and(query_param("parentId", parent_id)),
        None => mock.and(RootLevel),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Course 101: Intro → Basics → Lecture 1 with one attachment
async fn mount_intro_course(server: &MockServer, version: &str) {
    mount_level(
        server,
        version,
        None,
        json!({"courseTitle": "Polity", "data": [{"contentId": 10, "name": "Intro"}]}),
    )
    .await;
    mount_level(
        server,
        version,
        Some("10"),
        json!({"data": [{"contentId": "20", "name": "Basics"}]}),
    )
    .await;
    mount_level(
        server,
        version,
        Some("10/20"),
        json!({"data": [{
            "contentId": 30,
            "name": "Lecture 1",
            "videoUrl": "https://cdn.example.com/lecture.mp4"
        }]}),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/api/lesson/data"))
        .and(query_param("lesson_id", "30"))
        .and(query_param("courseId", "101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"options": [
            {"urls": [{"name": "Slides", "url": "https://cdn.example.com/slides"}]}
        ]})))
        .expect(1)
        .mount(server)
        .await;

    // primary had options, so the fallback must stay untouched
    Mock::given(method("GET"))
        .and(path("/app-content-ws/v2/lesson/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(server)
        .await;
}

async fn mount_no_otp_calls(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_session_delivers_manifest() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;
    mount_intro_course(&server, "v1").await;
    mount_no_otp_calls(&server).await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/v2/course/getDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let session = run_session(&server, &["eyJtoken", "101"]).await;

    let RunOutcome::Completed(reports) = session.outcome.unwrap() else {
        panic!("expected a completed run");
    };
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].course_id, "101");
    let BatchStatus::Delivered(summary) = &reports[0].status else {
        panic!("expected a delivered batch");
    };
    assert_eq!(summary.total, 2);
    assert_eq!(summary.folders, 2);
    assert_eq!(summary.other(), 0);

    let delivered = files(&session.events);
    assert_eq!(delivered.len(), 2);

    let (text_name, text, caption) = &delivered[0];
    assert_eq!(text_name, "Polity.txt");
    assert_eq!(text, EXPECTED_TEXT);
    assert!(caption.contains("📚 BATCH: Polity (ID: 101)"));
    assert!(caption.contains("Total Links: 2"));
    assert!(caption.contains("Videos: 1"));
    assert!(caption.contains("Notes: 1"));
    assert!(caption.contains("PDFs: 0"));
    assert!(caption.ends_with("Others: 0"));

    let (json_name, json_body, json_caption) = &delivered[1];
    assert_eq!(json_name, "Polity.json");
    assert_eq!(json_caption, "📦 JSON for: Polity");
    let lines: Vec<String> = serde_json::from_str(json_body).unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "    🎬 Lecture 1: https://cdn.example.com/lecture.mp4");

    let sent = messages(&session.events);
    assert_eq!(sent.first().map(String::as_str), Some("⏳ Extracting: 101"));
    assert_eq!(sent.last().map(String::as_str), Some("✅ DONE"));
    assert!(!sent.iter().any(|m| m.contains("Token:")));

    // both files go out before DONE
    let last_file = session
        .events
        .iter()
        .rposition(|e| matches!(e, ChannelEvent::File { .. }))
        .unwrap();
    let done = session
        .events
        .iter()
        .position(|e| *e == ChannelEvent::Message("✅ DONE".to_string()))
        .unwrap();
    assert!(last_file < done);

    assert_eq!(
        session.audit,
        vec![
            ("credential".to_string(), "eyJtoken".to_string()),
            ("batch".to_string(), "101".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_v2_course_pins_every_level_to_v2() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;
    mount_intro_course(&server, "v2").await;

    // only the course root is ever asked of v1
    Mock::given(method("GET"))
        .and(path("/app-content-ws/v1/course/getDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "message": "use v2"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = run_session(&server, &["eyJtoken", "101"]).await;

    assert!(matches!(session.outcome, Ok(RunOutcome::Completed(_))));
    let delivered = files(&session.events);
    assert_eq!(delivered[0].1, EXPECTED_TEXT);
}

#[tokio::test]
async fn test_rerun_produces_identical_manifest() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/v1/course/getDetails"))
        .and(RootLevel)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"courseTitle": "Polity", "data": [
            {"contentId": 1, "name": "A"},
            {"contentId": 2, "name": "B"}
        ]})))
        .mount(&server)
        .await;
    for topic in ["1", "2"] {
        Mock::given(method("GET"))
            .and(path("/app-content-ws/v1/course/getDetails"))
            .and(query_param("parentId", topic))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"contentId": 7, "name": "Sub"}]})))
            .mount(&server)
            .await;
        let parent = format!("{}/7", topic);
        Mock::given(method("GET"))
            .and(path("/app-content-ws/v1/course/getDetails"))
            .and(query_param("parentId", parent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"contentId": format!("{}1", topic), "name": "Video", "videoUrl": format!("https://x/{}.m3u8", topic)},
                {"contentId": format!("{}2", topic), "name": "Sheet", "videoUrl": format!("https://x/{}.xlsx", topic)}
            ]})))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path_regex(r"/lesson/data$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let first = run_session(&server, &["eyJtoken", "101"]).await;
    let second = run_session(&server, &["eyJtoken", "101"]).await;

    let first_files = files(&first.events);
    let second_files = files(&second.events);
    assert_eq!(first_files.len(), 2);
    assert_eq!(first_files[0].1, second_files[0].1);
    assert_eq!(first_files[1].1, second_files[1].1);
    assert!(first_files[0].2.ends_with("Others: 2"));
}

#[tokio::test]
async fn test_transport_failure_mid_course_aborts_without_delivery() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;
    mount_level(
        &server,
        "v1",
        None,
        json!({"data": [{"contentId": 10, "name": "Intro"}]}),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/v1/course/getDetails"))
        .and(query_param("parentId", "10"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let session = run_session(&server, &["eyJtoken", "101"]).await;

    assert!(matches!(session.outcome, Err(SweepError::Api(_))));
    assert!(files(&session.events).is_empty());
    let sent = messages(&session.events);
    assert!(sent.last().unwrap().starts_with("❌ Error:"));
    assert!(!sent.iter().any(|m| m == "✅ DONE"));
}

#[tokio::test]
async fn test_course_without_data_is_skipped() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;

    for version in ["v1", "v2"] {
        Mock::given(method("GET"))
            .and(path(format!("/app-content-ws/{}/course/getDetails", version).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let session = run_session(&server, &["eyJtoken", "101"]).await;

    let RunOutcome::Completed(reports) = session.outcome.unwrap() else {
        panic!("expected a completed run");
    };
    assert_eq!(reports[0].status, BatchStatus::NoData);
    assert!(files(&session.events).is_empty());
    let sent = messages(&session.events);
    assert!(sent.iter().any(|m| m.starts_with("⚠️ Skipped: 101") && m.contains("No content found")));
    assert_eq!(sent.last().map(String::as_str), Some("✅ DONE"));
}

#[tokio::test]
async fn test_multiple_batches_run_in_order() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;
    mount_intro_course(&server, "v1").await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/v1/course/getDetails"))
        .and(query_param("courseId", "202"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"name": "Empty"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let session = run_session(&server, &["eyJtoken", "101 & 202"]).await;

    let RunOutcome::Completed(reports) = session.outcome.unwrap() else {
        panic!("expected a completed run");
    };
    let ids: Vec<&str> = reports.iter().map(|r| r.course_id.as_str()).collect();
    assert_eq!(ids, vec!["101", "202"]);
    assert!(matches!(reports[0].status, BatchStatus::Delivered(_)));
    assert_eq!(reports[1].status, BatchStatus::Empty);
    assert!(messages(&session.events).contains(&"⚠️ No content found in this batch.".to_string()));
}

#[tokio::test]
async fn test_otp_session_shows_token_and_uses_it() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/web/userlogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"user_id": "u-55"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/web/web_user_login"))
        .and(body_json(json!({"user_id": "u-55", "otp": "4321"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"api_token": "eyJfresh"}})))
        .expect(1)
        .mount(&server)
        .await;
    mount_listing(&server, "eyJfresh").await;
    mount_intro_course(&server, "v1").await;

    let session = run_session(&server, &["9876543210", " 4321 ", "101"]).await;

    assert!(matches!(session.outcome, Ok(RunOutcome::Completed(_))));
    let sent = messages(&session.events);
    assert_eq!(sent[0], "🔑 Token:\neyJfresh");

    let prompts: Vec<&ChannelEvent> = session
        .events
        .iter()
        .filter(|e| matches!(e, ChannelEvent::Prompt(_)))
        .collect();
    assert_eq!(prompts.len(), 3);

    let sources: Vec<&str> = session.audit.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(sources, vec!["credential", "otp", "batch"]);
}

#[tokio::test]
async fn test_otp_rejection_ends_session_before_listing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/web/userlogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"user_id": 55}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/web/web_user_login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Invalid OTP"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let session = run_session(&server, &["9876543210", "0000"]).await;

    assert!(matches!(session.outcome, Ok(RunOutcome::AuthFailed)));
    assert_eq!(
        messages(&session.events),
        vec!["❌ Invalid OTP or login error.".to_string()]
    );
}

#[tokio::test]
async fn test_phone_without_user_id_fails_to_send_otp() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/web/userlogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "unknown number"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/web/web_user_login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let session = run_session(&server, &["9876543210"]).await;

    assert!(matches!(session.outcome, Ok(RunOutcome::AuthFailed)));
    assert_eq!(
        messages(&session.events),
        vec!["❌ Failed to send OTP. Try again.".to_string()]
    );
}

#[tokio::test]
async fn test_invalid_token_lists_no_courses() {
    let server = MockServer::start().await;
    mount_no_otp_calls(&server).await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/api/v1/getAllPurchasedCourses"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "unauthorized"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = run_session(&server, &["eyJexpired"]).await;

    assert!(matches!(session.outcome, Ok(RunOutcome::NoCourses)));
    assert_eq!(
        messages(&session.events),
        vec!["❌ No courses found or token invalid.".to_string()]
    );
}

#[tokio::test]
async fn test_blank_batch_reply_extracts_nothing() {
    let server = MockServer::start().await;
    mount_listing(&server, "eyJtoken").await;

    Mock::given(method("GET"))
        .and(path("/app-content-ws/v1/course/getDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let session = run_session(&server, &["eyJtoken", "  &  "]).await;

    assert_eq!(session.outcome.unwrap(), RunOutcome::Completed(Vec::new()));
    assert_eq!(
        messages(&session.events),
        vec!["⚠️ No batch ID received.".to_string()]
    );
}

#[tokio::test]
async fn test_closed_channel_aborts_run() {
    let server = MockServer::start().await;
    mount_no_otp_calls(&server).await;

    let session = run_session(&server, &[]).await;

    assert!(matches!(session.outcome, Err(SweepError::Auth(_))));
    assert!(files(&session.events).is_empty());
}
