mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

async fn seed_instance(app: &TestApp, tid: &str, sid: &str) -> String {
    let res = app.post_json(
        &format!("/api/v1/{}/sessions/{}/instances/generate", tid, sid),
        json!({
            "instance_type": "presentiel",
            "payload": {"location_address": "1 rue Centrale", "location_city": "Nantes"},
            "recurrence": {"has_recurrence": false, "start_date": "2024-05-21"}
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["instances"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_cancel_marks_instance_without_deleting_it() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("cancel-happy").await;
    let sid = app.seed_session(&tid, &slug, "Cohort").await;
    let iid = seed_instance(&app, &tid, &sid).await;

    let res = app.post_json(
        &format!("/api/v1/{}/instances/{}/cancel", tid, iid),
        json!({"reason": "Trainer unavailable"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["is_cancelled"], true);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["cancellation_reason"], "Trainer unavailable");

    // Cancellation is a soft state: the instance stays retrievable and
    // listed.
    let res = app.get(&format!("/api/v1/{}/instances/{}", tid, iid)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "cancelled");

    let res = app.get(&format!("/api/v1/{}/sessions/{}/instances", tid, sid)).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);

    // A cancellation notification job was queued for the worker.
    let res = app.get(&format!("/api/v1/{}/jobs", tid)).await;
    let jobs = parse_body(res).await;
    assert!(jobs.as_array().unwrap().iter().any(|j| {
        j["job_type"] == "CANCELLATION" && j["payload"]["target_id"] == iid.as_str()
    }));
}

#[tokio::test]
async fn test_cancel_rejects_blank_reasons() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("cancel-blank").await;
    let sid = app.seed_session(&tid, &slug, "Cohort").await;
    let iid = seed_instance(&app, &tid, &sid).await;
    let uri = format!("/api/v1/{}/instances/{}/cancel", tid, iid);

    for body in [json!({"reason": ""}), json!({"reason": "   "}), json!({})] {
        let res = app.post_json(&uri, body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_body(res).await["field"], "reason");
    }

    // Rejected attempts leave the instance untouched.
    let res = app.get(&format!("/api/v1/{}/instances/{}", tid, iid)).await;
    let body = parse_body(res).await;
    assert_eq!(body["is_cancelled"], false);
    assert_eq!(body["status"], "scheduled");
}

#[tokio::test]
async fn test_second_cancel_is_rejected_not_ignored() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("cancel-twice").await;
    let sid = app.seed_session(&tid, &slug, "Cohort").await;
    let iid = seed_instance(&app, &tid, &sid).await;
    let uri = format!("/api/v1/{}/instances/{}/cancel", tid, iid);

    let res = app.post_json(&uri, json!({"reason": "Room flooded"})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post_json(&uri, json!({"reason": "Different reason"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // The original reason survives.
    let res = app.get(&format!("/api/v1/{}/instances/{}", tid, iid)).await;
    assert_eq!(parse_body(res).await["cancellation_reason"], "Room flooded");
}

#[tokio::test]
async fn test_cancel_unknown_instance_is_404() {
    let app = TestApp::new().await;
    let (tid, _slug) = app.seed_course("cancel-missing").await;

    let res = app.post_json(
        &format!("/api/v1/{}/instances/{}/cancel", tid, "no-such-id"),
        json!({"reason": "whatever"}),
    ).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancelled_instance_ics_is_flagged() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("cancel-ics").await;
    let sid = app.seed_session(&tid, &slug, "Cohort").await;
    let iid = seed_instance(&app, &tid, &sid).await;

    app.post_json(
        &format!("/api/v1/{}/instances/{}/cancel", tid, iid),
        json!({"reason": "Trainer unavailable"}),
    ).await;

    let res = app.get(&format!("/api/v1/{}/instances/{}/ics", tid, iid)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let ics = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("CANCELLED: Rust Initiation"));
}
