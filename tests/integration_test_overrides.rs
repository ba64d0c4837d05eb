mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_set_then_get_round_trips() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-roundtrip").await;
    let sid = app.seed_session(&tid, &slug, "Cohort A").await;

    // Fresh session inherits everything from the template.
    let res = app.get(&format!("/api/v1/{}/sessions/{}/overrides", tid, sid)).await;
    let fields = parse_body(res).await;
    assert_eq!(fields["location"]["value"], "Paris");
    assert_eq!(fields["location"]["overridden"], false);
    assert_eq!(fields["max_participants"]["value"], 12);

    let res = app.put_json(
        &format!("/api/v1/{}/sessions/{}/overrides/location", tid, sid),
        json!({"value": "Lyon"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["value"], "Lyon");
    assert_eq!(body["overridden"], true);

    let res = app.get(&format!("/api/v1/{}/sessions/{}/overrides", tid, sid)).await;
    let fields = parse_body(res).await;
    assert_eq!(fields["location"]["value"], "Lyon");
    assert_eq!(fields["location"]["overridden"], true);
    // Untouched fields stay inherited.
    assert_eq!(fields["title"]["overridden"], false);
}

#[tokio::test]
async fn test_reset_reverts_to_live_template_value() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-reset").await;
    let sid = app.seed_session(&tid, &slug, "Cohort B").await;

    app.put_json(
        &format!("/api/v1/{}/sessions/{}/overrides/title", tid, sid),
        json!({"value": "Custom title"}),
    ).await;

    let res = app.delete(&format!("/api/v1/{}/sessions/{}/overrides/title", tid, sid)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["overridden"], false);
    assert_eq!(body["value"], "Rust Initiation");

    // The reset stored NULL, not a copy: a template edit afterwards must
    // propagate to the session.
    let res = app.put_json(
        &format!("/api/v1/{}/courses/{}", tid, slug),
        json!({"title": "Rust Initiation v2"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/{}/sessions/{}/overrides", tid, sid)).await;
    let fields = parse_body(res).await;
    assert_eq!(fields["title"]["value"], "Rust Initiation v2");
    assert_eq!(fields["title"]["overridden"], false);
}

#[tokio::test]
async fn test_overridden_field_ignores_template_edits() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-sticky").await;
    let sid = app.seed_session(&tid, &slug, "Cohort C").await;

    app.put_json(
        &format!("/api/v1/{}/sessions/{}/overrides/trainer_name", tid, sid),
        json!({"value": "Grace"}),
    ).await;

    app.put_json(
        &format!("/api/v1/{}/courses/{}", tid, slug),
        json!({"trainer_name": "Barbara"}),
    ).await;

    let res = app.get(&format!("/api/v1/{}/sessions/{}/overrides", tid, sid)).await;
    let fields = parse_body(res).await;
    assert_eq!(fields["trainer_name"]["value"], "Grace");
}

#[tokio::test]
async fn test_setting_template_value_still_counts_as_override() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-equal").await;
    let sid = app.seed_session(&tid, &slug, "Cohort D").await;

    // Writing the exact template value is still an explicit override; no
    // equality check happens.
    let res = app.put_json(
        &format!("/api/v1/{}/sessions/{}/overrides/location", tid, sid),
        json!({"value": "Paris"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/{}/sessions/{}/overrides", tid, sid)).await;
    assert_eq!(parse_body(res).await["location"]["overridden"], true);
}

#[tokio::test]
async fn test_reset_all_is_one_batch() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-reset-all").await;
    let sid = app.seed_session(&tid, &slug, "Cohort E").await;

    app.put_json(&format!("/api/v1/{}/sessions/{}/overrides/title", tid, sid), json!({"value": "X"})).await;
    app.put_json(&format!("/api/v1/{}/sessions/{}/overrides/max_participants", tid, sid), json!({"value": 30})).await;

    let res = app.post_json(&format!("/api/v1/{}/sessions/{}/overrides/reset", tid, sid), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    let reset: Vec<&str> = body["reset_fields"].as_array().unwrap()
        .iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(reset, vec!["title", "max_participants"]);

    for (_, field) in body["fields"].as_object().unwrap() {
        assert_eq!(field["overridden"], false);
    }

    // A second reset has nothing left to report.
    let res = app.post_json(&format!("/api/v1/{}/sessions/{}/overrides/reset", tid, sid), json!({})).await;
    assert_eq!(parse_body(res).await["reset_fields"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_field_is_rejected() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-unknown").await;
    let sid = app.seed_session(&tid, &slug, "Cohort F").await;

    let res = app.put_json(
        &format!("/api/v1/{}/sessions/{}/overrides/price", tid, sid),
        json!({"value": 100}),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["field"], "price");

    let res = app.delete(&format!("/api/v1/{}/sessions/{}/overrides/price", tid, sid)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_capacity_override_flows_into_generated_instances() {
    let app = TestApp::new().await;
    let (tid, slug) = app.seed_course("override-capacity").await;
    let sid = app.seed_session(&tid, &slug, "Cohort G").await;

    app.put_json(
        &format!("/api/v1/{}/sessions/{}/overrides/max_participants", tid, sid),
        json!({"value": 25}),
    ).await;

    let res = app.post_json(
        &format!("/api/v1/{}/sessions/{}/instances/generate", tid, sid),
        json!({
            "instance_type": "presentiel",
            "payload": {"location_address": "1 rue Centrale", "location_city": "Nantes"},
            "recurrence": {"has_recurrence": false, "start_date": "2024-05-21"}
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["instances"][0]["max_participants"], 25);
}
