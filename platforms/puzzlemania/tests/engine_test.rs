use core_logic::{CampaignError, ManualClock};
use puzzlemania::auth::AuthSession;
use puzzlemania::client::AttemptClient;
use puzzlemania::campaign;
use puzzlemania::config::PuzzleConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> PuzzleConfig {
    let mut config = PuzzleConfig::default();
    config.api.auth_base_url = server.uri();
    config.api.campaign_url = format!("{}/", server.uri());
    config.retry.max_attempts = 3;
    config.retry.delay_ms = 7;
    config
}

fn test_session() -> AuthSession {
    AuthSession {
        token: "platform-token".to_string(),
        display_name: "tester".to_string(),
        address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
        issued_at_ms: 0,
    }
}

fn graphql_mock(operation: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({ "operationName": operation })))
}

async fn mount_user_me(server: &MockServer, points: u64) {
    graphql_mock("UserMe")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "userMe": { "campaignSpot": { "points": points, "records": [] } } }
        })))
        .mount(server)
        .await;
}

async fn mount_campaign(server: &MockServer, activities: serde_json::Value) {
    graphql_mock("Campaign")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "campaign": { "activities": activities } }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn checkin_and_unclaimed_tasks_are_verified() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = ManualClock::new();

    mount_user_me(&server, 120).await;
    mount_campaign(
        &server,
        json!([
            { "id": "c1", "title": "Daily Check-in", "createdAt": "2025-01-01T00:00:00Z", "records": [] },
            { "id": "t1", "title": "Campaign Registration", "records": [
                { "id": "r1", "status": "COMPLETED", "createdAt": "2025-01-01T00:00:00Z" }
            ]},
            { "id": "t2", "title": "Follow 0G Labs", "records": [] }
        ]),
    )
    .await;

    // One call for the check-in, one for the unclaimed task
    graphql_mock("VerifyActivity")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyActivity": { "record": {
                "id": "r9", "activityId": "c1", "status": "COMPLETED",
                "createdAt": "2025-06-01T00:00:00Z"
            }}}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = AttemptClient::build(&config, None).unwrap();
    let session = test_session();
    campaign::run_cycle(&client, &config, &session, &clock)
        .await
        .unwrap();

    // No rate limiting happened, so no retry sleeps
    assert!(clock.recorded_sleeps().is_empty());
}

#[tokio::test]
async fn points_failure_degrades_to_zero() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = ManualClock::new();

    graphql_mock("UserMe")
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_campaign(&server, json!([])).await;

    let client = AttemptClient::build(&config, None).unwrap();
    let session = test_session();

    // Points unavailable is non-fatal: the cycle still completes
    campaign::run_cycle(&client, &config, &session, &clock)
        .await
        .unwrap();
}

#[tokio::test]
async fn snapshot_failure_aborts_the_cycle() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = ManualClock::new();

    mount_user_me(&server, 10).await;
    graphql_mock("Campaign")
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    graphql_mock("VerifyActivity")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = AttemptClient::build(&config, None).unwrap();
    let session = test_session();
    let err = campaign::run_cycle(&client, &config, &session, &clock)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CampaignError>(),
        Some(CampaignError::DataUnavailable { .. })
    ));
}

#[tokio::test]
async fn null_campaign_is_data_unavailable() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = ManualClock::new();

    mount_user_me(&server, 0).await;
    graphql_mock("Campaign")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "campaign": null }
        })))
        .mount(&server)
        .await;

    let client = AttemptClient::build(&config, None).unwrap();
    let session = test_session();
    let err = campaign::run_cycle(&client, &config, &session, &clock)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CampaignError>(),
        Some(CampaignError::DataUnavailable { .. })
    ));
}

#[tokio::test]
async fn failed_verification_leaves_task_incomplete() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = ManualClock::new();

    mount_user_me(&server, 5).await;
    mount_campaign(
        &server,
        json!([
            { "id": "t1", "title": "Refer a friend", "records": [] },
            { "id": "t2", "title": "Follow 0G Labs", "records": [] }
        ]),
    )
    .await;

    // Verification never completes, but each task is still attempted
    graphql_mock("VerifyActivity")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyActivity": { "record": {
                "id": "r1", "activityId": "t1", "status": "PENDING"
            }}}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = AttemptClient::build(&config, None).unwrap();
    let session = test_session();
    campaign::run_cycle(&client, &config, &session, &clock)
        .await
        .unwrap();
}

#[tokio::test]
async fn rate_limited_snapshot_is_retried_with_fixed_delay() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let clock = ManualClock::new();

    mount_user_me(&server, 1).await;
    // First snapshot request is rate limited, the retry succeeds
    graphql_mock("Campaign")
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_campaign(&server, json!([])).await;

    let client = AttemptClient::build(&config, None).unwrap();
    let session = test_session();
    campaign::run_cycle(&client, &config, &session, &clock)
        .await
        .unwrap();

    assert_eq!(clock.recorded_sleeps(), vec![7]);
}
