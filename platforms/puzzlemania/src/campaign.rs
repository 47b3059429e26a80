//! Campaign task engine
//!
//! Fetches the campaign snapshot for one authenticated session, classifies
//! activities, performs the daily check-in, verifies outstanding tasks and
//! renders the per-identity report. Every remote call goes through the shared
//! retry executor.

use crate::auth::AuthSession;
use crate::client::AttemptClient;
use crate::config::PuzzleConfig;
use crate::report;
use anyhow::Result;
use core_logic::{short_address, with_rate_limit_retry, CampaignError, Clock, RetryConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Case-insensitive substring that distinguishes the check-in activity.
pub const DAILY_CHECKIN_MARKER: &str = "daily check-in";

const USER_ME_QUERY: &str = "\n      query UserMe($campaignId: String!) {\n        userMe {\n          campaignSpot(campaignId: $campaignId) {\n            points\n            records {\n              id\n              status\n              createdAt\n            }\n          }\n        }\n      }";

const CAMPAIGN_QUERY: &str = "\n      fragment ActivityFields on CampaignActivity {\n        id\n        title\n        createdAt\n        records {\n          id\n          status\n          createdAt\n          __typename\n        }\n        __typename\n      }\n      query Campaign($campaignId: String!) {\n        campaign(id: $campaignId) {\n          activities {\n            ...ActivityFields\n            __typename\n          }\n          __typename\n        }\n      }";

const VERIFY_QUERY: &str = "mutation VerifyActivity($data: VerifyActivityInput!) {  verifyActivity(data: $data) {    record {      id      activityId      status      __typename    }    __typename  }}";

const CHECKIN_QUERY: &str = "mutation VerifyActivity($data: VerifyActivityInput!) {\n      verifyActivity(data: $data) {\n        record {\n          id\n          activityId\n          status\n          properties\n          createdAt\n          rewardRecords {\n            id\n            status\n            appliedRewardType\n            appliedRewardQuantity\n            appliedRewardMetadata\n            error\n            rewardId\n            reward {\n              id\n              quantity\n              type\n              properties\n              __typename\n            }\n            __typename\n          }\n          __typename\n        }\n        missionRecord {\n          id\n          missionId\n          status\n          createdAt\n          rewardRecords {\n            id\n            status\n            appliedRewardType\n            appliedRewardQuantity\n            appliedRewardMetadata\n            error\n            rewardId\n            reward {\n              id\n              quantity\n              type\n              properties\n              __typename\n            }\n            __typename\n          }\n          __typename\n        }\n        __typename\n      }\n    }";

/// One completion record attached to an activity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One campaign activity with its completion records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub records: Vec<ActivityRecord>,
}

impl Activity {
    /// An activity is claimed once it carries at least one completion
    /// record, regardless of the record's status value.
    pub fn is_claimed(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Snapshot partitioned into the check-in activity and ordinary tasks.
#[derive(Debug)]
pub struct Classified {
    pub checkin: Option<Activity>,
    pub claimed: Vec<Activity>,
    pub unclaimed: Vec<Activity>,
}

/// Exact matching rule for the daily check-in activity.
pub fn is_daily_checkin(title: &str) -> bool {
    title.to_lowercase().contains(DAILY_CHECKIN_MARKER)
}

/// Splits the activity list: the first title matching the check-in rule is
/// set aside; the rest partition by completion record count.
pub fn classify(activities: Vec<Activity>) -> Classified {
    let mut checkin = None;
    let mut claimed = Vec::new();
    let mut unclaimed = Vec::new();

    for activity in activities {
        if checkin.is_none() && is_daily_checkin(activity.title_str()) {
            checkin = Some(activity);
        } else if activity.is_claimed() {
            claimed.push(activity);
        } else {
            unclaimed.push(activity);
        }
    }

    Classified {
        checkin,
        claimed,
        unclaimed,
    }
}

/// Outcome of the daily check-in for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinStatus {
    /// A completion record pre-existed this cycle
    AlreadyDone,
    /// Verified this cycle; a local record was synthesized
    JustCompleted,
    /// Verification did not return COMPLETED
    Failed,
    /// No activity in the snapshot matched the check-in rule
    NotFound,
}

impl std::fmt::Display for CheckinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CheckinStatus::AlreadyDone => "already done",
            CheckinStatus::JustCompleted => "just completed",
            CheckinStatus::Failed => "failed",
            CheckinStatus::NotFound => "no check-in activity found",
        };
        write!(f, "{}", text)
    }
}

/// Runs one task cycle for an authenticated session.
///
/// Points fetch failures degrade to zero; a snapshot fetch failure aborts the
/// identity's cycle with `CampaignError::DataUnavailable`. Per-task
/// verification failures never abort sibling tasks.
pub async fn run_cycle(
    client: &AttemptClient,
    config: &PuzzleConfig,
    session: &AuthSession,
    clock: &dyn Clock,
) -> Result<()> {
    let retry = RetryConfig::new(config.retry.max_attempts, config.retry.delay_ms);
    let short = short_address(&session.address);

    let points = fetch_points(client, config, session, retry, clock).await;
    let activities = fetch_activities(client, config, session, retry, clock).await?;
    let mut classified = classify(activities);

    let checkin_status = match classified.checkin.as_mut() {
        None => CheckinStatus::NotFound,
        Some(checkin) if checkin.is_claimed() => CheckinStatus::AlreadyDone,
        Some(checkin) => {
            info!("[{}] performing check-in: {}", short, checkin.title_str());
            match perform_checkin(client, session, &checkin.id, retry, clock).await {
                Some(record) => {
                    // Reflect the fresh record locally so the report is
                    // accurate without a second snapshot round-trip.
                    checkin.records = vec![record];
                    CheckinStatus::JustCompleted
                }
                None => {
                    warn!("[{}] check-in failed this cycle", short);
                    CheckinStatus::Failed
                }
            }
        }
    };

    report::print_header(
        &session.display_name,
        &session.address,
        points,
        checkin_status,
        client.proxy_url(),
    );
    report::print_claimed(&classified.claimed);

    report::print_unclaimed_open();
    if classified.unclaimed.is_empty() {
        report::print_no_unclaimed();
    } else {
        for task in &classified.unclaimed {
            info!("[{}] verifying: {}", short, task.title_str());
            let verified = verify_task(client, session, &task.id, retry, clock).await;
            report::print_task_result(task.title_str(), verified);
        }
    }
    report::print_section_close();

    Ok(())
}

/// Aggregate points for the identity; any failure reads as zero.
async fn fetch_points(
    client: &AttemptClient,
    config: &PuzzleConfig,
    session: &AuthSession,
    retry: RetryConfig,
    clock: &dyn Clock,
) -> u64 {
    let payload = json!({
        "operationName": "UserMe",
        "variables": { "campaignId": config.api.campaign_id },
        "query": USER_ME_QUERY,
    });

    let result = with_rate_limit_retry(retry, clock, "UserMe", || {
        client.graphql("UserMe", &payload, Some(&session.token))
    })
    .await;

    match result {
        Ok(body) => body
            .pointer("/data/userMe/campaignSpot/points")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        Err(e) => {
            warn!(
                "[{}] failed to fetch points, reading as 0: {:#}",
                short_address(&session.address),
                e
            );
            0
        }
    }
}

/// Full activity list; a failure here aborts the identity's cycle.
async fn fetch_activities(
    client: &AttemptClient,
    config: &PuzzleConfig,
    session: &AuthSession,
    retry: RetryConfig,
    clock: &dyn Clock,
) -> Result<Vec<Activity>> {
    let payload = json!({
        "operationName": "Campaign",
        "variables": { "campaignId": config.api.campaign_id },
        "query": CAMPAIGN_QUERY,
    });

    let body = with_rate_limit_retry(retry, clock, "Campaign", || {
        client.graphql("Campaign", &payload, Some(&session.token))
    })
    .await
    .map_err(|e| CampaignError::DataUnavailable {
        reason: format!("{:#}", e),
    })?;

    let activities = body
        .pointer("/data/campaign/activities")
        .cloned()
        .ok_or_else(|| CampaignError::DataUnavailable {
            reason: "campaign data missing from response".to_string(),
        })?;

    serde_json::from_value(activities).map_err(|e| {
        CampaignError::DataUnavailable {
            reason: format!("malformed activity list: {}", e),
        }
        .into()
    })
}

/// Submits the check-in verification; returns the fresh record on COMPLETED.
async fn perform_checkin(
    client: &AttemptClient,
    session: &AuthSession,
    activity_id: &str,
    retry: RetryConfig,
    clock: &dyn Clock,
) -> Option<ActivityRecord> {
    let payload = json!({
        "operationName": "VerifyActivity",
        "variables": { "data": { "activityId": activity_id } },
        "query": CHECKIN_QUERY,
    });

    let result = with_rate_limit_retry(retry, clock, "VerifyActivity", || {
        client.graphql("VerifyActivity", &payload, Some(&session.token))
    })
    .await;

    let body = match result {
        Ok(body) => body,
        Err(e) => {
            warn!("check-in verification error: {:#}", e);
            return None;
        }
    };

    let record = body.pointer("/data/verifyActivity/record")?;
    let completed = record
        .get("status")
        .and_then(Value::as_str)
        .map(|status| status.eq_ignore_ascii_case("COMPLETED"))
        .unwrap_or(false);
    if !completed {
        return None;
    }
    serde_json::from_value(record.clone()).ok()
}

/// Verifies one ordinary task; any failure reports the task as incomplete.
async fn verify_task(
    client: &AttemptClient,
    session: &AuthSession,
    activity_id: &str,
    retry: RetryConfig,
    clock: &dyn Clock,
) -> bool {
    let payload = json!({
        "operationName": "VerifyActivity",
        "variables": { "data": { "activityId": activity_id } },
        "query": VERIFY_QUERY,
    });

    let result = with_rate_limit_retry(retry, clock, "VerifyActivity", || {
        client.graphql("VerifyActivity", &payload, Some(&session.token))
    })
    .await;

    match result {
        Ok(body) => body
            .pointer("/data/verifyActivity/record/status")
            .and_then(Value::as_str)
            .map(|status| status.eq_ignore_ascii_case("COMPLETED"))
            .unwrap_or(false),
        Err(e) => {
            warn!("task verification error: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, title: &str, record_count: usize) -> Activity {
        Activity {
            id: id.to_string(),
            title: Some(title.to_string()),
            created_at: None,
            records: (0..record_count)
                .map(|i| ActivityRecord {
                    id: Some(format!("r{}", i)),
                    status: Some("PENDING".to_string()),
                    created_at: None,
                })
                .collect(),
        }
    }

    #[test]
    fn checkin_match_is_case_insensitive_substring() {
        assert!(is_daily_checkin("Daily Check-in"));
        assert!(is_daily_checkin("Daily Check-In Bonus"));
        assert!(is_daily_checkin("DAILY CHECK-IN"));
        // The rule is exact: no looser heuristic
        assert!(!is_daily_checkin("Checkin Daily"));
        assert!(!is_daily_checkin("Daily CheckIn"));
        assert!(!is_daily_checkin(""));
    }

    #[test]
    fn classify_separates_checkin_from_tasks() {
        let activities = vec![
            activity("a1", "Campaign Registration", 1),
            activity("a2", "Daily Check-In Bonus", 0),
            activity("a3", "Follow 0G Labs", 0),
        ];
        let classified = classify(activities);
        assert_eq!(classified.checkin.as_ref().unwrap().id, "a2");
        assert_eq!(classified.claimed.len(), 1);
        assert_eq!(classified.claimed[0].id, "a1");
        assert_eq!(classified.unclaimed.len(), 1);
        assert_eq!(classified.unclaimed[0].id, "a3");
    }

    #[test]
    fn record_count_decides_claimed_regardless_of_status() {
        // Records carry status PENDING, still counts as claimed
        assert!(activity("a1", "t", 1).is_claimed());
        assert!(activity("a1", "t", 3).is_claimed());
        assert!(!activity("a1", "t", 0).is_claimed());
    }

    #[test]
    fn classify_without_checkin_activity() {
        let activities = vec![
            activity("a1", "Refer a friend", 0),
            activity("a2", "Follow 0G Labs", 2),
        ];
        let classified = classify(activities);
        assert!(classified.checkin.is_none());
        assert_eq!(classified.claimed.len(), 1);
        assert_eq!(classified.unclaimed.len(), 1);
    }

    #[test]
    fn activities_deserialize_from_snapshot_shape() {
        let raw = serde_json::json!([
            {
                "id": "a1",
                "title": "Daily Check-in",
                "createdAt": "2025-01-01T00:00:00Z",
                "records": [
                    { "id": "r1", "status": "COMPLETED", "createdAt": "2025-01-02T00:00:00Z", "__typename": "Record" }
                ],
                "__typename": "CampaignActivity"
            },
            { "id": "a2", "records": [] }
        ]);
        let activities: Vec<Activity> = serde_json::from_value(raw).unwrap();
        assert_eq!(activities.len(), 2);
        assert!(activities[0].is_claimed());
        assert_eq!(activities[1].title_str(), "");
        assert!(!activities[1].is_claimed());
    }

    #[test]
    fn checkin_status_wording() {
        assert_eq!(CheckinStatus::AlreadyDone.to_string(), "already done");
        assert_eq!(CheckinStatus::JustCompleted.to_string(), "just completed");
        assert_eq!(CheckinStatus::Failed.to_string(), "failed");
        assert_eq!(
            CheckinStatus::NotFound.to_string(),
            "no check-in activity found"
        );
    }
}
