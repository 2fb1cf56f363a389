//! Pagination over interaction and conversation history against a mock service

mod common;

use assert_matches::assert_matches;
use common::{CONVERSATION_SEARCH, INTERACTION_SEARCH};
use liveengage::{Error, History, Interaction, PageStep, Query, RetryLimit, TimeWindow};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn window() -> TimeWindow {
    use chrono::{TimeZone, Utc};
    TimeWindow::new(
        Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 11, 14, 23, 59, 0).unwrap(),
    )
    .unwrap()
}

async fn mount_second_page(server: &MockServer, fixture: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(INTERACTION_SEARCH))
        .and(query_param("offset", "2"))
        .and(query_param("limit", "2"))
        .and(body_partial_json(json!({
            "interactive": true,
            "ended": true,
            "start": {"from": "1699920000000", "to": "1700006340000"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::load_response_fixture(fixture, server)),
        )
        .expect(times)
        .mount(server)
        .await;
}

async fn first_page(session: &liveengage::Session) -> History<Interaction> {
    session
        .interactions(window())
        .await
        .expect("query should succeed")
        .into_result()
        .expect("service should be reachable")
}

#[tokio::test]
async fn test_query_maps_every_record() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_page1", 1).await;

    let session = common::session(&server, RetryLimit::default());
    let history = first_page(&session).await;

    let records = history.records();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    let info = first.info.as_ref().unwrap();
    assert_eq!(info.session_id().as_deref(), Some("100"));
    assert_eq!(info.seconds(), Some(125));
    assert_eq!(info.minutes(), Some(2.08));
    assert_eq!(info.hours(), Some(0.03));
    assert_eq!(info.extra.get("agentName"), Some(&json!("Ada")));
    assert_eq!(
        first.visitor_info.as_ref().and_then(|v| v.visitor_name.as_deref()),
        Some("Grace")
    );
    assert_eq!(
        first.campaign.as_ref().and_then(|c| c.campaign_id.as_deref()),
        Some("30")
    );
    assert!(first.fields.contains_key("transcript"));

    let second = &records[1];
    assert!(second.visitor_info.is_none());
    assert!(second.campaign.is_none());
    assert_eq!(second.info.as_ref().and_then(|i| i.hours()), Some(1.0));

    assert!(records.find_by_session_id("200").is_some());
}

#[tokio::test]
async fn test_two_page_continuity() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_page1", 1).await;
    mount_second_page(&server, "interactions_page2", 1).await;

    let session = common::session(&server, RetryLimit::default());
    let mut history = first_page(&session).await;

    assert_eq!(history.next().await.unwrap(), PageStep::Advanced { appended: 1 });
    assert_eq!(history.records().len(), 3);

    // page two carried no forward link
    assert_eq!(history.next().await.unwrap(), PageStep::Exhausted);

    let ids: Vec<_> = history
        .records()
        .iter()
        .filter_map(|r| r.info.as_ref().and_then(|i| i.session_id()))
        .collect();
    assert_eq!(ids, vec!["100", "200", "300"]);
}

#[tokio::test]
async fn test_exhaustion_is_idempotent() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_page2", 1).await;

    let session = common::session(&server, RetryLimit::default());
    let mut history = first_page(&session).await;
    let before = history.records().clone();

    for _ in 0..3 {
        assert_eq!(history.next().await.unwrap(), PageStep::Exhausted);
    }

    assert_eq!(history.records(), &before);
    assert_eq!(session.retry_attempts().await, 0);
}

#[tokio::test]
async fn test_empty_page_with_cursor_is_not_exhaustion() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_empty_with_next", 1).await;
    mount_second_page(&server, "interactions_page2", 1).await;

    let session = common::session(&server, RetryLimit::default());
    let mut history = first_page(&session).await;
    assert!(history.records().is_empty());

    assert_eq!(history.next().await.unwrap(), PageStep::Advanced { appended: 1 });
    assert_eq!(history.records().len(), 1);
}

#[tokio::test]
async fn test_prev_follows_backward_cursor() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_with_prev", 1).await;
    Mock::given(method("POST"))
        .and(path(INTERACTION_SEARCH))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::load_response_fixture(
                "interactions_first_page",
                &server,
            )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = common::session(&server, RetryLimit::default());
    let mut history = first_page(&session).await;

    // no forward link on the first response
    assert_eq!(history.next().await.unwrap(), PageStep::Exhausted);

    assert_eq!(history.prev().await.unwrap(), PageStep::Advanced { appended: 2 });
    assert_eq!(history.records().len(), 3);
    assert_eq!(history.prev().await.unwrap(), PageStep::Exhausted);
}

#[tokio::test]
async fn test_conversations() {
    let server = MockServer::start().await;
    common::mount_discovery(&server, "msgHist", 1).await;
    common::mount_first_page(&server, CONVERSATION_SEARCH, "conversations_page", 1).await;

    let session = common::builder(&server).build().unwrap();
    let mut history = session
        .conversations(window())
        .await
        .unwrap()
        .into_result()
        .unwrap();

    let records = history.records();
    assert_eq!(records.len(), 1);
    let conversation = &records[0];
    assert_eq!(conversation.conversation_id(), Some("c0ffee-1"));
    assert_eq!(conversation.info.as_ref().and_then(|i| i.minutes()), Some(2.08));
    assert!(conversation.fields.contains_key("messageRecords"));
    assert!(conversation.visitor_info.is_none());

    assert_eq!(history.next().await.unwrap(), PageStep::Exhausted);
    assert_eq!(
        session.active_query().await,
        Some((liveengage::HistoryKind::Conversation, window()))
    );
}

#[tokio::test]
async fn test_requests_are_signed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERACTION_SEARCH))
        .and(header("content-type", "application/json"))
        .and(header_exists("authorization"))
        .and(|request: &Request| {
            let Some(auth) = request.headers.get("authorization") else {
                return false;
            };
            let auth = auth.to_str().unwrap_or_default();
            auth.starts_with("OAuth ")
                && auth.contains("oauth_consumer_key=\"consumer-key\"")
                && auth.contains("oauth_token=\"token\"")
                && auth.contains("oauth_signature_method=\"HMAC-SHA1\"")
                && auth.contains("oauth_signature=")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interactionHistoryRecords": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = common::session(&server, RetryLimit::default());
    let history = first_page(&session).await;
    assert!(history.records().is_empty());
}

#[tokio::test]
async fn test_session_skills_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERACTION_SEARCH))
        .and(body_partial_json(json!({"skillIds": ["11", "12"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interactionHistoryRecords": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = common::builder(&server)
        .domain(common::host(&server))
        .skills(["11", "12"])
        .build()
        .unwrap();
    session.interactions(window()).await.unwrap().into_result().unwrap();
}

#[tokio::test]
async fn test_query_skills_override_session_skills() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERACTION_SEARCH))
        .and(|request: &Request| {
            let body: serde_json::Value = match serde_json::from_slice(&request.body) {
                Ok(body) => body,
                Err(_) => return false,
            };
            body.get("skillIds") == Some(&json!(["99"]))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interactionHistoryRecords": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = common::builder(&server)
        .domain(common::host(&server))
        .skills(["11"])
        .build()
        .unwrap();
    session
        .interactions(Query::new(window()).with_skills(["99"]))
        .await
        .unwrap()
        .into_result()
        .unwrap();
}

#[tokio::test]
async fn test_newer_query_supersedes_history() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_page1", 2).await;

    let session = common::session(&server, RetryLimit::default());
    let mut stale = first_page(&session).await;
    let _fresh = first_page(&session).await;

    assert_matches!(stale.next().await, Err(Error::QuerySuperseded));
    assert_eq!(stale.records().len(), 2);
}

#[tokio::test]
async fn test_dropped_session_releases_history() {
    let server = MockServer::start().await;
    common::mount_first_page(&server, INTERACTION_SEARCH, "interactions_page1", 1).await;

    let session = common::session(&server, RetryLimit::default());
    let mut history = first_page(&session).await;
    drop(session);

    assert_matches!(history.next().await, Err(Error::SessionReleased));
    assert_eq!(history.into_records().len(), 2);
}

#[tokio::test]
async fn test_malformed_record_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERACTION_SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interactionHistoryRecords": [{"info": {}}, "not a record"]
        })))
        .mount(&server)
        .await;

    let session = common::session(&server, RetryLimit::default());
    let err = session.interactions(window()).await.unwrap_err();
    assert_matches!(err, Error::MalformedRecord { index: 1, .. });
}
