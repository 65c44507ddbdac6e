/*!
 * Tests for AnkiConnect request shapes and response handling
 */

use anki_carder::Config;
use anki_carder::errors::ProviderError;
use anki_carder::providers::RawResponse;
use anki_carder::providers::anki_connect::{AnkiConnect, SubmissionOutcome, interpret_add_note};
use anki_carder::providers::mock::{MockTransport, error_body, ok_body};
use serde_json::json;
use std::time::Duration;

fn client(transport: MockTransport) -> AnkiConnect<MockTransport> {
    AnkiConnect::with_transport(transport, &Config::default())
}

#[tokio::test]
async fn test_probe_withOnlineEndpoint_shouldSendVersionRequestWithTimeout() {
    let client = client(MockTransport::online());

    assert!(client.probe().await);

    assert_eq!(client.transport().requests(), vec![json!({ "action": "version", "version": 6 })]);
    assert_eq!(client.transport().timeouts(), vec![Some(Duration::from_secs(5))]);
}

#[tokio::test]
async fn test_probe_withConnectionError_shouldReturnFalse() {
    let client = client(MockTransport::offline());
    assert!(!client.probe().await);
    assert_eq!(client.transport().count("version"), 1, "the probe is never retried");
}

#[tokio::test]
async fn test_probe_withNon200_shouldReturnFalse() {
    let client = client(MockTransport::with_handler(|_| Ok(RawResponse::new(503, ""))));
    assert!(!client.probe().await);
}

#[tokio::test]
async fn test_ensureDeck_shouldSendCreateDeckRequest() {
    let client = client(MockTransport::online());

    let created = client.ensure_deck("Українська").await.expect("transport ok");

    assert!(created);
    assert_eq!(
        client.transport().requests(),
        vec![json!({ "action": "createDeck", "version": 6, "params": { "deck": "Українська" } })]
    );
    assert_eq!(client.transport().timeouts(), vec![None]);
}

#[tokio::test]
async fn test_ensureDeck_withNon200_shouldReturnFalse() {
    let client = client(MockTransport::with_handler(|_| Ok(RawResponse::new(500, "boom"))));
    assert_eq!(client.ensure_deck("Deck").await.ok(), Some(false));
}

#[tokio::test]
async fn test_ensureDeck_withTransportError_shouldPropagate() {
    let client = client(MockTransport::offline());
    let result = client.ensure_deck("Deck").await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

#[tokio::test]
async fn test_addNote_shouldSendBasicNoteWithTag() {
    let client = client(MockTransport::online());

    let outcome = client.add_note("hello", "привіт", "Українська").await;

    assert_eq!(outcome, SubmissionOutcome::Success);
    assert_eq!(
        client.transport().requests(),
        vec![json!({
            "action": "addNote",
            "version": 6,
            "params": {
                "note": {
                    "deckName": "Українська",
                    "modelName": "Basic",
                    "fields": { "Front": "hello", "Back": "привіт" },
                    "tags": ["anki_carder"]
                }
            }
        })]
    );
}

#[tokio::test]
async fn test_addNote_withCustomNoteConfig_shouldUseIt() {
    let mut config = Config::default();
    config.note.model_name = "Basic (and reversed card)".to_string();
    config.note.tags = vec!["vocab".to_string(), "uk".to_string()];
    let client = AnkiConnect::with_transport(MockTransport::online(), &config);

    client.add_note("a", "b", "Deck").await;

    let note = &client.transport().requests()[0]["params"]["note"];
    assert_eq!(note["modelName"], "Basic (and reversed card)");
    assert_eq!(note["tags"], json!(["vocab", "uk"]));
}

#[tokio::test]
async fn test_addNote_withTransportError_shouldRecordFailure() {
    let client = client(MockTransport::offline());
    let outcome = client.add_note("a", "b", "Deck").await;
    assert!(matches!(
        outcome,
        SubmissionOutcome::Failure(reason) if reason.contains("connection refused")
    ));
}

#[test]
fn test_interpretAddNote_withNoteId_shouldSucceed() {
    let response = RawResponse::new(200, ok_body(json!(1496198395707u64)));
    assert_eq!(interpret_add_note(&response), SubmissionOutcome::Success);
}

#[test]
fn test_interpretAddNote_withDuplicateError_shouldFailWithMessage() {
    let response =
        RawResponse::new(200, error_body("cannot create note because it is a duplicate"));
    assert_eq!(
        interpret_add_note(&response),
        SubmissionOutcome::Failure("cannot create note because it is a duplicate".to_string())
    );
}

#[test]
fn test_interpretAddNote_withNullResultAndNoError_shouldReportUnknownError() {
    let unknown = SubmissionOutcome::Failure("Unknown error".to_string());

    let response = RawResponse::new(200, r#"{"result": null}"#);
    assert_eq!(interpret_add_note(&response), unknown);

    let response = RawResponse::new(200, "{}");
    assert_eq!(interpret_add_note(&response), unknown);
}

#[test]
fn test_interpretAddNote_withNon200_shouldReportHttpStatus() {
    let response = RawResponse::new(403, ok_body(json!(1)));
    assert_eq!(
        interpret_add_note(&response),
        SubmissionOutcome::Failure("HTTP error: 403".to_string())
    );
}

#[test]
fn test_interpretAddNote_withInvalidJson_shouldFail() {
    let response = RawResponse::new(200, "<html>");
    let outcome = interpret_add_note(&response);
    assert!(matches!(
        outcome,
        SubmissionOutcome::Failure(reason) if reason.contains("Failed to parse")
    ));
}
