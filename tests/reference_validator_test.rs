use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;
use syllabus_backend::{
    genai::{GeminiHttpClient, GenaiConfig},
    messages,
    services::ReferenceValidator,
};

const MODEL_PATH: &str = "/models/gemini-test:generateContent";

fn validator(server: &MockServer) -> ReferenceValidator {
    let client = GeminiHttpClient::new(GenaiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        base_url: server.base_url(),
    })
    .expect("Failed to build client");
    ReferenceValidator::new(Some(Arc::new(client)))
}

fn model_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn test_valid_reference_is_accepted() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .header("x-goog-api-key", "test-key")
                .body_contains("responseSchema")
                .body_contains("Sapolsky");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(model_reply(r#"{"isValid": true, "feedback": "La referencia es correcta."}"#));
        })
        .await;

    let result = validator(&server)
        .validate("Sapolsky, R. M. (2017). Behave. Penguin Press.")
        .await;

    api_mock.assert_async().await;
    assert!(result.is_valid);
    assert_eq!(result.feedback, "La referencia es correcta.");
}

#[tokio::test]
async fn test_invalid_reference_keeps_model_feedback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(model_reply(
                r#"{"isValid": false, "feedback": "Falta el año de publicación."}"#,
            ));
        })
        .await;

    let result = validator(&server).validate("Sapolsky. Behave.").await;

    assert!(!result.is_valid);
    assert_eq!(result.feedback, "Falta el año de publicación.");
}

#[tokio::test]
async fn test_upstream_error_becomes_generic_rejection() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(500).body("internal error");
        })
        .await;

    let result = validator(&server).validate("Autor, A. (2020). Título.").await;

    api_mock.assert_async().await;
    assert!(!result.is_valid);
    assert_eq!(result.feedback, messages::VALIDATION_FAILED);
}

#[tokio::test]
async fn test_off_schema_answer_becomes_generic_rejection() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(model_reply(r#"{"valid": "yes"}"#));
        })
        .await;

    let result = validator(&server).validate("Autor, A. (2020). Título.").await;

    assert!(!result.is_valid);
    assert_eq!(result.feedback, messages::VALIDATION_FAILED);
}

#[tokio::test]
async fn test_empty_candidates_become_generic_rejection() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let result = validator(&server).validate("Autor, A. (2020). Título.").await;

    assert!(!result.is_valid);
    assert_eq!(result.feedback, messages::VALIDATION_FAILED);
}

#[tokio::test]
async fn test_blank_reference_never_reaches_the_model() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(model_reply(r#"{"isValid": true, "feedback": "ok"}"#));
        })
        .await;

    let result = validator(&server).validate("   \n").await;

    assert_eq!(api_mock.hits_async().await, 0);
    assert!(!result.is_valid);
    assert_eq!(result.feedback, messages::EMPTY_REFERENCE);
}

#[tokio::test]
async fn test_missing_model_is_a_generic_rejection() {
    let result = ReferenceValidator::new(None)
        .validate("Autor, A. (2020). Título.")
        .await;

    assert!(!result.is_valid);
    assert_eq!(result.feedback, messages::VALIDATION_FAILED);
}
