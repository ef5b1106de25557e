//! Integration tests for the provider HTTP clients.
//!
//! Uses wiremock for HTTP mocking. Covers request shape (paths, auth headers,
//! query parameters, bodies) and status mapping for each client.

use std::sync::Arc;
use std::time::Duration;

use ringcheck_core::judge::{verdict_schema, JudgeService};
use ringcheck_core::providers::http::USER_AGENT_VALUE;
use ringcheck_core::providers::{
    AssistantConfig, CallProvider, DeepgramClient, LlmClient, OpenAIClient, Transcriber,
    VapiClient,
};
use ringcheck_core::{CallStatus, Locale, ProviderConfig, ProviderError, TestRecord, Transcript};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(mock_server: &MockServer) -> ProviderConfig {
    ProviderConfig::new("vapi-key", "pn_1", "sk-test", "dg-key")
        .with_vapi_url(mock_server.uri())
        .with_deepgram_url(mock_server.uri())
        .with_openai_url(mock_server.uri())
        .with_timeout_secs(5)
}

fn assistant() -> AssistantConfig {
    let record = TestRecord {
        id: "r1".into(),
        number: "+15550100".into(),
        instruction: "Ask for opening hours".into(),
        numtest: 1,
        ..Default::default()
    };
    AssistantConfig::for_record(&record, Locale::En, "gpt-4o-2024-11-20")
}

#[tokio::test]
async fn test_vapi_create_call_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .and(header("authorization", "Bearer vapi-key"))
        .and(header("user-agent", USER_AGENT_VALUE))
        .and(body_partial_json(json!({
            "phoneNumberId": "pn_1",
            "customer": { "number": "+15550100" },
            "assistant": { "backgroundSound": "off" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "call-abc",
            "status": "queued"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VapiClient::from_config(&config(&mock_server)).expect("failed to create client");
    let call = client
        .create_call("pn_1", "+15550100", &assistant())
        .await
        .expect("create failed");

    assert_eq!(call.id, "call-abc");
    assert_eq!(call.status, CallStatus::Queued);
    assert!(call.stereo_recording_url.is_none());
}

#[tokio::test]
async fn test_vapi_get_call_ended() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/call/call-abc"))
        .and(header("authorization", "Bearer vapi-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "call-abc",
            "status": "ended",
            "endedReason": "assistant-said-end-call-phrase",
            "phoneCallProviderId": "CA42",
            "artifact": {
                "recordingUrl": "https://storage.test/mono.wav",
                "stereoRecordingUrl": "https://storage.test/stereo.wav"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = VapiClient::from_config(&config(&mock_server)).unwrap();
    let call = client.get_call("call-abc").await.expect("get failed");

    assert!(call.status.is_terminal());
    assert_eq!(call.recording_url.as_deref(), Some("https://storage.test/mono.wav"));
    assert_eq!(call.stereo_recording_url.as_deref(), Some("https://storage.test/stereo.wav"));
    assert_eq!(call.provider_call_id.as_deref(), Some("CA42"));
}

#[tokio::test]
async fn test_vapi_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&mock_server)
        .await;

    let client = VapiClient::from_config(&config(&mock_server)).unwrap();
    let result = client.create_call("pn_1", "+15550100", &assistant()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ProviderError::Unauthorized { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_vapi_status_mapping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/call/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/call/busy"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/call/broken"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/call/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let client = VapiClient::from_config(&config(&mock_server)).unwrap();

    assert!(matches!(
        client.get_call("missing").await,
        Err(ProviderError::NotFound { .. })
    ));

    match client.get_call("busy").await {
        Err(ProviderError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(3)));
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }

    let err = client.get_call("broken").await.unwrap_err();
    match &err {
        ProviderError::Http { status, message } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Http, got {:?}", other),
    }
    assert!(err.is_retryable());

    assert!(matches!(
        client.get_call("garbled").await,
        Err(ProviderError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_deepgram_multichannel_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .and(query_param("model", "nova-2"))
        .and(query_param("multichannel", "true"))
        .and(query_param("detect_language", "true"))
        .and(header("authorization", "Token dg-key"))
        .and(body_partial_json(json!({ "url": "https://storage.test/stereo.wav" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": { "channels": [
                { "alternatives": [{ "words": [
                    { "word": "Thanks", "start": 0.2, "end": 0.5 },
                    { "word": "for", "start": 0.6, "end": 0.7 },
                    { "word": "calling", "start": 0.8, "end": 1.1 }
                ]}]},
                { "alternatives": [{ "words": [
                    { "word": "When", "start": 1.5, "end": 1.7 },
                    { "word": "are", "start": 1.8, "end": 1.9 },
                    { "word": "you", "start": 2.0, "end": 2.1 },
                    { "word": "open?", "start": 2.2, "end": 2.5 }
                ]}]}
            ]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DeepgramClient::from_config(&config(&mock_server)).unwrap();
    assert_eq!(client.provider_name(), "deepgram");
    let payload = client
        .transcribe_url("https://storage.test/stereo.wav")
        .await
        .expect("transcription failed");

    let transcript = Transcript::from_stt_payload(&payload);
    assert_eq!(
        transcript.to_string(),
        "Agent: Thanks for calling\nTester: When are you open?"
    );
}

#[tokio::test]
async fn test_deepgram_server_error_is_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = DeepgramClient::from_config(&config(&mock_server)).unwrap();
    let err = client.transcribe_url("https://x/y.wav").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 500, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_deepgram_model_override() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .and(query_param("model", "nova-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": {} })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DeepgramClient::from_config(&config(&mock_server))
        .unwrap()
        .with_model("nova-3");
    let payload = client.transcribe_url("https://x/y.wav").await.unwrap();
    assert!(!Transcript::from_stt_payload(&payload).is_available());
}

fn chat_completion(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": content,
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_openai_structured_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-2024-11-20",
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "judge_response", "strict": true }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(json!({
            "role": "assistant",
            "content": "{\"passed\":true,\"reasoning\":\"The agent stated the hours.\"}"
        }))))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client =
        OpenAIClient::from_config(&config(&mock_server), "gpt-4o-2024-11-20".to_string()).unwrap();
    let schema = verdict_schema();
    let resp = client
        .complete("judge this", Some(&schema))
        .await
        .expect("completion failed");
    assert_eq!(resp.provider, "openai");
    assert!(resp.text.contains("\"passed\":true"));

    let verdict = JudgeService::new(Arc::new(client))
        .judge("Agent states opening hours", "Agent: We open at nine")
        .await;
    assert!(verdict.passed);
    assert_eq!(verdict.reasoning, "The agent stated the hours.");
}

#[tokio::test]
async fn test_openai_refusal_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(json!({
            "role": "assistant",
            "content": null,
            "refusal": "I can't help with that."
        }))))
        .mount(&mock_server)
        .await;

    let client =
        OpenAIClient::from_config(&config(&mock_server), "gpt-4o-2024-11-20".to_string()).unwrap();
    let err = client.complete("judge", None).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    assert!(err.to_string().contains("refused"));
}

#[tokio::test]
async fn test_openai_server_error_degrades_judge_verdict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let client =
        OpenAIClient::from_config(&config(&mock_server), "gpt-4o-2024-11-20".to_string()).unwrap();
    let verdict = JudgeService::new(Arc::new(client))
        .judge("Agent greets", "Agent: Hello")
        .await;

    assert!(!verdict.passed);
    assert!(verdict.reasoning.is_empty());
}
