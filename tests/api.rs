use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use call_insights::{
    api,
    data::{dataset::Snippet, knowledge::DomainKnowledge},
    nlp::{
        classifier::{ClassifierParams, SnippetClassifier},
        ner::{Ner, RuleNer, Span},
        Analyzer,
    },
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct FailingNer;

impl Ner for FailingNer {
    fn extract(&self, _text: &str) -> Vec<Span> {
        panic!("recogniser unavailable");
    }
}

fn analyzer() -> Arc<Analyzer> {
    analyzer_with(Arc::new(RuleNer))
}

fn analyzer_with(ner: Arc<dyn Ner>) -> Arc<Analyzer> {
    let knowledge = DomainKnowledge::from_json(
        r#"{"competitors": ["CompetitorX"], "security": ["SOC2", "GDPR"]}"#,
    )
    .unwrap();
    let snippets: Vec<Snippet> = (0..12)
        .map(|i| Snippet {
            id: i + 1,
            text: if i % 2 == 0 {
                "Are you SOC2 certified".into()
            } else {
                "CompetitorX is cheaper".into()
            },
            labels: if i % 2 == 0 {
                vec!["Compliance".into()]
            } else {
                vec!["Competition".into(), "Pricing Discussion".into()]
            },
        })
        .collect();
    let params = ClassifierParams {
        n_trees: 10,
        ..ClassifierParams::default()
    };
    let classifier = SnippetClassifier::fit(&snippets, params).unwrap();
    Arc::new(Analyzer::from_parts(&knowledge, ner, classifier).unwrap())
}

async fn post(body: &'static str) -> (StatusCode, Value) {
    post_to(analyzer(), body).await
}

async fn post_to(analyzer: Arc<Analyzer>, body: &'static str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = api::router(analyzer).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn analyze_returns_all_four_sections() {
    let (status, body) = post(r#"{"text": "CompetitorX is cheaper. Are you SOC2 certified? Thanks."}"#).await;
    assert_eq!(status, StatusCode::OK);

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 4);
    for key in ["dictionary_entities", "spacy_entities", "predicted_labels", "summary"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(
        body["dictionary_entities"],
        json!({"competitors": ["CompetitorX"], "security": ["SOC2"]})
    );
    assert_eq!(body["spacy_entities"]["organizations"], json!(["CompetitorX"]));
    assert_eq!(body["summary"], "CompetitorX is cheaper. Are you SOC2 certified.");

    let known = ["Compliance", "Competition", "Pricing Discussion"];
    for label in body["predicted_labels"].as_array().unwrap() {
        assert!(known.contains(&label.as_str().unwrap()));
    }
}

#[tokio::test]
async fn missing_text_defaults_to_empty() {
    let (status, body) = post("{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dictionary_entities"], json!({}));
    assert_eq!(body["summary"], ".");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (status, _) = post("{not json").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn recogniser_failure_is_a_server_error() {
    let (status, _) = post_to(analyzer_with(Arc::new(FailingNer)), r#"{"text": "Hi."}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn only_analyze_is_routed() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = api::router(analyzer()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
