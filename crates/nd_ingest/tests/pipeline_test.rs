use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use mockito::Matcher;
use nd_core::{ArticleStorage, InferenceError, InferenceModel, RawArticle};
use nd_inference::{Config, HuggingFaceModel, RetryPolicy};
use nd_ingest::{IngestReport, Pipeline};
use nd_storage::{InMemoryStorage, JsonFileStorage};
use serde_json::json;
use url::Url;

/// Answers "Politics" / "sum" unless the text mentions a poisoned marker.
#[derive(Default)]
struct MockInference {
    poisoned: HashSet<String>,
    delay_by_text: bool,
    classify_inputs: Mutex<Vec<String>>,
    summarize_inputs: Mutex<Vec<String>>,
}

impl MockInference {
    fn failing_on(markers: &[&str]) -> Self {
        Self {
            poisoned: markers.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    fn check(&self, text: &str) -> Result<(), InferenceError> {
        if self.poisoned.iter().any(|marker| text.contains(marker.as_str())) {
            return Err(InferenceError::unavailable("mock/model", 503, "Model is currently loading"));
        }
        Ok(())
    }
}

#[async_trait]
impl InferenceModel for MockInference {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, text: &str) -> Result<String, InferenceError> {
        self.classify_inputs.lock().unwrap().push(text.to_string());
        if self.delay_by_text {
            // Earlier articles answer later.
            let rank: u64 = text.rsplit('X').next().and_then(|n| n.parse().ok()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(rank * 10))).await;
        }
        self.check(text)?;
        Ok("Politics".to_string())
    }

    async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        self.summarize_inputs.lock().unwrap().push(text.to_string());
        self.check(text)?;
        Ok("sum".to_string())
    }
}

fn raw(n: usize) -> RawArticle {
    RawArticle {
        url: Url::parse(&format!("http://a/{}", n)).unwrap(),
        title: format!("T{}", n),
        text: format!("X{}", n),
        source: "S1".to_string(),
        top_img: None,
        publish_dt: None,
    }
}

fn pipeline_with(inference: MockInference) -> (Pipeline, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let pipeline = Pipeline::new(Arc::new(inference), storage.clone());
    (pipeline, storage)
}

async fn stored_urls(storage: &dyn ArticleStorage, limit: Option<usize>) -> Vec<String> {
    storage
        .list(limit)
        .await
        .unwrap()
        .iter()
        .map(|a| a.url().to_string())
        .collect()
}

#[tokio::test]
async fn test_ingest_two_articles_newest_first() {
    let (pipeline, storage) = pipeline_with(MockInference::default());

    let outcome = pipeline.ingest(vec![raw(1), raw(2)]).await.unwrap();
    assert_eq!(outcome.report, IngestReport { received: 2, stored: 2 });
    assert!(outcome.failures.is_empty());

    let listed = storage.list(Some(10)).await.unwrap();
    let urls: Vec<&str> = listed.iter().map(|a| a.url().as_str()).collect();
    assert_eq!(urls, vec!["http://a/2", "http://a/1"]);
    assert!(listed.iter().all(|a| a.article.category == "Politics" && a.article.summary == "sum"));
    assert_eq!(listed[1].article.raw, raw(1));
}

#[tokio::test]
async fn test_reingest_stores_nothing() {
    let (pipeline, storage) = pipeline_with(MockInference::default());

    pipeline.ingest(vec![raw(1), raw(2)]).await.unwrap();
    let outcome = pipeline.ingest(vec![raw(1), raw(2)]).await.unwrap();

    assert_eq!(outcome.report, IngestReport { received: 2, stored: 0 });
    assert_eq!(storage.list(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_new_batch_lands_above_previous_batches() {
    let (pipeline, storage) = pipeline_with(MockInference::default());

    pipeline.ingest(vec![raw(1), raw(2)]).await.unwrap();
    let outcome = pipeline.ingest(vec![raw(3), raw(2), raw(4)]).await.unwrap();

    assert_eq!(outcome.report, IngestReport { received: 3, stored: 2 });
    assert_eq!(
        stored_urls(storage.as_ref(), None).await,
        vec!["http://a/4", "http://a/3", "http://a/2", "http://a/1"]
    );
}

#[tokio::test]
async fn test_failed_article_is_skipped_and_reported() {
    let (pipeline, storage) = pipeline_with(MockInference::failing_on(&["X2"]));

    let outcome = pipeline.ingest(vec![raw(1), raw(2), raw(3)]).await.unwrap();

    assert_eq!(outcome.report, IngestReport { received: 3, stored: 2 });
    assert_eq!(outcome.failures.len(), 1);
    let failure = &outcome.failures[0];
    assert_eq!(failure.url.as_str(), "http://a/2");
    assert_eq!(failure.source, "S1");
    assert!(matches!(failure.error, InferenceError::Unavailable { status: 503, .. }));

    assert_eq!(stored_urls(storage.as_ref(), None).await, vec!["http://a/3", "http://a/1"]);
}

#[tokio::test]
async fn test_all_failures_still_report_counts() {
    let (pipeline, storage) = pipeline_with(MockInference::failing_on(&["X"]));

    let outcome = pipeline.ingest(vec![raw(1), raw(2)]).await.unwrap();

    assert_eq!(outcome.report, IngestReport { received: 2, stored: 0 });
    assert_eq!(outcome.failures.len(), 2);
    assert!(storage.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_batch() {
    let (pipeline, _storage) = pipeline_with(MockInference::default());

    let outcome = pipeline.ingest(Vec::new()).await.unwrap();
    assert_eq!(outcome.report, IngestReport { received: 0, stored: 0 });
}

#[tokio::test]
async fn test_inference_inputs() {
    let inference = Arc::new(MockInference::default());
    let pipeline = Pipeline::new(inference.clone(), Arc::new(InMemoryStorage::new()));

    pipeline.ingest(vec![raw(1)]).await.unwrap();

    assert_eq!(*inference.classify_inputs.lock().unwrap(), vec!["T1\nX1".to_string()]);
    assert_eq!(*inference.summarize_inputs.lock().unwrap(), vec!["X1".to_string()]);
}

#[tokio::test]
async fn test_concurrent_enrichment_keeps_input_order() {
    let inference = MockInference {
        delay_by_text: true,
        ..Default::default()
    };
    let storage = Arc::new(InMemoryStorage::new());
    let pipeline = Pipeline::new(Arc::new(inference), storage.clone()).with_concurrency(4);

    let outcome = pipeline.ingest((1..=4).map(raw).collect()).await.unwrap();

    assert_eq!(outcome.report.stored, 4);
    assert_eq!(
        stored_urls(storage.as_ref(), None).await,
        vec!["http://a/4", "http://a/3", "http://a/2", "http://a/1"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ingest_runs_on_spawned_tasks() {
    let storage = Arc::new(InMemoryStorage::new());
    let pipeline = Arc::new(
        Pipeline::new(Arc::new(MockInference::default()), storage.clone()).with_concurrency(2),
    );

    let first = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.ingest(vec![raw(1), raw(2)]).await }
    });
    let second = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.ingest(vec![raw(2), raw(3)]).await }
    });

    let stored = first.await.unwrap().unwrap().report.stored + second.await.unwrap().unwrap().report.stored;
    assert_eq!(stored, 3);
    assert_eq!(storage.list(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_ingest_persists_to_json_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("articles.json");

    let storage = Arc::new(JsonFileStorage::open(&path).await.unwrap());
    let pipeline = Pipeline::new(Arc::new(MockInference::default()), storage);
    let outcome = pipeline.ingest(vec![raw(1), raw(2)]).await.unwrap();
    assert_eq!(outcome.report.stored, 2);
    drop(pipeline);

    let reopened = JsonFileStorage::open(&path).await.unwrap();
    assert_eq!(stored_urls(&reopened, Some(10)).await, vec!["http://a/2", "http://a/1"]);
}

#[tokio::test]
async fn test_model_loading_through_budget_excludes_only_that_article() {
    let mut server = mockito::Server::new_async().await;

    let cold = server
        .mock("POST", "/models/org/clf")
        .match_body(Matcher::PartialJson(json!({"inputs": "T2\nX2"})))
        .with_status(503)
        .with_body(r#"{"error": "Model org/clf is currently loading"}"#)
        .expect(4)
        .create_async()
        .await;
    let warm_first = server
        .mock("POST", "/models/org/clf")
        .match_body(Matcher::PartialJson(json!({"inputs": "T1\nX1"})))
        .with_status(200)
        .with_body(r#"[{"label": "Politics", "score": 0.9}]"#)
        .expect(1)
        .create_async()
        .await;
    let warm_third = server
        .mock("POST", "/models/org/clf")
        .match_body(Matcher::PartialJson(json!({"inputs": "T3\nX3"})))
        .with_status(200)
        .with_body(r#"[{"label": "Sports", "score": 0.8}]"#)
        .expect(1)
        .create_async()
        .await;
    let summaries = server
        .mock("POST", "/models/org/sum")
        .with_status(200)
        .with_body(r#"[{"generated_text": "sum"}]"#)
        .expect(2)
        .create_async()
        .await;

    let config = Config::new("token", "org/clf", "org/sum")
        .with_base_url(server.url())
        .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(10)));
    let model = Arc::new(HuggingFaceModel::new(config).unwrap());
    let storage = Arc::new(InMemoryStorage::new());
    let pipeline = Pipeline::new(model, storage.clone());

    let outcome = pipeline.ingest(vec![raw(1), raw(2), raw(3)]).await.unwrap();

    assert_eq!(outcome.report, IngestReport { received: 3, stored: 2 });
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].url.as_str(), "http://a/2");
    assert_eq!(outcome.failures[0].error.endpoint(), "org/clf");

    let listed = storage.list(None).await.unwrap();
    let categories: Vec<&str> = listed.iter().map(|a| a.article.category.as_str()).collect();
    assert_eq!(categories, vec!["Sports", "Politics"]);

    cold.assert_async().await;
    warm_first.assert_async().await;
    warm_third.assert_async().await;
    summaries.assert_async().await;
}
