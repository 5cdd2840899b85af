//! Drives the orchestrator through the real extraction pipeline with a
//! scripted generative service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use cbhunt_core::{BrandSearchConfig, MissionConfig, TrendConfig};
use cbhunt_extract::{
    ExtractError, ExtractionPipeline, GenerationRequest, GenerationResponse, GenerativeService,
    RetryPolicy,
};
use cbhunt_store::{CollectionStore, MemoryStore};
use cbhunt_workflow::{Completion, Orchestrator, Phase, WorkflowError};
use serde_json::json;

struct Scripted {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicU32,
}

impl Scripted {
    fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicU32::new(0),
        }
    }
}

impl GenerativeService for Scripted {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "[]".to_string());
        Ok(GenerationResponse {
            text,
            grounding_metadata: None,
        })
    }
}

fn pipeline(replies: Vec<String>) -> ExtractionPipeline<Scripted> {
    ExtractionPipeline::new(Scripted::new(replies), RetryPolicy::new(2, 0))
}

async fn orchestrator() -> Orchestrator<MemoryStore> {
    Orchestrator::new(CollectionStore::open(MemoryStore::new(), None).await.unwrap())
}

fn nike_case(rights: serde_json::Value) -> String {
    json!([{
        "projectName": "Nike x Sacai",
        "brandName": "Nike",
        "partnerIntro": "Sacai",
        "productName": "LDWaffle",
        "date": "2019.09",
        "rights": rights,
        "insight": "解构主义",
        "platformSource": "官网",
        "sourceUrls": []
    }])
    .to_string()
}

fn nike() -> MissionConfig {
    MissionConfig::BrandSearch(BrandSearchConfig {
        brand_name: "Nike".to_string(),
        keywords: vec![],
        platforms: vec![],
    })
}

#[tokio::test]
async fn empty_rights_are_retried_until_valid() {
    let p = pipeline(vec![
        nike_case(json!([])),
        format!("```json\n{}\n```", nike_case(json!([{"title": "鞋盒", "description": "双色"}]))),
    ]);
    let mut o = orchestrator().await;
    let completion = o.run_mission(&p, nike(), None).await.unwrap();
    assert_eq!(completion, Completion::Applied(Phase::Reviewing));
    assert_eq!(o.review_cases()[0].rights[0].title, "鞋盒");

    let notebook = o.confirm_review(&[0]).await.unwrap();
    assert_eq!(o.store().get(&notebook).unwrap().cases.len(), 1);
}

#[tokio::test]
async fn exhausted_retries_end_in_error() {
    let p = pipeline(vec![nike_case(json!([])); 3]);
    let mut o = orchestrator().await;
    let err = o.run_mission(&p, nike(), None).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::MissionFailed(ExtractError::Validation(_))
    ));
    assert_eq!(o.phase(), Phase::Error);
    assert!(o.error().unwrap().contains("rights"));
}

#[tokio::test]
async fn empty_trend_reply_is_ready_with_no_items() {
    let p = pipeline(vec!["[]".to_string()]);
    let mut o = orchestrator().await;
    let config = MissionConfig::Trend(TrendConfig {
        topic: "咖啡".to_string(),
        time_scale: "this year".to_string(),
        limit: 10,
        keywords: vec!["联名".to_string()],
        platforms: vec![],
    });
    let completion = o.run_mission(&p, config, None).await.unwrap();
    assert_eq!(completion, Completion::Applied(Phase::TrendResultsReady));
    assert!(o.trend_results().is_empty());
}
