//! Integration tests that call the real Claude API.
//!
//! These tests require ANTHROPIC_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p suanni-core --test api_integration -- --ignored`

use claude::Claude;
use futures::StreamExt;
use serde_json::json;
use suanni_core::{
    InterpretConfig, InterpretRequest, Interpreter, RelationshipAnalyzer, RelationshipConfig,
    RelationshipRequest, RelayEvent,
};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("ANTHROPIC_API_KEY").is_ok()
}

fn bazi(year: (&str, &str), day: (&str, &str)) -> serde_json::Value {
    json!({
        "yearPillar": {"gan": year.0, "zhi": year.1},
        "monthPillar": {"gan": "戊", "zhi": "子"},
        "dayPillar": {"gan": day.0, "zhi": day.1},
        "hourPillar": {"gan": "丙", "zhi": "寅"},
        "yearShiShen": "七殺",
        "monthShiShen": "偏財",
        "hourShiShen": "食神"
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -p suanni-core --test api_integration -- --ignored
async fn test_interpretation_streams_text() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    // Keep the report short
    let interpreter = Interpreter::from_env()
        .expect("Failed to create interpreter")
        .with_config(InterpretConfig {
            max_tokens: 512,
            ..InterpretConfig::default()
        });

    let request: InterpretRequest = serde_json::from_value(json!({
        "baziResult": bazi(("庚", "午"), ("甲", "寅")),
        "ziweiChart": {
            "palaces": [
                {"name": "命宮", "mainStars": ["紫微", "天府"]},
                {"name": "官祿宮", "mainStars": [{"name": "太陽", "siHua": "化權"}]}
            ],
            "wuXingJu": {"name": "金四局"}
        },
        "birthInfo": {"year": 1990, "gender": "male"}
    }))
    .expect("request should deserialize");

    let events: Vec<RelayEvent> = interpreter
        .interpret(&request)
        .await
        .expect("interpretation should start")
        .collect()
        .await;

    let text: String = events
        .iter()
        .filter_map(|event| match event {
            RelayEvent::Text(text) => Some(text.as_str()),
            RelayEvent::Done => None,
        })
        .collect();

    println!("Interpretation: {text}");
    assert!(!text.is_empty(), "should stream some text");
    assert_eq!(events.last(), Some(&RelayEvent::Done));
    assert_eq!(events.iter().filter(|event| event.is_done()).count(), 1);
}

#[tokio::test]
#[ignore]
async fn test_relationship_analysis_with_real_api() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let claude = Claude::from_env().expect("Failed to create client");
    let analyzer = RelationshipAnalyzer::new(claude).with_config(RelationshipConfig {
        max_tokens: 512,
        ..RelationshipConfig::default()
    });

    let request: RelationshipRequest = serde_json::from_value(json!({
        "my": {
            "name": "小明",
            "birthInfo": {"year": 1990, "month": 5, "day": 12, "hour": "未知", "gender": "male"},
            "bazi": bazi(("庚", "午"), ("甲", "寅"))
        },
        "partner": {
            "name": "小華",
            "birthInfo": {"year": 1992, "month": 8, "day": 3, "hour": 14, "gender": "female"},
            "bazi": bazi(("壬", "申"), ("己", "卯"))
        },
        "relationshipType": "lover",
        "question": "我們適合長期相處嗎？"
    }))
    .expect("request should deserialize");

    let report = analyzer
        .analyze(&request)
        .await
        .expect("analysis should succeed");

    println!("Relationship: {}", report.interpretation);
    assert!(!report.interpretation.is_empty());
}
