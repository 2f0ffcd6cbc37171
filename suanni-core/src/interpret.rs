//! Request-level orchestration of the grounded interpretation.
//!
//! [`Interpreter`] runs extraction, retrieval and composition, sends the
//! digest to the generative service through a [`Narrator`], and hands back
//! the relayed event stream. It fails only before streaming starts.

use crate::digest::Digest;
use crate::extract::{CalendarFacts, StarFacts};
use crate::relay::{relay_stream, RelayStream};
use crate::retrieve::retrieve_comprehensive;
use async_trait::async_trait;
use chrono::Datelike;
use claude::{ByteStream, Claude, Message, Request};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Birth year assumed when the request carries none.
pub const DEFAULT_BIRTH_YEAR: i32 = 1990;

/// Instructions for the report writer.
pub const SYSTEM_PROMPT: &str = "你是一位命理報告撰寫師。

【你的角色】
你不負責推算命理。命理知識已經由系統查好並提供給你，你的工作是：
1. 將這些知識組織成流暢的文章
2. 用生動、貼近讀者的語言表達
3. 串聯八字與紫微兩套觀點

【規則】
- 不要自行發明或推測命理內容
- 所有命理解讀必須來自「知識庫內容」
- 知識庫沒有提到的，就不要寫
- 日主、主星、宮位以「=== 命盤摘要 ===」為準，不能寫錯
- 「=== 日主特性（八字核心）===」與「=== 命宮主星（紫微核心）===」是命格總論的依據

【輸出格式】
1. ☯️ 命格總論（根據日主與命宮主星）
2. 🎭 性格深度剖析（整合日主與主星的性格特點）
3. 💼 事業財運（根據官祿宮、財帛宮）
4. ❤️ 感情姻緣（根據夫妻宮與十神）
5. 🩺 健康提醒（根據日主的健康重點）
6. 🎯 趨吉避凶建議（整合各段「需要注意」）
7. 🏁 結語

字數：1500 至 2500 字。";

/// Errors surfaced before any event is streamed.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("Missing chart: both the calendar chart and the star chart are required")]
    MissingChart,

    #[error("Generative service error: {0}")]
    Upstream(#[from] claude::Error),
}

/// The generative service, as the pipeline sees it.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Open a streaming completion. A non-success status must surface here,
    /// before any bytes are returned.
    async fn open_stream(&self, request: Request) -> Result<ByteStream, claude::Error>;

    /// Run a non-streaming completion and return its text.
    async fn complete(&self, request: Request) -> Result<String, claude::Error>;
}

#[async_trait]
impl Narrator for Claude {
    async fn open_stream(&self, request: Request) -> Result<ByteStream, claude::Error> {
        self.stream_raw(request).await
    }

    async fn complete(&self, request: Request) -> Result<String, claude::Error> {
        Ok(Claude::complete(self, request).await?.text)
    }
}

/// Subject details quoted in the prompt header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirthInfo {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl BirthInfo {
    pub fn birth_year(&self) -> i32 {
        self.year.unwrap_or(DEFAULT_BIRTH_YEAR)
    }

    pub fn age(&self, current_year: i32) -> i32 {
        current_year.saturating_sub(self.birth_year())
    }

    pub fn gender_label(&self) -> &'static str {
        gender_label(self.gender.as_deref())
    }
}

/// 男 for "male", 女 for anything else.
pub fn gender_label(gender: Option<&str>) -> &'static str {
    match gender {
        Some("male") => "男",
        _ => "女",
    }
}

/// One interpretation request as posted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterpretRequest {
    #[serde(rename = "baziResult", default)]
    pub calendar_chart: Option<Value>,
    #[serde(rename = "ziweiChart", default)]
    pub star_chart: Option<Value>,
    #[serde(rename = "birthInfo", default)]
    pub birth_info: Option<BirthInfo>,
}

fn present(chart: &Option<Value>) -> Option<&Value> {
    chart.as_ref().filter(|value| !value.is_null())
}

impl InterpretRequest {
    /// Both charts, or `MissingChart`. JSON `null` counts as missing.
    fn charts(&self) -> Result<(&Value, &Value), InterpretError> {
        match (present(&self.calendar_chart), present(&self.star_chart)) {
            (Some(calendar), Some(star)) => Ok((calendar, star)),
            _ => Err(InterpretError::MissingChart),
        }
    }
}

/// Configuration for the interpreter.
#[derive(Debug, Clone)]
pub struct InterpretConfig {
    /// Overrides the client's default model.
    pub model: Option<String>,

    /// Maximum tokens for the report.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Replaces [`SYSTEM_PROMPT`].
    pub custom_system_prompt: Option<String>,
}

impl Default for InterpretConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 8000,
            temperature: None,
            custom_system_prompt: None,
        }
    }
}

/// Everything the generative request is built from.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub calendar: CalendarFacts,
    pub star: StarFacts,
    pub digest: Digest,
    pub system: String,
    pub user: String,
}

/// Grounded interpretation service.
#[derive(Clone)]
pub struct Interpreter {
    narrator: Arc<dyn Narrator>,
    config: InterpretConfig,
}

impl Interpreter {
    pub fn new(narrator: impl Narrator + 'static) -> Self {
        Self::from_shared(Arc::new(narrator))
    }

    pub fn from_shared(narrator: Arc<dyn Narrator>) -> Self {
        Self {
            narrator,
            config: InterpretConfig::default(),
        }
    }

    /// Create an interpreter backed by Claude, keyed from ANTHROPIC_API_KEY.
    pub fn from_env() -> Result<Self, InterpretError> {
        Ok(Self::new(Claude::from_env()?))
    }

    pub fn with_config(mut self, config: InterpretConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &InterpretConfig {
        &self.config
    }

    /// Extract, retrieve and compose, then render both prompts.
    pub fn prepare(&self, request: &InterpretRequest) -> Result<PreparedPrompt, InterpretError> {
        self.prepare_for_year(request, chrono::Local::now().year())
    }

    /// [`prepare`](Self::prepare) with a fixed current year.
    pub fn prepare_for_year(
        &self,
        request: &InterpretRequest,
        current_year: i32,
    ) -> Result<PreparedPrompt, InterpretError> {
        let (calendar_chart, star_chart) = request.charts()?;

        let calendar = CalendarFacts::from_chart(calendar_chart);
        let star = StarFacts::from_chart(star_chart);
        let matched = retrieve_comprehensive(&calendar, &star);
        let digest = Digest::compose(&matched, &calendar, &star);

        let birth = request.birth_info.clone().unwrap_or_default();
        let user = render_user_prompt(&digest, &calendar, &birth, current_year);
        let system = self
            .config
            .custom_system_prompt
            .clone()
            .unwrap_or_else(|| SYSTEM_PROMPT.to_string());

        Ok(PreparedPrompt {
            calendar,
            star,
            digest,
            system,
            user,
        })
    }

    /// Prepare, open the upstream stream, and relay it.
    ///
    /// Missing charts and upstream refusals are returned as errors; once
    /// this returns `Ok`, the stream always ends with exactly one
    /// [`RelayEvent::Done`](crate::relay::RelayEvent::Done).
    pub async fn interpret(&self, request: &InterpretRequest) -> Result<RelayStream, InterpretError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("interpret", %request_id);

        async move {
            let prepared = self.prepare(request)?;
            info!(
                day_master = %prepared.calendar.day_stem,
                sections = prepared.digest.sections.len(),
                "digest composed"
            );

            let upstream = self
                .narrator
                .open_stream(self.build_request(&prepared))
                .await
                .inspect_err(|e| warn!(error = %e, "generative service refused the request"))?;

            info!("relaying interpretation stream");
            Ok(relay_stream(upstream))
        }
        .instrument(span)
        .await
    }

    fn build_request(&self, prepared: &PreparedPrompt) -> Request {
        let mut request = Request::new(vec![Message::user(&prepared.user)])
            .with_system(&prepared.system)
            .with_max_tokens(self.config.max_tokens);

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }

        if let Some(temp) = self.config.temperature {
            request = request.with_temperature(temp);
        }

        request
    }
}

/// The user prompt: subject header, digest, closing instructions, and a
/// reminder naming the day-master verbatim.
fn render_user_prompt(
    digest: &Digest,
    calendar: &CalendarFacts,
    birth: &BirthInfo,
    current_year: i32,
) -> String {
    format!(
        "請為以下命主撰寫命理報告：\n\
         \n\
         【命主資訊】\n\
         出生年：{birth_year}年\n\
         現年：{age}歲\n\
         性別：{gender}\n\
         \n\
         {digest}\n\
         \n\
         ---\n\
         \n\
         請根據上面的「知識庫內容」撰寫報告。\n\
         ⚠️ 所有命理解讀必須來自上面提供的知識，不要自己發明！\n\
         ⚠️ 日主是「{day_master}」，不能寫錯！",
        birth_year = birth.birth_year(),
        age = birth.age(current_year),
        gender = birth.gender_label(),
        digest = digest.render(),
        day_master = calendar.day_stem,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedNarrator;
    use serde_json::json;

    fn request() -> InterpretRequest {
        serde_json::from_value(json!({
            "baziResult": {
                "dayPillar": {"gan": "甲", "zhi": "子"},
                "yearPillar": {"gan": "庚", "zhi": "午"},
                "yearShiShen": "七殺"
            },
            "ziweiChart": {
                "palaces": [{"name": "命宮", "mainStars": ["紫微"]}],
                "wuXingJu": {"name": "水二局"}
            },
            "birthInfo": {"year": 1988, "gender": "male"}
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_chart() {
        let interpreter = Interpreter::new(ScriptedNarrator::new(vec![]));
        let mut req = request();
        req.star_chart = None;
        assert!(matches!(
            interpreter.prepare(&req),
            Err(InterpretError::MissingChart)
        ));

        let req: InterpretRequest =
            serde_json::from_value(json!({"baziResult": null, "ziweiChart": {}})).unwrap();
        assert!(matches!(
            interpreter.prepare(&req),
            Err(InterpretError::MissingChart)
        ));

        let mut req = request();
        req.calendar_chart = Some(Value::Null);
        assert!(matches!(
            interpreter.prepare(&req),
            Err(InterpretError::MissingChart)
        ));
        assert!(interpreter.prepare(&request()).is_ok());
    }

    #[test]
    fn test_user_prompt_layout() {
        let interpreter = Interpreter::new(ScriptedNarrator::new(vec![]));
        let prepared = interpreter.prepare_for_year(&request(), 2026).unwrap();

        assert!(prepared.user.starts_with("請為以下命主撰寫命理報告："));
        assert!(prepared.user.contains("出生年：1988年\n現年：38歲\n性別：男"));
        assert!(prepared.user.contains(&prepared.digest.render()));
        assert!(prepared.user.ends_with("⚠️ 日主是「甲」，不能寫錯！"));
        assert_eq!(prepared.system, SYSTEM_PROMPT);
    }

    #[test]
    fn test_birth_info_defaults() {
        let birth = BirthInfo::default();
        assert_eq!(birth.birth_year(), DEFAULT_BIRTH_YEAR);
        assert_eq!(birth.age(2026), 36);
        assert_eq!(birth.gender_label(), "女");
    }

    #[test]
    fn test_age_saturates_on_absurd_year() {
        let birth = BirthInfo {
            year: Some(i32::MIN),
            gender: None,
        };
        assert_eq!(birth.age(2026), i32::MAX);
    }

    #[test]
    fn test_custom_system_prompt() {
        let interpreter = Interpreter::new(ScriptedNarrator::new(vec![])).with_config(InterpretConfig {
            custom_system_prompt: Some("簡短回答".to_string()),
            ..Default::default()
        });
        let prepared = interpreter.prepare(&request()).unwrap();
        assert_eq!(prepared.system, "簡短回答");
    }

    #[test]
    fn test_request_carries_config() {
        let interpreter = Interpreter::new(ScriptedNarrator::new(vec![])).with_config(InterpretConfig {
            model: Some("claude-test".to_string()),
            temperature: Some(0.3),
            ..Default::default()
        });
        let prepared = interpreter.prepare(&request()).unwrap();
        let built = interpreter.build_request(&prepared);
        assert_eq!(built.model.as_deref(), Some("claude-test"));
        assert_eq!(built.max_tokens, 8000);
        assert_eq!(built.temperature, Some(0.3));
        assert_eq!(built.messages.len(), 1);
    }
}
