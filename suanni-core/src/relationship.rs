//! Pairwise compatibility analysis between two subjects.
//!
//! The element interaction of the two day-masters and the harmony or clash
//! of the two year branches are computed from the knowledge tables; the
//! narrative is one non-streaming completion grounded on those facts.

use crate::extract::{CalendarChartInput, CalendarFacts};
use crate::interpret::{gender_label, Narrator};
use crate::knowledge::{Branch, Element, Pillar, Stem};
use claude::{Message, Request};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Returned when the service answers with no text.
const EMPTY_RESULT: &str = "分析結果生成失敗";

const SYSTEM_PROMPT: &str = "你是一位精通八字命理的專業命理師，專門分析兩人之間的關係契合度。

你的分析風格：
- 專業但親切，少用術語，讓一般人也能理解
- 正面積極，即使有挑戰也給出建設性建議
- 具體實用，給出可操作的相處建議
- 以性格分析和相處之道為主，不渲染迷信

分析時以【命盤互動】提供的日主五行互動與年支合沖為準，不要自行改寫。

輸出格式（Markdown）：
## 🎯 關係總評
## ⚡ 契合度分析
## 💡 相處之道
## ⚠️ 需要注意
## 🌟 這段關係的最佳定位";

/// Errors surfaced before or instead of an analysis.
#[derive(Debug, Error)]
pub enum RelationshipError {
    #[error("Incomplete chart: both parties need a calendar chart")]
    IncompleteChart,

    #[error("Generative service error: {0}")]
    Upstream(#[from] claude::Error),
}

/// Focus of the analysis for a relationship type key.
///
/// Unknown keys are described generically as `<key>關係`.
pub fn relationship_focus(key: &str) -> String {
    let focus = match key {
        "lover" => "情人或配偶關係，重點分析感情契合度、婚姻穩定性、相處模式",
        "crush" => "曖昧對象，重點分析發展的可能、對方心意、適合的追求方式",
        "boss" => "上司或老闆關係，重點分析向上管理、如何獲得賞識、需要避開的地雷",
        "subordinate" => "下屬或部屬關係，重點分析帶人風格、如何激勵對方、潛在挑戰",
        "partner" => "合夥人關係，重點分析合作契合度、分工建議、可能的摩擦點",
        "friend" => "朋友或同事關係，重點分析日常相處、友誼深淺、適合的互動方式",
        "family" => "家人關係，重點分析親情互動、溝通方式、如何化解衝突",
        "client" => "客戶關係，重點分析成交機率、溝通要點、銷售策略建議",
        other => return format!("{other}關係"),
    };
    focus.to_string()
}

/// Birth details of one party.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyBirth {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
    /// Hour label; 未知 when the birth hour is unknown.
    #[serde(default)]
    pub hour: Option<Value>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl PartyBirth {
    fn render(&self) -> String {
        let mut text = String::new();
        if let Some(year) = self.year {
            text.push_str(&format!("{year}年"));
        }
        if let Some(month) = self.month {
            text.push_str(&format!("{month}月"));
        }
        if let Some(day) = self.day {
            text.push_str(&format!("{day}日"));
        }
        let hour = match &self.hour {
            Some(Value::String(hour)) if hour != "未知" && !hour.is_empty() => Some(hour.clone()),
            Some(Value::Number(hour)) => Some(hour.to_string()),
            _ => None,
        };
        if let Some(hour) = hour {
            text.push_str(&format!(" {hour}時"));
        }
        text
    }
}

/// One side of the analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "birthInfo", default)]
    pub birth_info: PartyBirth,
    #[serde(default)]
    pub bazi: Option<Value>,
}

impl Party {
    /// The calendar chart; JSON `null` counts as missing.
    fn chart(&self) -> Option<&Value> {
        self.bazi.as_ref().filter(|bazi| !bazi.is_null())
    }
}

/// A relationship analysis request as posted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipRequest {
    #[serde(default)]
    pub my: Option<Party>,
    #[serde(default)]
    pub partner: Option<Party>,
    #[serde(rename = "relationshipType", default)]
    pub relationship_type: String,
    #[serde(default)]
    pub question: Option<String>,
}

/// How two elements relate in the generating and overcoming cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementInteraction {
    Same(Element),
    Generates { from: Element, to: Element },
    Overcomes { from: Element, to: Element },
}

impl ElementInteraction {
    /// Any two distinct elements are linked by exactly one of the cycles,
    /// in one direction.
    pub fn between(a: Element, b: Element) -> ElementInteraction {
        if a == b {
            ElementInteraction::Same(a)
        } else if a.generates() == b {
            ElementInteraction::Generates { from: a, to: b }
        } else if b.generates() == a {
            ElementInteraction::Generates { from: b, to: a }
        } else if a.overcomes() == b {
            ElementInteraction::Overcomes { from: a, to: b }
        } else {
            ElementInteraction::Overcomes { from: b, to: a }
        }
    }
}

/// Year-branch relation between the two charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRelation {
    /// 六合, with the element the pair combines into.
    Harmony(Element),
    /// 六沖.
    Clash,
    Same,
    Neutral,
}

impl BranchRelation {
    pub fn between(a: Branch, b: Branch) -> BranchRelation {
        let (partner, element) = a.harmony();
        if a == b {
            BranchRelation::Same
        } else if partner == b {
            BranchRelation::Harmony(element)
        } else if a.clash() == b {
            BranchRelation::Clash
        } else {
            BranchRelation::Neutral
        }
    }
}

/// The deterministic facts the narrative is grounded on.
#[derive(Debug, Clone)]
pub struct Compatibility {
    pub my: CalendarFacts,
    pub partner: CalendarFacts,
    pub elements: Option<ElementInteraction>,
    pub year_branches: Option<(Branch, Branch, BranchRelation)>,
}

impl Compatibility {
    pub fn from_charts(my: &Value, partner: &Value) -> Compatibility {
        let my_facts = CalendarFacts::from_chart(my);
        let partner_facts = CalendarFacts::from_chart(partner);

        let elements = my_facts
            .day_master()
            .zip(partner_facts.day_master())
            .map(|(a, b)| ElementInteraction::between(a.element(), b.element()));

        let year_branch =
            |chart: &Value| Branch::from_symbol(CalendarChartInput::decode(chart).branch(Pillar::Year));
        let year_branches = year_branch(my)
            .zip(year_branch(partner))
            .map(|(a, b)| (a, b, BranchRelation::between(a, b)));

        Compatibility {
            my: my_facts,
            partner: partner_facts,
            elements,
            year_branches,
        }
    }

    /// Render the facts as prompt lines, naming each party.
    pub fn render(&self, my_name: &str, partner_name: &str) -> String {
        let mut lines = Vec::new();

        if let (Some(interaction), Some(a), Some(b)) = (
            self.elements,
            self.my.day_master(),
            self.partner.day_master(),
        ) {
            let owner = |element: Element| {
                if element == a.element() {
                    my_name
                } else {
                    partner_name
                }
            };
            lines.push(format!(
                "日主：{my_name}{}{} ／ {partner_name}{}{}",
                a.symbol(),
                a.element().symbol(),
                b.symbol(),
                b.element().symbol()
            ));
            lines.push(match interaction {
                ElementInteraction::Same(element) => format!(
                    "五行互動：兩人同屬{}，性情相近，容易理解彼此，也容易互相較勁。",
                    element.symbol()
                ),
                ElementInteraction::Generates { from, to } => format!(
                    "五行互動：{}生{}，{}的能量滋養{}。",
                    from.symbol(),
                    to.symbol(),
                    owner(from),
                    owner(to)
                ),
                ElementInteraction::Overcomes { from, to } => format!(
                    "五行互動：{}剋{}，{}對{}形成制約與壓力。",
                    from.symbol(),
                    to.symbol(),
                    owner(from),
                    owner(to)
                ),
            });
        }

        if let Some((a, b, relation)) = self.year_branches {
            let reading = match relation {
                BranchRelation::Harmony(element) => {
                    format!("六合（化{}），緣分深厚，彼此容易產生默契。", element.symbol())
                }
                BranchRelation::Clash => "六沖，觀念與步調容易衝突，需要多一分包容。".to_string(),
                BranchRelation::Same => "同支，背景與價值觀相近。".to_string(),
                BranchRelation::Neutral => "無合無沖，緣分平穩。".to_string(),
            };
            lines.push(format!("年支：{}與{}{reading}", a.symbol(), b.symbol()));
        }

        if lines.is_empty() {
            lines.push("（命盤資訊不足，無法判斷合沖）".to_string());
        }
        lines.join("\n")
    }
}

/// Configuration for relationship analysis.
#[derive(Debug, Clone)]
pub struct RelationshipConfig {
    pub model: Option<String>,
    pub max_tokens: usize,
    pub temperature: Option<f32>,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 3000,
            temperature: Some(0.8),
        }
    }
}

/// Response body of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipReport {
    pub interpretation: String,
}

/// Relationship analysis service.
#[derive(Clone)]
pub struct RelationshipAnalyzer {
    narrator: Arc<dyn Narrator>,
    config: RelationshipConfig,
}

impl RelationshipAnalyzer {
    pub fn new(narrator: impl Narrator + 'static) -> Self {
        Self::from_shared(Arc::new(narrator))
    }

    pub fn from_shared(narrator: Arc<dyn Narrator>) -> Self {
        Self {
            narrator,
            config: RelationshipConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RelationshipConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the user prompt, or `IncompleteChart` if either party lacks a
    /// calendar chart.
    pub fn prompt(&self, request: &RelationshipRequest) -> Result<String, RelationshipError> {
        let (Some(my), Some(partner)) = (request.my.as_ref(), request.partner.as_ref()) else {
            return Err(RelationshipError::IncompleteChart);
        };
        let (Some(my_chart), Some(partner_chart)) = (my.chart(), partner.chart()) else {
            return Err(RelationshipError::IncompleteChart);
        };

        let compatibility = Compatibility::from_charts(my_chart, partner_chart);
        let mut prompt = format!(
            "請分析以下兩人的關係：\n\
             \n\
             {my}\n\
             \n\
             {partner}\n\
             \n\
             【命盤互動】\n\
             {interaction}\n\
             \n\
             【關係類型】{focus}\n",
            my = render_party("本人", my, &compatibility.my, my_chart),
            partner = render_party("對方", partner, &compatibility.partner, partner_chart),
            interaction = compatibility.render(&my.name, &partner.name),
            focus = relationship_focus(&request.relationship_type),
        );
        if let Some(question) = request.question.as_deref().filter(|q| !q.trim().is_empty()) {
            prompt.push_str(&format!("\n【特別想了解】{}\n", question.trim()));
        }
        prompt.push_str("\n請根據八字命理，深入分析這兩人的關係，給出專業且實用的建議。");
        Ok(prompt)
    }

    /// Run the analysis as one non-streaming completion.
    pub async fn analyze(
        &self,
        request: &RelationshipRequest,
    ) -> Result<RelationshipReport, RelationshipError> {
        let prompt = self.prompt(request)?;

        let mut api_request = Request::new(vec![Message::user(prompt)])
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(self.config.max_tokens);
        if let Some(ref model) = self.config.model {
            api_request = api_request.with_model(model);
        }
        if let Some(temp) = self.config.temperature {
            api_request = api_request.with_temperature(temp);
        }

        let text = self
            .narrator
            .complete(api_request)
            .await
            .inspect_err(|e| warn!(error = %e, "relationship analysis failed upstream"))?;
        info!(
            relationship = %request.relationship_type,
            chars = text.chars().count(),
            "relationship analysis complete"
        );

        let interpretation = if text.trim().is_empty() {
            EMPTY_RESULT.to_string()
        } else {
            text
        };
        Ok(RelationshipReport { interpretation })
    }
}

fn render_party(role: &str, party: &Party, facts: &CalendarFacts, chart: &Value) -> String {
    let element = facts
        .day_master()
        .map(|stem: Stem| stem.element().symbol())
        .unwrap_or("");
    let useful_god = chart
        .get("yongShen")
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .unwrap_or("未知");

    format!(
        "【{role}】{name}\n\
         - 出生：{birth}\n\
         - 性別：{gender}\n\
         - 八字：{pillars}\n\
         - 日主：{day_stem}（{element}）\n\
         - 用神：{useful_god}",
        name = party.name,
        birth = party.birth_info.render(),
        gender = gender_label(party.birth_info.gender.as_deref()),
        pillars = facts.four_pillars,
        day_stem = facts.day_stem,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedNarrator, ScriptedReply};
    use serde_json::json;

    fn request(my_bazi: Value, partner_bazi: Value) -> RelationshipRequest {
        serde_json::from_value(json!({
            "my": {
                "name": "小明",
                "birthInfo": {"year": 1990, "month": 5, "day": 1, "hour": "未知", "gender": "male"},
                "bazi": my_bazi
            },
            "partner": {
                "name": "小華",
                "birthInfo": {"year": 1992, "month": 8, "day": 9, "hour": "午", "gender": "female"},
                "bazi": partner_bazi
            },
            "relationshipType": "partner",
            "question": "適合一起創業嗎？"
        }))
        .unwrap()
    }

    fn chart(year_branch: &str, day_stem: &str) -> Value {
        json!({
            "yearPillar": {"gan": "庚", "zhi": year_branch},
            "monthPillar": {"gan": "戊", "zhi": "子"},
            "dayPillar": {"gan": day_stem, "zhi": "寅"},
            "hourPillar": {"gan": "丙", "zhi": "寅"},
            "yongShen": "水"
        })
    }

    #[test]
    fn test_relationship_focus() {
        assert!(relationship_focus("lover").starts_with("情人或配偶關係"));
        assert_eq!(relationship_focus("neighbor"), "neighbor關係");
    }

    #[test]
    fn test_element_interaction_covers_all_pairs() {
        let elements = [
            Element::Wood,
            Element::Fire,
            Element::Earth,
            Element::Metal,
            Element::Water,
        ];
        for a in elements {
            for b in elements {
                let forward = ElementInteraction::between(a, b);
                assert_eq!(forward, ElementInteraction::between(b, a));
            }
        }
        assert_eq!(
            ElementInteraction::between(Element::Water, Element::Wood),
            ElementInteraction::Generates {
                from: Element::Water,
                to: Element::Wood
            }
        );
        assert_eq!(
            ElementInteraction::between(Element::Wood, Element::Metal),
            ElementInteraction::Overcomes {
                from: Element::Metal,
                to: Element::Wood
            }
        );
    }

    #[test]
    fn test_branch_relation() {
        assert_eq!(
            BranchRelation::between(Branch::Zi, Branch::Chou),
            BranchRelation::Harmony(Element::Earth)
        );
        assert_eq!(
            BranchRelation::between(Branch::Zi, Branch::Wu),
            BranchRelation::Clash
        );
        assert_eq!(
            BranchRelation::between(Branch::Yin, Branch::Yin),
            BranchRelation::Same
        );
        assert_eq!(
            BranchRelation::between(Branch::Zi, Branch::Yin),
            BranchRelation::Neutral
        );
    }

    #[test]
    fn test_prompt_is_grounded() {
        let analyzer = RelationshipAnalyzer::new(ScriptedNarrator::new(vec![]));
        let prompt = analyzer
            .prompt(&request(chart("子", "甲"), chart("午", "壬")))
            .unwrap();

        assert!(prompt.contains("【本人】小明"));
        assert!(prompt.contains("- 出生：1990年5月1日\n"));
        assert!(prompt.contains("- 出生：1992年8月9日 午時"));
        assert!(prompt.contains("- 日主：甲（木）"));
        assert!(prompt.contains("- 用神：水"));
        assert!(prompt.contains("五行互動：水生木，小華的能量滋養小明。"));
        assert!(prompt.contains("年支：子與午六沖"));
        assert!(prompt.contains("【關係類型】合夥人關係"));
        assert!(prompt.contains("【特別想了解】適合一起創業嗎？"));
    }

    #[test]
    fn test_missing_chart_is_rejected() {
        let analyzer = RelationshipAnalyzer::new(ScriptedNarrator::new(vec![]));
        let mut req = request(chart("子", "甲"), Value::Null);
        assert!(matches!(
            analyzer.prompt(&req),
            Err(RelationshipError::IncompleteChart)
        ));
        req.partner = None;
        assert!(matches!(
            analyzer.prompt(&req),
            Err(RelationshipError::IncompleteChart)
        ));
    }

    #[tokio::test]
    async fn test_analyze_uses_relationship_config() {
        let narrator = Arc::new(ScriptedNarrator::new(vec![ScriptedReply::text("## 🎯 關係總評")]));
        let analyzer = RelationshipAnalyzer::from_shared(narrator.clone());

        let report = analyzer
            .analyze(&request(chart("寅", "丙"), chart("亥", "丁")))
            .await
            .unwrap();
        assert_eq!(report.interpretation, "## 🎯 關係總評");

        let sent = narrator.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].max_tokens, 3000);
        assert_eq!(sent[0].temperature, Some(0.8));
    }

    #[tokio::test]
    async fn test_analyze_surfaces_upstream_failure() {
        let analyzer =
            RelationshipAnalyzer::new(ScriptedNarrator::new(vec![ScriptedReply::refuse(500)]));
        let result = analyzer
            .analyze(&request(chart("子", "甲"), chart("午", "壬")))
            .await;
        assert!(matches!(result, Err(RelationshipError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_empty_answer_falls_back() {
        let analyzer = RelationshipAnalyzer::new(ScriptedNarrator::new(vec![ScriptedReply::text(" ")]));
        let report = analyzer
            .analyze(&request(chart("子", "甲"), chart("午", "壬")))
            .await
            .unwrap();
        assert_eq!(report.interpretation, EMPTY_RESULT);
    }
}
