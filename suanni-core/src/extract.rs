//! Fact extraction from chart objects of varying shape.
//!
//! Chart producers disagree on field names. Each chart is decoded once into
//! an input variant at this boundary, and every downstream stage only ever
//! sees the canonical fact records built here. Missing fields degrade to
//! empty strings and empty lists; nothing in this module fails.

use crate::knowledge::{Palace, Pillar, Stem};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Accepted names for a pillar's stem field.
const STEM_KEYS: [&str; 3] = ["gan", "stem", "tiangan"];

/// Accepted names for a pillar's branch field.
const BRANCH_KEYS: [&str; 3] = ["zhi", "branch", "dizhi"];

/// First non-empty string among `keys` on `object`, trimmed.
fn str_field<'a>(object: Option<&'a Value>, keys: &[&str]) -> &'a str {
    object
        .and_then(|object| {
            keys.iter().find_map(|key| {
                object
                    .get(*key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
            })
        })
        .unwrap_or("")
}

// ============================================================================
// Calendar chart
// ============================================================================

/// The two field-naming conventions a calendar chart arrives in.
#[derive(Debug, Clone, Copy)]
pub enum CalendarChartInput<'a> {
    /// Pillars under `yearPillar`, `monthPillar`, `dayPillar`, `hourPillar`.
    Legacy(&'a Map<String, Value>),
    /// Pillars under `year`, `month`, `day`, `hour`.
    Current(&'a Map<String, Value>),
    /// Not an object at all.
    Empty,
}

impl<'a> CalendarChartInput<'a> {
    /// Classify a chart by the pillar keys it carries.
    pub fn decode(chart: &'a Value) -> Self {
        match chart.as_object() {
            Some(map)
                if Pillar::ALL
                    .iter()
                    .any(|pillar| map.contains_key(legacy_key(*pillar))) =>
            {
                CalendarChartInput::Legacy(map)
            }
            Some(map) => CalendarChartInput::Current(map),
            None => CalendarChartInput::Empty,
        }
    }

    /// The pillar object, preferring this variant's key and falling back to
    /// the other convention's.
    fn pillar(&self, pillar: Pillar) -> Option<&'a Value> {
        let (primary, fallback, map) = match self {
            CalendarChartInput::Legacy(map) => (legacy_key(pillar), current_key(pillar), map),
            CalendarChartInput::Current(map) => (current_key(pillar), legacy_key(pillar), map),
            CalendarChartInput::Empty => return None,
        };
        map.get(primary)
            .filter(|value| value.is_object())
            .or_else(|| map.get(fallback).filter(|value| value.is_object()))
    }

    /// Stem symbol of a pillar, or empty.
    pub fn stem(&self, pillar: Pillar) -> &'a str {
        str_field(self.pillar(pillar), &STEM_KEYS)
    }

    /// Branch symbol of a pillar, or empty.
    pub fn branch(&self, pillar: Pillar) -> &'a str {
        str_field(self.pillar(pillar), &BRANCH_KEYS)
    }

    /// Ten-relation label for a non-day pillar: `yearShiShen` at the top
    /// level, or `shiShen` on the pillar object.
    fn relation(&self, pillar: Pillar) -> &'a str {
        let map = match self {
            CalendarChartInput::Legacy(map) | CalendarChartInput::Current(map) => *map,
            CalendarChartInput::Empty => return "",
        };
        let top_level = match pillar {
            Pillar::Year => "yearShiShen",
            Pillar::Month => "monthShiShen",
            Pillar::Hour => "hourShiShen",
            Pillar::Day => return "",
        };
        let label = map.get(top_level).and_then(Value::as_str).map(str::trim);
        match label {
            Some(label) if !label.is_empty() => label,
            _ => str_field(self.pillar(pillar), &["shiShen"]),
        }
    }
}

fn legacy_key(pillar: Pillar) -> &'static str {
    match pillar {
        Pillar::Year => "yearPillar",
        Pillar::Month => "monthPillar",
        Pillar::Day => "dayPillar",
        Pillar::Hour => "hourPillar",
    }
}

fn current_key(pillar: Pillar) -> &'static str {
    match pillar {
        Pillar::Year => "year",
        Pillar::Month => "month",
        Pillar::Day => "day",
        Pillar::Hour => "hour",
    }
}

/// Canonical facts of a four-pillar chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFacts {
    pub day_stem: String,
    pub day_branch: String,
    pub year_relation: String,
    pub month_relation: String,
    pub hour_relation: String,
    /// The four pillars as `干支` pairs separated by spaces.
    pub four_pillars: String,
}

impl CalendarFacts {
    pub fn from_chart(chart: &Value) -> Self {
        Self::from_input(CalendarChartInput::decode(chart))
    }

    pub fn from_input(input: CalendarChartInput<'_>) -> Self {
        let four_pillars = Pillar::ALL
            .iter()
            .map(|pillar| format!("{}{}", input.stem(*pillar), input.branch(*pillar)))
            .collect::<Vec<_>>()
            .join(" ");

        let facts = Self {
            day_stem: input.stem(Pillar::Day).to_string(),
            day_branch: input.branch(Pillar::Day).to_string(),
            year_relation: input.relation(Pillar::Year).to_string(),
            month_relation: input.relation(Pillar::Month).to_string(),
            hour_relation: input.relation(Pillar::Hour).to_string(),
            four_pillars,
        };

        if facts.day_stem.is_empty() {
            debug!("calendar chart carries no day stem");
        }
        facts
    }

    /// The day-master, if the day stem is a valid stem symbol.
    pub fn day_master(&self) -> Option<Stem> {
        Stem::from_symbol(&self.day_stem)
    }

    /// Relation labels in pillar order (year, month, hour).
    pub fn relations(&self) -> [(Pillar, &str); 3] {
        [
            (Pillar::Year, self.year_relation.as_str()),
            (Pillar::Month, self.month_relation.as_str()),
            (Pillar::Hour, self.hour_relation.as_str()),
        ]
    }
}

// ============================================================================
// Star chart
// ============================================================================

/// The two palace-list conventions a star chart arrives in.
#[derive(Debug, Clone, Copy)]
pub enum StarChartInput<'a> {
    /// Entries under `palaces`, named by `name`.
    Palaces(&'a [Value]),
    /// Entries under `gongs`, named by `gongName`.
    Gongs(&'a [Value]),
    Empty,
}

impl<'a> StarChartInput<'a> {
    pub fn decode(chart: &'a Value) -> Self {
        if let Some(list) = chart.get("palaces").and_then(Value::as_array) {
            StarChartInput::Palaces(list)
        } else if let Some(list) = chart.get("gongs").and_then(Value::as_array) {
            StarChartInput::Gongs(list)
        } else {
            StarChartInput::Empty
        }
    }

    fn entry_name(&self, entry: &'a Value) -> &'a str {
        match self {
            StarChartInput::Palaces(_) => str_field(Some(entry), &["name", "gongName"]),
            StarChartInput::Gongs(_) => str_field(Some(entry), &["gongName", "name"]),
            StarChartInput::Empty => "",
        }
    }

    /// The first entry whose name normalizes to `palace`.
    fn find(&self, palace: Palace) -> Option<&'a Value> {
        let entries: &'a [Value] = match self {
            StarChartInput::Palaces(list) | StarChartInput::Gongs(list) => *list,
            StarChartInput::Empty => &[],
        };
        entries
            .iter()
            .find(|entry| Palace::from_name(self.entry_name(*entry)) == Some(palace))
    }

    /// Occupant stars of a palace; empty when the palace is absent.
    fn stars(&self, palace: Option<Palace>) -> Vec<StarFact> {
        let Some(palace) = palace else {
            return Vec::new();
        };
        let Some(entry) = self.find(palace) else {
            debug!(palace = palace.name(), "star chart has no entry for palace");
            return Vec::new();
        };
        entry
            .get("mainStars")
            .or_else(|| entry.get("stars"))
            .and_then(Value::as_array)
            .map(|stars| stars.iter().filter_map(StarFact::from_value).collect())
            .unwrap_or_default()
    }
}

/// One occupant star, with its transformation label when it carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarFact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
}

impl StarFact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transformation: None,
        }
    }

    pub fn with_transformation(mut self, label: impl Into<String>) -> Self {
        self.transformation = Some(label.into());
        self
    }

    /// A star is either a bare name or `{name, siHua}`.
    fn from_value(value: &Value) -> Option<StarFact> {
        let fact = match value {
            Value::String(name) => StarFact::new(name.trim()),
            Value::Object(_) => {
                let label = str_field(Some(value), &["siHua", "transformation"]);
                StarFact {
                    name: str_field(Some(value), &["name"]).to_string(),
                    transformation: (!label.is_empty()).then(|| label.to_string()),
                }
            }
            _ => return None,
        };
        (!fact.name.is_empty()).then_some(fact)
    }
}

/// Canonical facts of a twelve-palace star chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarFacts {
    pub life: Vec<StarFact>,
    pub body: Vec<StarFact>,
    pub wealth: Vec<StarFact>,
    pub career: Vec<StarFact>,
    pub spouse: Vec<StarFact>,
    /// 五行局 label, e.g. 水二局.
    pub element_phase: String,
}

impl StarFacts {
    pub fn from_chart(chart: &Value) -> Self {
        let input = StarChartInput::decode(chart);
        if matches!(input, StarChartInput::Empty) {
            debug!("star chart has no palace list");
        }

        Self {
            life: input.stars(Some(Palace::Life)),
            body: input.stars(body_palace(chart)),
            wealth: input.stars(Some(Palace::Wealth)),
            career: input.stars(Some(Palace::Career)),
            spouse: input.stars(Some(Palace::Spouse)),
            element_phase: name_or_string(chart.get("wuXingJu"), &["name"]).to_string(),
        }
    }

    /// Palaces the retriever reads, in retrieval order.
    pub fn retrieval_palaces(&self) -> [(Palace, &[StarFact]); 4] {
        [
            (Palace::Life, self.life.as_slice()),
            (Palace::Wealth, self.wealth.as_slice()),
            (Palace::Career, self.career.as_slice()),
            (Palace::Spouse, self.spouse.as_slice()),
        ]
    }
}

/// The body palace (身宮) is named by `shenGong`, either a string or an
/// object with `gongName` / `name`.
fn body_palace(chart: &Value) -> Option<Palace> {
    Palace::from_name(name_or_string(chart.get("shenGong"), &["gongName", "name"]))
}

fn name_or_string<'a>(value: Option<&'a Value>, keys: &[&str]) -> &'a str {
    match value {
        Some(Value::String(text)) => text.trim(),
        other => str_field(other, keys),
    }
}
