//! Knowledge retrieval: canonical facts in, matched text fragments out.
//!
//! Retrieval appends in a fixed order and never fails. A fact with no
//! knowledge record contributes nothing; chart producers routinely emit
//! minor stars and relation labels outside the curated tables.

use crate::extract::{CalendarFacts, StarFact, StarFacts};
use crate::knowledge::{
    render_day_branch, render_day_master, render_relation, render_star_in_palace,
    render_transformation_in_palace, Palace,
};
use tracing::debug;

/// Separator between sub-fragments that share one slot.
const PART_SEPARATOR: &str = "\n\n";

/// Matched fragments, grouped by the digest section they feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedKnowledge {
    /// Day-master text followed by the day-branch text.
    pub day_master: String,
    /// Ten-relation texts in pillar order.
    pub relations: Vec<String>,
    pub life: Vec<String>,
    pub career: Vec<String>,
    pub wealth: Vec<String>,
    pub spouse: Vec<String>,
}

impl MatchedKnowledge {
    pub fn is_empty(&self) -> bool {
        self.day_master.is_empty()
            && self.relations.is_empty()
            && self.life.is_empty()
            && self.career.is_empty()
            && self.wealth.is_empty()
            && self.spouse.is_empty()
    }

    /// Append `other` after `self`, slot by slot.
    pub fn merge(mut self, other: MatchedKnowledge) -> MatchedKnowledge {
        self.day_master = join_parts([self.day_master, other.day_master]);
        self.relations.extend(other.relations);
        self.life.extend(other.life);
        self.career.extend(other.career);
        self.wealth.extend(other.wealth);
        self.spouse.extend(other.spouse);
        self
    }

    fn palace_slot(&mut self, palace: Palace) -> Option<&mut Vec<String>> {
        match palace {
            Palace::Life => Some(&mut self.life),
            Palace::Wealth => Some(&mut self.wealth),
            Palace::Career => Some(&mut self.career),
            Palace::Spouse => Some(&mut self.spouse),
            _ => None,
        }
    }
}

/// Join the non-empty parts with a blank line.
fn join_parts(parts: impl IntoIterator<Item = String>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR)
}

/// Retrieve knowledge for the four-pillar chart.
pub fn retrieve_calendar(facts: &CalendarFacts) -> MatchedKnowledge {
    let mut matched = MatchedKnowledge::default();

    // The day branch only rides along with a present day stem.
    if !facts.day_stem.is_empty() {
        let day_master = lookup("day stem", &facts.day_stem, render_day_master);
        let day_branch = lookup("day branch", &facts.day_branch, render_day_branch);
        matched.day_master = join_parts(day_master.into_iter().chain(day_branch));
    }

    for (pillar, label) in facts.relations() {
        if label.is_empty() {
            continue;
        }
        match render_relation(label, pillar) {
            Some(text) => matched.relations.push(text),
            None => debug!(label, pillar = pillar.label(), "no knowledge for relation"),
        }
    }

    matched
}

/// Retrieve knowledge for the star chart, palace by palace.
pub fn retrieve_star(facts: &StarFacts) -> MatchedKnowledge {
    let mut matched = MatchedKnowledge::default();

    for (palace, stars) in facts.retrieval_palaces() {
        for star in stars {
            let text = star_text(star, palace);
            if text.is_empty() {
                continue;
            }
            if let Some(slot) = matched.palace_slot(palace) {
                slot.push(text);
            }
        }
    }

    matched
}

/// Run both retrievers and merge, calendar first.
pub fn retrieve_comprehensive(calendar: &CalendarFacts, star: &StarFacts) -> MatchedKnowledge {
    retrieve_calendar(calendar).merge(retrieve_star(star))
}

/// Star text, then the transformation text for the same palace.
fn star_text(star: &StarFact, palace: Palace) -> String {
    let star_part = render_star_in_palace(&star.name, palace.name());
    if star_part.is_none() {
        debug!(star = %star.name, palace = palace.name(), "no knowledge for star");
    }

    let transformation_part = star.transformation.as_deref().and_then(|label| {
        let text = render_transformation_in_palace(label, palace.name(), &star.name);
        if text.is_none() {
            debug!(label, star = %star.name, "no knowledge for transformation");
        }
        text
    });

    join_parts(star_part.into_iter().chain(transformation_part))
}

fn lookup(what: &str, key: &str, render: fn(&str) -> Option<String>) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    let text = render(key);
    if text.is_none() {
        debug!(key, "no knowledge for {what}");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(day_stem: &str, day_branch: &str) -> CalendarFacts {
        CalendarFacts {
            day_stem: day_stem.to_string(),
            day_branch: day_branch.to_string(),
            year_relation: "正官".to_string(),
            month_relation: String::new(),
            hour_relation: "食神".to_string(),
            four_pillars: String::new(),
        }
    }

    #[test]
    fn test_day_branch_follows_day_master() {
        let matched = retrieve_calendar(&calendar("甲", "子"));
        let master = render_day_master("甲").unwrap();
        let branch = render_day_branch("子").unwrap();
        assert_eq!(matched.day_master, format!("{master}\n\n{branch}"));
    }

    #[test]
    fn test_unknown_stem_contributes_nothing() {
        let matched = retrieve_calendar(&calendar("X", ""));
        assert!(matched.day_master.is_empty());
    }

    #[test]
    fn test_absent_stem_drops_day_branch() {
        let matched = retrieve_calendar(&calendar("", "寅"));
        assert!(matched.day_master.is_empty());

        let facts = CalendarFacts::from_chart(&serde_json::json!({"dayPillar": {"zhi": "寅"}}));
        let digest = crate::Digest::compose(&retrieve_calendar(&facts), &facts, &StarFacts::default());
        assert!(digest.section(crate::SectionKind::DayMaster).is_none());
    }

    #[test]
    fn test_unknown_stem_keeps_day_branch() {
        let matched = retrieve_calendar(&calendar("X", "寅"));
        assert_eq!(matched.day_master, render_day_branch("寅").unwrap());
    }

    #[test]
    fn test_relations_in_pillar_order_skipping_empty() {
        let matched = retrieve_calendar(&calendar("甲", ""));
        assert_eq!(matched.relations.len(), 2);
        assert!(matched.relations[0].starts_with("【年柱正官】"));
        assert!(matched.relations[1].starts_with("【時柱食神】"));
    }

    #[test]
    fn test_unknown_relation_is_skipped() {
        let mut facts = calendar("甲", "");
        facts.year_relation = "日元".to_string();
        let matched = retrieve_calendar(&facts);
        assert_eq!(matched.relations.len(), 1);
    }

    #[test]
    fn test_star_with_transformation() {
        let facts = StarFacts {
            career: vec![StarFact::new("武曲").with_transformation("化權")],
            ..Default::default()
        };
        let matched = retrieve_star(&facts);
        assert_eq!(matched.career.len(), 1);
        let star = render_star_in_palace("武曲", "官祿宮").unwrap();
        let transformation = render_transformation_in_palace("化權", "官祿宮", "武曲").unwrap();
        assert_eq!(matched.career[0], format!("{star}\n\n{transformation}"));
    }

    #[test]
    fn test_minor_stars_are_skipped() {
        let facts = StarFacts {
            life: vec![StarFact::new("文昌"), StarFact::new("紫微")],
            spouse: vec![StarFact::new("左輔")],
            ..Default::default()
        };
        let matched = retrieve_star(&facts);
        assert_eq!(matched.life.len(), 1);
        assert!(matched.life[0].starts_with("【紫微坐命宮】"));
        assert!(matched.spouse.is_empty());
    }

    #[test]
    fn test_body_palace_is_not_retrieved() {
        let facts = StarFacts {
            body: vec![StarFact::new("紫微")],
            ..Default::default()
        };
        assert!(retrieve_star(&facts).is_empty());
    }

    #[test]
    fn test_comprehensive_is_deterministic() {
        let calendar = calendar("丙", "午");
        let star = StarFacts {
            life: vec![StarFact::new("太陽")],
            wealth: vec![StarFact::new("太陰").with_transformation("祿")],
            ..Default::default()
        };
        let first = retrieve_comprehensive(&calendar, &star);
        let second = retrieve_comprehensive(&calendar, &star);
        assert_eq!(first, second);
        assert!(!first.day_master.is_empty());
        assert_eq!(first.life.len(), 1);
        assert_eq!(first.wealth.len(), 1);
    }
}
