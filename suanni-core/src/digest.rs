//! Digest composition.
//!
//! The rendered digest is embedded verbatim in the generative request, and
//! the system prompt refers to its section headers by name, so both the
//! headers and their order are fixed.

use crate::extract::{CalendarFacts, StarFact, StarFacts};
use crate::retrieve::MatchedKnowledge;
use serde::Serialize;

/// Separator between fragments within one section.
pub const FRAGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Header of the always-present summary block.
pub const SUMMARY_HEADER: &str = "=== 命盤摘要 ===";

/// Placeholder for a palace with no occupant stars.
const NONE: &str = "無";

/// Digest sections after the summary, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    DayMaster,
    LifePalace,
    TenRelations,
    Career,
    Wealth,
    Union,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 6] = [
        SectionKind::DayMaster,
        SectionKind::LifePalace,
        SectionKind::TenRelations,
        SectionKind::Career,
        SectionKind::Wealth,
        SectionKind::Union,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SectionKind::DayMaster => "=== 日主特性（八字核心）===",
            SectionKind::LifePalace => "=== 命宮主星（紫微核心）===",
            SectionKind::TenRelations => "=== 十神配置 ===",
            SectionKind::Career => "=== 事業宮位（官祿）===",
            SectionKind::Wealth => "=== 財運宮位（財帛）===",
            SectionKind::Union => "=== 感情宮位（夫妻）===",
        }
    }

    fn fragments(&self, matched: &MatchedKnowledge) -> Vec<String> {
        match self {
            SectionKind::DayMaster if matched.day_master.is_empty() => Vec::new(),
            SectionKind::DayMaster => vec![matched.day_master.clone()],
            SectionKind::LifePalace => matched.life.clone(),
            SectionKind::TenRelations => matched.relations.clone(),
            SectionKind::Career => matched.career.clone(),
            SectionKind::Wealth => matched.wealth.clone(),
            SectionKind::Union => matched.spouse.clone(),
        }
    }
}

/// One non-empty section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestSection {
    pub kind: SectionKind,
    pub fragments: Vec<String>,
}

impl DigestSection {
    pub fn body(&self) -> String {
        self.fragments.join(FRAGMENT_SEPARATOR)
    }
}

/// The composed grounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub summary: String,
    pub sections: Vec<DigestSection>,
}

impl Digest {
    /// Compose the digest. Sections without fragments are left out.
    pub fn compose(matched: &MatchedKnowledge, calendar: &CalendarFacts, star: &StarFacts) -> Digest {
        let sections = SectionKind::ORDER
            .iter()
            .filter_map(|kind| {
                let fragments = kind.fragments(matched);
                (!fragments.is_empty()).then_some(DigestSection {
                    kind: *kind,
                    fragments,
                })
            })
            .collect();

        Digest {
            summary: summarize(calendar, star),
            sections,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&DigestSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// Render as prompt text: each header and body separated by a blank
    /// line, with an extra blank line before every section header.
    pub fn render(&self) -> String {
        let mut blocks = vec![SUMMARY_HEADER.to_string(), self.summary.clone()];
        for section in &self.sections {
            blocks.push(format!("\n{}", section.kind.header()));
            blocks.push(section.body());
        }
        blocks.join("\n\n")
    }
}

/// The one-line-per-fact summary that opens every digest.
pub fn summarize(calendar: &CalendarFacts, star: &StarFacts) -> String {
    format!(
        "【八字核心】\n\
         日主：{day_stem}\n\
         四柱：{four_pillars}\n\
         十神：年{year}｜月{month}｜時{hour}\n\
         \n\
         【紫微核心】\n\
         命宮主星：{life}\n\
         身宮主星：{body}\n\
         五行局：{element_phase}\n\
         財帛主星：{wealth}\n\
         官祿主星：{career}\n\
         夫妻主星：{spouse}",
        day_stem = calendar.day_stem,
        four_pillars = calendar.four_pillars,
        year = calendar.year_relation,
        month = calendar.month_relation,
        hour = calendar.hour_relation,
        life = star_names(&star.life),
        body = star_names(&star.body),
        element_phase = star.element_phase,
        wealth = star_names(&star.wealth),
        career = star_names(&star.career),
        spouse = star_names(&star.spouse),
    )
    .trim()
    .to_string()
}

fn star_names(stars: &[StarFact]) -> String {
    if stars.is_empty() {
        return NONE.to_string();
    }
    stars
        .iter()
        .map(|star| star.name.as_str())
        .collect::<Vec<_>>()
        .join("、")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::{retrieve_comprehensive, MatchedKnowledge};

    fn calendar() -> CalendarFacts {
        CalendarFacts {
            day_stem: "甲".to_string(),
            day_branch: "寅".to_string(),
            year_relation: "七殺".to_string(),
            month_relation: "偏財".to_string(),
            hour_relation: "食神".to_string(),
            four_pillars: "庚午 戊子 甲寅 丙寅".to_string(),
        }
    }

    #[test]
    fn test_summary_restates_facts() {
        let star = StarFacts {
            life: vec![StarFact::new("紫微"), StarFact::new("天府")],
            element_phase: "水二局".to_string(),
            ..Default::default()
        };
        let summary = summarize(&calendar(), &star);
        assert!(summary.starts_with("【八字核心】\n日主：甲\n四柱：庚午 戊子 甲寅 丙寅"));
        assert!(summary.contains("十神：年七殺｜月偏財｜時食神"));
        assert!(summary.contains("命宮主星：紫微、天府"));
        assert!(summary.contains("財帛主星：無"));
        assert!(summary.ends_with("夫妻主星：無"));
    }

    #[test]
    fn test_empty_retrieval_still_has_summary() {
        let digest = Digest::compose(
            &MatchedKnowledge::default(),
            &CalendarFacts::default(),
            &StarFacts::default(),
        );
        assert!(digest.sections.is_empty());
        let text = digest.render();
        assert!(text.starts_with("=== 命盤摘要 ===\n\n【八字核心】"));
        assert!(!text.contains("=== 日主特性"));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let matched = MatchedKnowledge {
            day_master: "D".to_string(),
            relations: vec!["R1".to_string(), "R2".to_string()],
            life: vec!["L".to_string()],
            career: vec!["C".to_string()],
            wealth: vec!["W".to_string()],
            spouse: vec!["S".to_string()],
        };
        let digest = Digest::compose(&matched, &calendar(), &StarFacts::default());
        let kinds: Vec<_> = digest.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ORDER.to_vec());

        let text = digest.render();
        let position = |needle: &str| text.find(needle).unwrap();
        assert!(position("=== 日主特性") < position("=== 命宮主星"));
        assert!(position("=== 命宮主星") < position("=== 十神配置"));
        assert!(position("=== 十神配置") < position("=== 事業宮位"));
        assert!(position("=== 事業宮位") < position("=== 財運宮位"));
        assert!(position("=== 財運宮位") < position("=== 感情宮位"));
        assert!(text.contains("\n\n\n=== 十神配置 ===\n\nR1\n\n---\n\nR2"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let matched = MatchedKnowledge {
            career: vec!["C".to_string()],
            ..Default::default()
        };
        let digest = Digest::compose(&matched, &calendar(), &StarFacts::default());
        assert_eq!(digest.sections.len(), 1);
        assert!(digest.section(SectionKind::Career).is_some());
        assert!(digest.section(SectionKind::LifePalace).is_none());
    }

    #[test]
    fn test_render_is_byte_identical_across_runs() {
        let star = StarFacts {
            life: vec![StarFact::new("七殺")],
            spouse: vec![StarFact::new("破軍").with_transformation("化忌")],
            ..Default::default()
        };
        let render = || {
            let matched = retrieve_comprehensive(&calendar(), &star);
            Digest::compose(&matched, &calendar(), &star).render()
        };
        assert_eq!(render(), render());
    }
}
