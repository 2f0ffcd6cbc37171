//! Curated symbolic knowledge tables.
//!
//! Every table is immutable static data built once per process. Closed
//! vocabularies (stems, branches, palaces, ten relations, transformations)
//! are modelled as enums so that lookups over the valid domain are total;
//! the open star vocabulary is served from a name index.
//!
//! The `render_*` helpers turn a lookup into the text fragment the retriever
//! appends to the digest. They return `None` on a lookup miss and never a
//! placeholder.

pub mod branches;
pub mod palaces;
pub mod relations;
pub mod stars;
pub mod stems;
pub mod transformations;

pub use branches::{render_day_branch, Branch, BranchKnowledge};
pub use palaces::{Palace, PalaceKnowledge};
pub use relations::{render_relation, Pillar, TenRelation, TenRelationKnowledge};
pub use stars::{render_star_in_palace, star_knowledge, StarKnowledge, MAJOR_STARS};
pub use stems::{render_day_master, Stem, StemKnowledge};
pub use transformations::{
    render_transformation_in_palace, Transformation, TransformationKnowledge,
};

use serde::Serialize;

/// The five element phases (五行).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }

    /// The phase this one feeds in the generating cycle (木生火...).
    pub fn generates(&self) -> Element {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// The phase this one restrains in the overcoming cycle (木剋土...).
    pub fn overcomes(&self) -> Element {
        match self {
            Element::Wood => Element::Earth,
            Element::Fire => Element::Metal,
            Element::Earth => Element::Water,
            Element::Metal => Element::Wood,
            Element::Water => Element::Fire,
        }
    }
}

/// Yin/yang polarity (陰陽).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Polarity::Yang => "陽",
            Polarity::Yin => "陰",
        }
    }
}

/// Readings keyed by the four palaces the retriever reads stars from.
///
/// Shared by star and transformation records; other palaces have no
/// dedicated reading and fall back to the record's general text.
#[derive(Debug)]
pub struct PalaceReadings {
    pub life: &'static str,
    pub wealth: &'static str,
    pub career: &'static str,
    pub spouse: &'static str,
}

impl PalaceReadings {
    pub fn for_palace(&self, palace: Palace) -> Option<&'static str> {
        match palace {
            Palace::Life => Some(self.life),
            Palace::Wealth => Some(self.wealth),
            Palace::Career => Some(self.career),
            Palace::Spouse => Some(self.spouse),
            _ => None,
        }
    }
}

/// Render a list as bullet lines (`• item`).
pub(crate) fn bullets(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
