//! Free preview: a short day-master reading built from the stem table alone.

use crate::extract::{CalendarFacts, StarFacts};
use serde::Serialize;

const UNKNOWN_TRAIT: &str = "獨特的命格特質";
const UNKNOWN_TIP: &str = "需要完整解盤才能了解";

/// The teaser shown before a full interpretation is unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub day_master: String,
    /// Element of the day-master; empty for an unknown stem.
    pub day_master_element: String,
    #[serde(rename = "trait")]
    pub trait_text: String,
    pub tip: String,
    pub self_palace_stars: Vec<String>,
}

impl Preview {
    pub fn from_facts(calendar: &CalendarFacts, star: &StarFacts) -> Preview {
        let (element, trait_text, tip) = match calendar.day_master() {
            Some(stem) => {
                let k = stem.knowledge();
                (k.element.symbol(), k.summary, k.tip)
            }
            None => ("", UNKNOWN_TRAIT, UNKNOWN_TIP),
        };

        Preview {
            day_master: calendar.day_stem.clone(),
            day_master_element: element.to_string(),
            trait_text: trait_text.to_string(),
            tip: tip.to_string(),
            self_palace_stars: star.life.iter().map(|star| star.name.clone()).collect(),
        }
    }
}
