//! The twelve palaces (十二宮) of the star chart.

use serde::Serialize;

/// Trailing qualifier a palace name may or may not carry.
const PALACE_SUFFIX: char = '宮';

/// One of the twelve life-domain slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Palace {
    Life,
    Siblings,
    Spouse,
    Children,
    Wealth,
    Health,
    Travel,
    Friends,
    Career,
    Property,
    Fortune,
    Parents,
}

impl Palace {
    pub const ALL: [Palace; 12] = [
        Palace::Life,
        Palace::Siblings,
        Palace::Spouse,
        Palace::Children,
        Palace::Wealth,
        Palace::Health,
        Palace::Travel,
        Palace::Friends,
        Palace::Career,
        Palace::Property,
        Palace::Fortune,
        Palace::Parents,
    ];

    /// Canonical name, always with the trailing 宮.
    pub fn name(&self) -> &'static str {
        match self {
            Palace::Life => "命宮",
            Palace::Siblings => "兄弟宮",
            Palace::Spouse => "夫妻宮",
            Palace::Children => "子女宮",
            Palace::Wealth => "財帛宮",
            Palace::Health => "疾厄宮",
            Palace::Travel => "遷移宮",
            Palace::Friends => "交友宮",
            Palace::Career => "官祿宮",
            Palace::Property => "田宅宮",
            Palace::Fortune => "福德宮",
            Palace::Parents => "父母宮",
        }
    }

    /// Parse a palace name with or without its trailing 宮.
    ///
    /// 僕役 and 奴僕 are accepted as older names of 交友宮.
    pub fn from_name(name: &str) -> Option<Palace> {
        let stem = name.trim().trim_end_matches(PALACE_SUFFIX);
        if stem.is_empty() {
            return None;
        }
        match stem {
            "僕役" | "奴僕" => return Some(Palace::Friends),
            _ => {}
        }
        Palace::ALL
            .into_iter()
            .find(|palace| palace.name().trim_end_matches(PALACE_SUFFIX) == stem)
    }

    pub fn knowledge(&self) -> &'static PalaceKnowledge {
        &PALACE_TABLE[*self as usize]
    }
}

/// Curated record for one palace.
#[derive(Debug)]
pub struct PalaceKnowledge {
    pub palace: Palace,
    pub represents: &'static [&'static str],
    pub focus: &'static str,
    pub favorable_stars: &'static [&'static str],
    pub unfavorable_stars: &'static [&'static str],
    pub interpretation: &'static str,
}

impl PalaceKnowledge {
    pub fn favors(&self, star: &str) -> bool {
        contains_star(self.favorable_stars, star)
    }

    pub fn disfavors(&self, star: &str) -> bool {
        contains_star(self.unfavorable_stars, star)
    }
}

/// Entries may carry a brightness qualifier, e.g. 太陽（廟旺）.
fn contains_star(list: &[&str], star: &str) -> bool {
    let star = star.trim();
    !star.is_empty()
        && list
            .iter()
            .any(|entry| entry.split('（').next().unwrap_or(entry) == star)
}

static PALACE_TABLE: [PalaceKnowledge; 12] = [
    PalaceKnowledge {
        palace: Palace::Life,
        represents: &["自己的本性", "個性、才能、志向", "一生的總體運勢", "給人的第一印象"],
        focus: "你是什麼樣的人",
        favorable_stars: &["紫微", "天府", "天相", "天梁", "太陽（廟旺）", "太陰（廟旺）"],
        unfavorable_stars: &["擎羊", "陀羅", "火星", "鈴星", "地空", "地劫"],
        interpretation: "命宮是最重要的宮位，決定一個人的基本格局。主星強則一生有成就，煞星多則波折多。",
    },
    PalaceKnowledge {
        palace: Palace::Siblings,
        represents: &["兄弟姐妹", "同輩的朋友", "合夥人", "母親（部分學派）"],
        focus: "手足關係、同輩互動",
        favorable_stars: &["天府", "天相", "天同", "天梁"],
        unfavorable_stars: &["七殺", "破軍", "擎羊", "陀羅"],
        interpretation: "看與兄弟姐妹的關係，也看合夥運。吉星多則手足有助，煞星多則緣薄或有爭執。",
    },
    PalaceKnowledge {
        palace: Palace::Spouse,
        represents: &["配偶", "戀愛對象", "婚姻狀況", "感情模式"],
        focus: "感情與婚姻",
        favorable_stars: &["天府", "天相", "太陽", "太陰", "天同"],
        unfavorable_stars: &["廉貞", "貪狼", "七殺", "破軍", "擎羊", "陀羅"],
        interpretation: "看婚姻和感情運。吉星主婚姻美滿，桃花星多則感情複雜，煞星多則婚姻波折。",
    },
    PalaceKnowledge {
        palace: Palace::Children,
        represents: &["子女", "學生、晚輩", "創作、作品", "性生活"],
        focus: "子女緣分與親子關係",
        favorable_stars: &["天府", "天相", "天同", "天梁", "太陽", "太陰"],
        unfavorable_stars: &["七殺", "破軍", "擎羊", "陀羅", "地空", "地劫"],
        interpretation: "看與子女的緣分和關係。吉星多則子女有出息，煞星多則子女讓人操心或緣薄。",
    },
    PalaceKnowledge {
        palace: Palace::Wealth,
        represents: &["財運", "賺錢能力", "理財方式", "金錢觀念"],
        focus: "財富與金錢",
        favorable_stars: &["武曲", "天府", "太陰", "祿存", "化祿"],
        unfavorable_stars: &["地空", "地劫", "擎羊", "陀羅"],
        interpretation: "看賺錢能力和財運。財星廟旺則財運好，空劫進入則財來財去不易守。",
    },
    PalaceKnowledge {
        palace: Palace::Health,
        represents: &["身體健康", "疾病傾向", "災厄意外", "體質強弱"],
        focus: "健康與疾病",
        favorable_stars: &["天府", "天相", "天同", "天梁"],
        unfavorable_stars: &["廉貞", "七殺", "破軍", "擎羊", "陀羅", "火星", "鈴星"],
        interpretation: "看身體健康和疾病傾向。吉星多則體質好，煞星多則要注意某些疾病或意外。",
    },
    PalaceKnowledge {
        palace: Palace::Travel,
        represents: &["出外運", "人際關係", "社會上的表現", "貴人緣"],
        focus: "外出與社交",
        favorable_stars: &["紫微", "天府", "天相", "太陽", "化祿"],
        unfavorable_stars: &["擎羊", "陀羅", "火星", "鈴星", "地空", "地劫"],
        interpretation: "看出外發展的運勢和人際關係。吉星多則在外有貴人，煞星多則出外不利或易有意外。",
    },
    PalaceKnowledge {
        palace: Palace::Friends,
        represents: &["朋友", "部下", "同事", "人際網絡"],
        focus: "朋友與部下",
        favorable_stars: &["天府", "天相", "天同", "天梁"],
        unfavorable_stars: &["廉貞", "貪狼", "七殺", "破軍", "擎羊"],
        interpretation: "看交友運和與部下的關係。吉星多則朋友有助力，煞星多則朋友帶來麻煩或被背叛。",
    },
    PalaceKnowledge {
        palace: Palace::Career,
        represents: &["事業", "工作", "社會地位", "學業"],
        focus: "事業與成就",
        favorable_stars: &["紫微", "天府", "武曲", "天相", "太陽", "化權"],
        unfavorable_stars: &["地空", "地劫", "擎羊", "陀羅"],
        interpretation: "看事業成就和工作運。吉星廟旺則事業有成，煞星多則事業有波折或不穩定。",
    },
    PalaceKnowledge {
        palace: Palace::Property,
        represents: &["房產", "不動產", "家庭環境", "祖業"],
        focus: "房產與家庭",
        favorable_stars: &["天府", "太陰", "武曲", "天同", "祿存"],
        unfavorable_stars: &["破軍", "七殺", "擎羊", "陀羅", "火星", "鈴星"],
        interpretation: "看房產運和家庭環境。吉星多則有房產或祖業蔭，煞星多則房產有變動或家庭不安。",
    },
    PalaceKnowledge {
        palace: Palace::Fortune,
        represents: &["精神狀態", "興趣嗜好", "福報", "壽命"],
        focus: "精神與福報",
        favorable_stars: &["天府", "天同", "天梁", "太陰", "化祿"],
        unfavorable_stars: &["廉貞", "貪狼", "七殺", "破軍", "擎羊", "陀羅"],
        interpretation: "看精神狀態和福報。吉星多則心態好有福享，煞星多則精神壓力大或不易滿足。",
    },
    PalaceKnowledge {
        palace: Palace::Parents,
        represents: &["父母", "長輩", "上司", "與長輩的關係"],
        focus: "父母與長輩",
        favorable_stars: &["天府", "天相", "天梁", "太陽", "太陰"],
        unfavorable_stars: &["七殺", "破軍", "擎羊", "陀羅", "化忌"],
        interpretation: "看與父母的關係和長輩緣。吉星多則父母有助力，煞星多則與父母緣薄或有代溝。",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total_over_palaces() {
        for palace in Palace::ALL {
            assert_eq!(Palace::from_name(palace.name()), Some(palace));
            assert_eq!(palace.knowledge().palace, palace);
        }
    }

    #[test]
    fn test_suffix_is_optional() {
        assert_eq!(Palace::from_name("命"), Some(Palace::Life));
        assert_eq!(Palace::from_name("命宮"), Some(Palace::Life));
        assert_eq!(Palace::from_name(" 財帛宮 "), Some(Palace::Wealth));
        assert_eq!(Palace::from_name("官祿"), Some(Palace::Career));
    }

    #[test]
    fn test_legacy_friends_names() {
        assert_eq!(Palace::from_name("僕役宮"), Some(Palace::Friends));
        assert_eq!(Palace::from_name("奴僕"), Some(Palace::Friends));
    }

    #[test]
    fn test_unknown_names_miss() {
        assert!(Palace::from_name("").is_none());
        assert!(Palace::from_name("宮").is_none());
        assert!(Palace::from_name("身宮").is_none());
        assert!(Palace::from_name("大限").is_none());
    }

    #[test]
    fn test_star_membership_ignores_brightness_qualifier() {
        let life = Palace::Life.knowledge();
        assert!(life.favors("太陽"));
        assert!(life.favors("紫微"));
        assert!(!life.favors("七殺"));
        assert!(life.disfavors("擎羊"));
        assert!(!life.favors(""));
    }
}
