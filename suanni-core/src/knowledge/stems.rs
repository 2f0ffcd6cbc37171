//! Heavenly stems (天干): the ten symbols of the stem cycle.
//!
//! The stem of the day pillar is the day-master, so this table carries the
//! richest record in the whole knowledge base.

use super::{bullets, Element, Polarity};
use serde::Serialize;

/// One of the ten heavenly stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    /// All stems in cycle order.
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// Parse a stem symbol. Surrounding whitespace is ignored.
    pub fn from_symbol(symbol: &str) -> Option<Stem> {
        let symbol = symbol.trim();
        Stem::ALL.into_iter().find(|stem| stem.symbol() == symbol)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Stem::Jia => "甲",
            Stem::Yi => "乙",
            Stem::Bing => "丙",
            Stem::Ding => "丁",
            Stem::Wu => "戊",
            Stem::Ji => "己",
            Stem::Geng => "庚",
            Stem::Xin => "辛",
            Stem::Ren => "壬",
            Stem::Gui => "癸",
        }
    }

    pub fn knowledge(&self) -> &'static StemKnowledge {
        &STEM_TABLE[*self as usize]
    }

    pub fn element(&self) -> Element {
        self.knowledge().element
    }
}

/// Curated record for one stem.
#[derive(Debug)]
pub struct StemKnowledge {
    pub stem: Stem,
    pub element: Element,
    pub polarity: Polarity,
    /// The natural image the stem is read as.
    pub image: &'static str,
    /// One-sentence characterization, also used by the free preview.
    pub summary: &'static str,
    pub traits: &'static [&'static str],
    pub strengths: &'static [&'static str],
    pub cautions: &'static [&'static str],
    /// Short advice line.
    pub tip: &'static str,
    pub health: &'static str,
    pub careers: &'static [&'static str],
}

/// Look up a stem record by symbol.
pub fn stem_knowledge(symbol: &str) -> Option<&'static StemKnowledge> {
    Stem::from_symbol(symbol).map(|stem| stem.knowledge())
}

/// Render the day-master fragment for a stem symbol.
pub fn render_day_master(symbol: &str) -> Option<String> {
    let k = stem_knowledge(symbol)?;
    let stem = k.stem.symbol();
    let element = k.element.symbol();
    let polarity = k.polarity.symbol();

    Some(format!(
        "【日主{stem}{element}（{polarity}{element}）】{image}\n\
         {summary}\n\n\
         性格特質：\n{traits}\n\n\
         優勢：\n{strengths}\n\n\
         需要注意：\n{cautions}\n\n\
         健康重點：{health}\n\
         適合方向：{careers}\n\
         建議：{tip}",
        image = k.image,
        summary = k.summary,
        traits = bullets(k.traits),
        strengths = bullets(k.strengths),
        cautions = bullets(k.cautions),
        health = k.health,
        careers = k.careers.join("、"),
        tip = k.tip,
    ))
}

static STEM_TABLE: [StemKnowledge; 10] = [
    StemKnowledge {
        stem: Stem::Jia,
        element: Element::Wood,
        polarity: Polarity::Yang,
        image: "參天大樹",
        summary: "如參天大樹，正直上進，有領導氣質",
        traits: &[
            "正直仁厚，做事講原則",
            "積極向上，不輕易認輸",
            "重視名譽與尊嚴",
        ],
        strengths: &["有擔當，能撐起局面", "開創力強，適合帶頭"],
        cautions: &["過於固執，不肯低頭", "寧折不彎，遇挫時容易硬撐"],
        tip: "需要陽光（火）和水分才能茁壯",
        health: "肝膽、筋骨、頭部",
        careers: &["管理", "教育", "開創型事業"],
    },
    StemKnowledge {
        stem: Stem::Yi,
        element: Element::Wood,
        polarity: Polarity::Yin,
        image: "花草藤蔓",
        summary: "如花草藤蔓，柔韌靈活，善於適應環境",
        traits: &[
            "溫柔細膩，善解人意",
            "交際手腕好，懂得借力",
            "外柔內韌，韌性十足",
        ],
        strengths: &["適應力強，能屈能伸", "審美好，有藝術天分"],
        cautions: &["依賴心較重", "遇事優柔寡斷"],
        tip: "借力使力，攀附而上",
        health: "肝臟、頸部、神經系統",
        careers: &["設計", "藝術", "公關", "園藝"],
    },
    StemKnowledge {
        stem: Stem::Bing,
        element: Element::Fire,
        polarity: Polarity::Yang,
        image: "太陽",
        summary: "如太陽光芒，熱情開朗，照亮四方",
        traits: &[
            "熱情大方，樂於分享",
            "光明磊落，不藏心機",
            "喜歡成為眾人焦點",
        ],
        strengths: &["感染力強，能帶動氣氛", "慷慨助人，人緣極佳"],
        cautions: &["急躁衝動，三分鐘熱度", "愛面子，不願示弱"],
        tip: "需要舞台發揮，忌被掩蓋",
        health: "心臟、小腸、眼睛",
        careers: &["演藝", "業務", "傳媒", "教育"],
    },
    StemKnowledge {
        stem: Stem::Ding,
        element: Element::Fire,
        polarity: Polarity::Yin,
        image: "燭火星光",
        summary: "如燭火星光，細膩敏感，溫暖人心",
        traits: &[
            "心思細密，觀察入微",
            "重感情，默默付出",
            "內在熱情，外表沉靜",
        ],
        strengths: &["專注力強，能深入鑽研", "體貼入微，善於照顧人"],
        cautions: &["多思多慮，容易內耗", "情緒敏感，易受傷"],
        tip: "適合幕後工作，內斂而有深度",
        health: "心臟、血液循環、眼睛",
        careers: &["研究", "文字創作", "諮詢", "哲學宗教"],
    },
    StemKnowledge {
        stem: Stem::Wu,
        element: Element::Earth,
        polarity: Polarity::Yang,
        image: "高山厚土",
        summary: "如高山厚土，穩重踏實，值得信賴",
        traits: &[
            "沉穩厚重，守信重諾",
            "包容心大，能容人",
            "做事按部就班",
        ],
        strengths: &["可靠穩定，是團隊的定心丸", "抗壓性強"],
        cautions: &["反應較慢，變通不足", "固守成規"],
        tip: "包容力強，但要避免過於固執",
        health: "脾胃、肌肉",
        careers: &["不動產", "建築", "行政", "仲介"],
    },
    StemKnowledge {
        stem: Stem::Ji,
        element: Element::Earth,
        polarity: Polarity::Yin,
        image: "田園沃土",
        summary: "如田園沃土，謙虛務實，滋養萬物",
        traits: &[
            "謙和低調，不爭不搶",
            "細心周到，樂於成全他人",
            "務實勤懇，重視生活",
        ],
        strengths: &["善於培養人才", "協調力佳，能穩住人心"],
        cautions: &["想太多，容易猶豫", "委屈自己成全別人"],
        tip: "適合服務他人，低調中有力量",
        health: "脾胃、消化系統",
        careers: &["服務業", "餐飲", "人資", "教育輔導"],
    },
    StemKnowledge {
        stem: Stem::Geng,
        element: Element::Metal,
        polarity: Polarity::Yang,
        image: "刀劍鋼鐵",
        summary: "如刀劍鋼鐵，果決剛毅，行動力強",
        traits: &[
            "講義氣，重承諾",
            "直來直往，愛恨分明",
            "遇強則強，不畏挑戰",
        ],
        strengths: &["執行力強，說到做到", "能在壓力下做決斷"],
        cautions: &["說話太直，易傷人", "剛硬好勝，容易樹敵"],
        tip: "需要磨練才能發光，逆境中成長",
        health: "肺、大腸、骨骼",
        careers: &["軍警", "工程", "機械", "金融"],
    },
    StemKnowledge {
        stem: Stem::Xin,
        element: Element::Metal,
        polarity: Polarity::Yin,
        image: "珠寶美玉",
        summary: "如珠寶美玉，精緻細膩，追求完美",
        traits: &[
            "品味出眾，重視質感",
            "自尊心強，在意評價",
            "思路清晰，講究細節",
        ],
        strengths: &["專業要求高，作品精緻", "氣質出眾，形象好"],
        cautions: &["挑剔完美主義", "玻璃心，受不了批評"],
        tip: "外柔內剛，在意形象與品質",
        health: "肺、呼吸道、皮膚",
        careers: &["珠寶精品", "美業", "法律", "品管"],
    },
    StemKnowledge {
        stem: Stem::Ren,
        element: Element::Water,
        polarity: Polarity::Yang,
        image: "江河大海",
        summary: "如江河大海，智慧流動，包容萬象",
        traits: &[
            "聰明機敏，視野開闊",
            "喜歡自由，不受拘束",
            "行動力與企圖心兼具",
        ],
        strengths: &["變通靈活，善於謀略", "格局大，擅長整合資源"],
        cautions: &["心性不定，容易分心", "放縱任性"],
        tip: "變通能力強，但要避免過於飄忽",
        health: "腎、膀胱",
        careers: &["貿易", "物流", "旅遊", "策略規劃"],
    },
    StemKnowledge {
        stem: Stem::Gui,
        element: Element::Water,
        polarity: Polarity::Yin,
        image: "雨露甘霖",
        summary: "如雨露甘霖，細膩敏銳，潤物無聲",
        traits: &[
            "直覺敏銳，第六感強",
            "溫和含蓄，心思深",
            "想像力豐富",
        ],
        strengths: &["洞察力強，看得透人心", "耐性好，能默默耕耘"],
        cautions: &["容易悲觀，缺乏安全感", "心事藏太深"],
        tip: "直覺力強，適合幕後策劃",
        health: "腎、泌尿、生殖系統",
        careers: &["研究", "心理諮商", "企劃", "玄學"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total_over_stems() {
        for stem in Stem::ALL {
            let k = stem_knowledge(stem.symbol()).expect("every stem has a record");
            assert_eq!(k.stem, stem);
            assert!(!k.summary.is_empty());
            assert!(!k.tip.is_empty());
        }
    }

    #[test]
    fn test_table_order_matches_enum() {
        for (index, stem) in Stem::ALL.iter().enumerate() {
            assert_eq!(STEM_TABLE[index].stem, *stem);
        }
    }

    #[test]
    fn test_unknown_symbol_misses() {
        assert!(stem_knowledge("子").is_none());
        assert!(stem_knowledge("").is_none());
        assert!(stem_knowledge("甲乙").is_none());
        assert!(render_day_master("X").is_none());
    }

    #[test]
    fn test_symbol_whitespace_is_ignored() {
        assert_eq!(Stem::from_symbol(" 丙 "), Some(Stem::Bing));
    }

    #[test]
    fn test_polarity_alternates() {
        for (index, stem) in Stem::ALL.iter().enumerate() {
            let expected = if index % 2 == 0 {
                Polarity::Yang
            } else {
                Polarity::Yin
            };
            assert_eq!(stem.knowledge().polarity, expected);
        }
    }

    #[test]
    fn test_render_day_master() {
        let text = render_day_master("甲").unwrap();
        assert!(text.starts_with("【日主甲木（陽木）】參天大樹"));
        assert!(text.contains("如參天大樹，正直上進，有領導氣質"));
        assert!(text.contains("建議：需要陽光（火）和水分才能茁壯"));
        assert!(text.contains("• 正直仁厚，做事講原則"));
    }
}
