//! Ten relations (十神): how a pillar's stem relates to the day-master.

use serde::Serialize;

/// Position of a pillar in the four-pillar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pillar {
    Year,
    Month,
    Day,
    Hour,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [Pillar::Year, Pillar::Month, Pillar::Day, Pillar::Hour];

    pub fn label(&self) -> &'static str {
        match self {
            Pillar::Year => "年柱",
            Pillar::Month => "月柱",
            Pillar::Day => "日柱",
            Pillar::Hour => "時柱",
        }
    }
}

/// One of the ten canonical stem-interaction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TenRelation {
    Companion,
    RobWealth,
    EatingGod,
    HurtingOfficer,
    IndirectWealth,
    DirectWealth,
    SevenKillings,
    DirectOfficer,
    IndirectResource,
    DirectResource,
}

impl TenRelation {
    pub const ALL: [TenRelation; 10] = [
        TenRelation::Companion,
        TenRelation::RobWealth,
        TenRelation::EatingGod,
        TenRelation::HurtingOfficer,
        TenRelation::IndirectWealth,
        TenRelation::DirectWealth,
        TenRelation::SevenKillings,
        TenRelation::DirectOfficer,
        TenRelation::IndirectResource,
        TenRelation::DirectResource,
    ];

    /// Parse a relation label, accepting the common alternate names
    /// 偏官 (七殺) and 梟神 (偏印).
    pub fn from_label(label: &str) -> Option<TenRelation> {
        match label.trim() {
            "偏官" => return Some(TenRelation::SevenKillings),
            "梟神" | "枭神" => return Some(TenRelation::IndirectResource),
            _ => {}
        }
        TenRelation::ALL
            .into_iter()
            .find(|relation| relation.label() == label.trim())
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenRelation::Companion => "比肩",
            TenRelation::RobWealth => "劫財",
            TenRelation::EatingGod => "食神",
            TenRelation::HurtingOfficer => "傷官",
            TenRelation::IndirectWealth => "偏財",
            TenRelation::DirectWealth => "正財",
            TenRelation::SevenKillings => "七殺",
            TenRelation::DirectOfficer => "正官",
            TenRelation::IndirectResource => "偏印",
            TenRelation::DirectResource => "正印",
        }
    }

    pub fn knowledge(&self) -> &'static TenRelationKnowledge {
        &RELATION_TABLE[*self as usize]
    }
}

/// Curated record for one ten-relation label.
#[derive(Debug)]
pub struct TenRelationKnowledge {
    pub relation: TenRelation,
    /// Family the relation belongs to (比劫, 食傷, 財星, 官殺, 印星).
    pub family: &'static str,
    pub keywords: &'static [&'static str],
    pub personality: &'static str,
    pub positive: &'static str,
    pub negative: &'static str,
    pub year: &'static str,
    pub month: &'static str,
    pub hour: &'static str,
}

impl TenRelationKnowledge {
    /// Reading for the pillar the relation sits in. The day pillar has none:
    /// its stem is the reference point, not a relation to itself.
    pub fn reading(&self, pillar: Pillar) -> Option<&'static str> {
        match pillar {
            Pillar::Year => Some(self.year),
            Pillar::Month => Some(self.month),
            Pillar::Hour => Some(self.hour),
            Pillar::Day => None,
        }
    }
}

/// Render the fragment for a relation label in a given pillar.
pub fn render_relation(label: &str, pillar: Pillar) -> Option<String> {
    let k = TenRelation::from_label(label)?.knowledge();
    let reading = k.reading(pillar)?;

    Some(format!(
        "【{pillar}{relation}】{keywords}（{family}）\n\
         {reading}\n\n\
         性格表現：{personality}\n\
         正面：{positive}\n\
         負面：{negative}",
        pillar = pillar.label(),
        relation = k.relation.label(),
        keywords = k.keywords.join("、"),
        family = k.family,
        personality = k.personality,
        positive = k.positive,
        negative = k.negative,
    ))
}

static RELATION_TABLE: [TenRelationKnowledge; 10] = [
    TenRelationKnowledge {
        relation: TenRelation::Companion,
        family: "比劫",
        keywords: &["自我", "獨立", "手足"],
        personality: "自主性強，重視平等與公平",
        positive: "意志堅定，能自立自強",
        negative: "固執己見，容易與人比較競爭",
        year: "年柱見比肩，早年受兄弟姐妹影響大，少年時期便養成獨立個性。",
        month: "月柱見比肩，同輩與同事既是重要助力也是競爭對手，適合團隊合作或合夥經營。",
        hour: "時柱見比肩，晚年仍保有獨立精神，子女個性自主。",
    },
    TenRelationKnowledge {
        relation: TenRelation::RobWealth,
        family: "比劫",
        keywords: &["競爭", "魄力", "破耗"],
        personality: "行動積極，敢冒險，重義氣",
        positive: "社交能力強，做事有拚勁",
        negative: "容易衝動破財，與人爭利",
        year: "年柱見劫財，早年家境或有起伏，與手足之間互有爭奪。",
        month: "月柱見劫財，事業上競爭激烈，財務需防合夥糾紛。",
        hour: "時柱見劫財，晚年須留意理財，避免替人作保或借貸。",
    },
    TenRelationKnowledge {
        relation: TenRelation::EatingGod,
        family: "食傷",
        keywords: &["才華", "享受", "表達"],
        personality: "溫和樂觀，懂得享受生活",
        positive: "有創意也有口福，人緣佳",
        negative: "安逸散漫，缺乏危機感",
        year: "年柱見食神，幼年生活安穩，深受長輩疼愛。",
        month: "月柱見食神，才藝可以成為事業，適合創意、餐飲、教學。",
        hour: "時柱見食神，晚年生活愜意，子女孝順有福。",
    },
    TenRelationKnowledge {
        relation: TenRelation::HurtingOfficer,
        family: "食傷",
        keywords: &["聰明", "叛逆", "創新"],
        personality: "才華洋溢，思想新穎，不喜歡受拘束",
        positive: "表達力強，善於創新突破",
        negative: "言語尖銳，容易得罪上司",
        year: "年柱見傷官，早年較叛逆，與長輩或體制常有摩擦。",
        month: "月柱見傷官，適合技術、藝術或自由業，職場上需學會收斂鋒芒。",
        hour: "時柱見傷官，子女聰慧有個性，晚年仍有創作力。",
    },
    TenRelationKnowledge {
        relation: TenRelation::IndirectWealth,
        family: "財星",
        keywords: &["機會", "人緣", "流動之財"],
        personality: "慷慨大方，善於交際，重視機會",
        positive: "有商業眼光，能把握偏財",
        negative: "財來財去，容易流於投機",
        year: "年柱見偏財，祖上或父親多有經商背景，早年見識廣。",
        month: "月柱見偏財，適合業務、投資、貿易，財運起伏較大。",
        hour: "時柱見偏財，晚年仍有意外之財，但宜保守守成。",
    },
    TenRelationKnowledge {
        relation: TenRelation::DirectWealth,
        family: "財星",
        keywords: &["穩定", "務實", "勤勞"],
        personality: "踏實節儉，重信用",
        positive: "理財穩健，收入穩定",
        negative: "保守吝嗇，缺乏冒險精神",
        year: "年柱見正財，出身家境平穩，早年就懂得理財。",
        month: "月柱見正財，適合穩定職業，靠專業與勤勞累積財富。",
        hour: "時柱見正財，晚年財務穩定，有積蓄可依靠。",
    },
    TenRelationKnowledge {
        relation: TenRelation::SevenKillings,
        family: "官殺",
        keywords: &["魄力", "壓力", "權威"],
        personality: "果斷剛強，具開創與冒險精神",
        positive: "有領導魄力，能承擔重任",
        negative: "性急衝動，壓力大容易樹敵",
        year: "年柱見七殺，早年環境嚴苛，磨練出堅韌性格。",
        month: "月柱見七殺，適合軍警、管理或競爭激烈的行業，事業挑戰多機會也多。",
        hour: "時柱見七殺，子女個性強，晚年仍閒不下來。",
    },
    TenRelationKnowledge {
        relation: TenRelation::DirectOfficer,
        family: "官殺",
        keywords: &["責任", "規範", "名譽"],
        personality: "端正守法，重視名聲與秩序",
        positive: "自律負責，容易得到上司賞識",
        negative: "拘謹保守，顧慮過多",
        year: "年柱見正官，出身家教嚴謹，早年受長輩栽培。",
        month: "月柱見正官，適合公職、大企業或管理職，事業循序漸進。",
        hour: "時柱見正官，子女守規矩有成就，晚年名聲良好。",
    },
    TenRelationKnowledge {
        relation: TenRelation::IndirectResource,
        family: "印星",
        keywords: &["直覺", "專研", "孤獨"],
        personality: "思考獨特，對玄學或技術有濃厚興趣",
        positive: "領悟力強，擅長專業鑽研",
        negative: "孤僻多疑，做事虎頭蛇尾",
        year: "年柱見偏印，早年與母親或長輩的緣分較為特殊。",
        month: "月柱見偏印，適合研究、技術、宗教、醫療等專業領域。",
        hour: "時柱見偏印，晚年偏好獨處，思想深邃。",
    },
    TenRelationKnowledge {
        relation: TenRelation::DirectResource,
        family: "印星",
        keywords: &["庇護", "學習", "仁慈"],
        personality: "仁厚善良，好學有涵養",
        positive: "常有貴人相助，學習能力佳",
        negative: "依賴心重，行動力不足",
        year: "年柱見正印，早年受母親或長輩照顧，家學淵源。",
        month: "月柱見正印，適合教育、文化、公益，工作中常得貴人提攜。",
        hour: "時柱見正印，晚年安享清福，子女孝順。",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total_over_labels() {
        for relation in TenRelation::ALL {
            assert_eq!(TenRelation::from_label(relation.label()), Some(relation));
            assert_eq!(relation.knowledge().relation, relation);
        }
    }

    #[test]
    fn test_alternate_names() {
        assert_eq!(
            TenRelation::from_label("偏官"),
            Some(TenRelation::SevenKillings)
        );
        assert_eq!(
            TenRelation::from_label("梟神"),
            Some(TenRelation::IndirectResource)
        );
    }

    #[test]
    fn test_unknown_label_misses() {
        assert!(TenRelation::from_label("日主").is_none());
        assert!(render_relation("", Pillar::Year).is_none());
    }

    #[test]
    fn test_day_pillar_has_no_reading() {
        assert!(render_relation("正官", Pillar::Day).is_none());
        for relation in TenRelation::ALL {
            assert!(relation.knowledge().reading(Pillar::Day).is_none());
        }
    }

    #[test]
    fn test_reading_depends_on_pillar() {
        let year = render_relation("食神", Pillar::Year).unwrap();
        let month = render_relation("食神", Pillar::Month).unwrap();
        assert!(year.starts_with("【年柱食神】"));
        assert!(month.starts_with("【月柱食神】"));
        assert!(year.contains("年柱見食神"));
        assert!(month.contains("月柱見食神"));
        assert_ne!(year, month);
    }
}
