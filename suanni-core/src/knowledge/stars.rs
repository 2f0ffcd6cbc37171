//! The fourteen major stars (十四主星).
//!
//! Chart producers regularly emit minor or auxiliary stars outside this set;
//! those are lookup misses and simply contribute no text.

use super::{Palace, PalaceReadings};
use std::collections::HashMap;

/// Curated record for one major star.
#[derive(Debug)]
pub struct StarKnowledge {
    pub name: &'static str,
    /// Element with polarity, e.g. 陰土.
    pub element: &'static str,
    /// 北斗, 南斗 or 中天.
    pub group: &'static str,
    /// Traditional epithet, e.g. 帝星.
    pub title: &'static str,
    pub keywords: &'static [&'static str],
    pub personality: &'static str,
    pub readings: PalaceReadings,
    pub caution: &'static str,
}

lazy_static::lazy_static! {
    static ref STAR_INDEX: HashMap<&'static str, &'static StarKnowledge> = MAJOR_STARS
        .iter()
        .map(|star| (star.name, star))
        .collect();
}

/// Look up a star by name. A trailing brightness qualifier such as
/// 「（廟）」 is ignored.
pub fn star_knowledge(name: &str) -> Option<&'static StarKnowledge> {
    let name = name.trim();
    let base = name.split(['（', '(']).next().unwrap_or(name).trim();
    STAR_INDEX.get(base).copied()
}

/// Render the fragment for a star sitting in a palace.
///
/// The palace name may omit its trailing 宮. Outside the four palaces with
/// dedicated readings the star's general personality is used.
pub fn render_star_in_palace(star: &str, palace: &str) -> Option<String> {
    let k = star_knowledge(star)?;
    let palace = Palace::from_name(palace)?;
    let palace_name = palace.name();

    let reading = k.readings.for_palace(palace).unwrap_or(k.personality);
    let mut text = format!(
        "【{star}坐{palace_name}】{title}・{element}・{group}\n\
         關鍵字：{keywords}\n\n\
         {reading}\n\n\
         星曜特質：{personality}\n\
         需要注意：{caution}",
        star = k.name,
        title = k.title,
        element = k.element,
        group = k.group,
        keywords = k.keywords.join("、"),
        personality = k.personality,
        caution = k.caution,
    );

    let palace_record = palace.knowledge();
    if palace_record.favors(k.name) {
        text.push_str(&format!("\n{palace_name}喜見{}，主星得位。", k.name));
    } else if palace_record.disfavors(k.name) {
        text.push_str(&format!("\n{palace_name}忌見{}，須留意其負面影響。", k.name));
    }

    Some(text)
}

pub static MAJOR_STARS: [StarKnowledge; 14] = [
    StarKnowledge {
        name: "紫微",
        element: "陰土",
        group: "北斗",
        title: "帝星",
        keywords: &["尊貴", "領導", "自尊"],
        personality: "氣度恢宏，有領導欲與責任感，喜歡受人尊重。",
        readings: PalaceReadings {
            life: "紫微坐命，天生帶有王者氣質，做事有格局，但需防耳根子軟、好面子。",
            wealth: "財帛宮見紫微，賺錢有方法，財源穩定，善於掌控資源。",
            career: "官祿宮見紫微，適合擔任主管或自行創業，事業格局大。",
            spouse: "夫妻宮見紫微，配偶能力強有主見，彼此宜互相尊重。",
        },
        caution: "忌剛愎自用，需要左輔右弼等輔星相助方能成大器。",
    },
    StarKnowledge {
        name: "天機",
        element: "陰木",
        group: "南斗",
        title: "智星",
        keywords: &["聰明", "謀略", "變動"],
        personality: "思維敏捷，善於分析規劃，心思細密。",
        readings: PalaceReadings {
            life: "天機坐命，心思靈巧點子多，但容易想太多、定性不足。",
            wealth: "財帛宮見天機，以智力和專業賺錢，財來自企劃與技術，宜穩健理財。",
            career: "官祿宮見天機，適合企劃、顧問、研究、資訊等動腦工作，工作變動較多。",
            spouse: "夫妻宮見天機，配偶聰明機靈，感情中重視溝通，宜避免猜疑。",
        },
        caution: "忌多謀少決，精神容易緊繃。",
    },
    StarKnowledge {
        name: "太陽",
        element: "陽火",
        group: "中天",
        title: "官祿主",
        keywords: &["光明", "博愛", "付出"],
        personality: "熱情大方，樂於助人，重視名譽。",
        readings: PalaceReadings {
            life: "太陽坐命，為人正直熱心，喜歡照顧別人，名大於利。",
            wealth: "財帛宮見太陽，財運與名聲相連，先名後利，宜防因面子破財。",
            career: "官祿宮見太陽，適合公職、教育、政治、傳播等公眾事業。",
            spouse: "夫妻宮見太陽，配偶熱情開朗，宜防一方付出過多而失衡。",
        },
        caution: "落陷時容易勞而無功，須注意眼睛與心血管。",
    },
    StarKnowledge {
        name: "武曲",
        element: "陰金",
        group: "北斗",
        title: "財星",
        keywords: &["財富", "果斷", "剛毅"],
        personality: "意志堅定，行動力強，重視實際。",
        readings: PalaceReadings {
            life: "武曲坐命，個性剛直果決，重視效率，有理財頭腦。",
            wealth: "武曲為正財星，入財帛宮主財運旺，善於理財累積。",
            career: "官祿宮見武曲，適合金融、財務、工程、軍警等需要決斷力的工作。",
            spouse: "夫妻宮見武曲，配偶個性剛強，感情表達直接，宜多溝通柔化。",
        },
        caution: "忌剛愎孤僻，感情上容易較晚成。",
    },
    StarKnowledge {
        name: "天同",
        element: "陽水",
        group: "南斗",
        title: "福星",
        keywords: &["福氣", "溫和", "享受"],
        personality: "溫和隨緣，樂天知命，人緣好。",
        readings: PalaceReadings {
            life: "天同坐命，性情溫和，懂得享受生活，但有時缺乏進取心。",
            wealth: "財帛宮見天同，財來自福氣與人脈，生活無大缺，不宜高風險投資。",
            career: "官祿宮見天同，適合服務業、社福、設計等環境和諧的工作。",
            spouse: "夫妻宮見天同，配偶溫和體貼，感情和諧，宜防過於安逸。",
        },
        caution: "忌懶散依賴，遇煞則多憂慮。",
    },
    StarKnowledge {
        name: "廉貞",
        element: "陰火",
        group: "北斗",
        title: "囚星",
        keywords: &["才幹", "桃花", "是非"],
        personality: "個性鮮明，能力強，愛恨分明。",
        readings: PalaceReadings {
            life: "廉貞坐命，才華出眾，交際手腕好，情緒起伏較大。",
            wealth: "財帛宮見廉貞，財運靠手腕與交際，有偏財機會，也易因衝動破財。",
            career: "官祿宮見廉貞，適合公關、政治、法律、表演等需要手腕的行業。",
            spouse: "夫妻宮見廉貞，感情熱烈多波折，宜慎選對象。",
        },
        caution: "忌感情糾紛與官非，遇化忌尤需留意。",
    },
    StarKnowledge {
        name: "天府",
        element: "陽土",
        group: "南斗",
        title: "財庫星",
        keywords: &["穩重", "保守", "庫藏"],
        personality: "穩重寬厚，有包容力，善於守成。",
        readings: PalaceReadings {
            life: "天府坐命，氣度穩重，做事有條理，一生衣食無缺。",
            wealth: "財帛宮見天府，財庫豐厚，善於儲蓄與管理資產。",
            career: "官祿宮見天府，適合行政、財務、管理等穩定職位。",
            spouse: "夫妻宮見天府，配偶穩重顧家，婚姻較為穩定。",
        },
        caution: "忌保守過度而錯失良機，遇空劫則為空庫。",
    },
    StarKnowledge {
        name: "太陰",
        element: "陰水",
        group: "中天",
        title: "田宅主",
        keywords: &["溫柔", "內斂", "積蓄"],
        personality: "細膩溫柔，重感情，有藝術氣質。",
        readings: PalaceReadings {
            life: "太陰坐命，氣質溫婉，感受力強，內心世界豐富。",
            wealth: "財帛宮見太陰，善於累積不動產與儲蓄，財運細水長流。",
            career: "官祿宮見太陰，適合財務、不動產、藝術、文化等工作。",
            spouse: "夫妻宮見太陰，配偶溫柔體貼，感情細膩。",
        },
        caution: "忌多愁善感，落陷時情緒容易起伏。",
    },
    StarKnowledge {
        name: "貪狼",
        element: "陽木",
        group: "北斗",
        title: "桃花星",
        keywords: &["慾望", "多才", "交際"],
        personality: "多才多藝，交際能力強，慾望旺盛。",
        readings: PalaceReadings {
            life: "貪狼坐命，八面玲瓏，興趣廣泛，對新事物充滿好奇。",
            wealth: "財帛宮見貪狼，偏財運佳，財來自交際與多元經營。",
            career: "官祿宮見貪狼，適合業務、娛樂、餐飲、公關等需要人脈的工作。",
            spouse: "夫妻宮見貪狼，感情豐富桃花多，婚姻宜晚。",
        },
        caution: "忌貪多嚼不爛，沉迷享樂。",
    },
    StarKnowledge {
        name: "巨門",
        element: "陰水",
        group: "北斗",
        title: "暗星",
        keywords: &["口才", "是非", "思辨"],
        personality: "口才好，觀察力敏銳，善於分析。",
        readings: PalaceReadings {
            life: "巨門坐命，善於辯論，凡事追根究柢，但容易招來口舌是非。",
            wealth: "財帛宮見巨門，以口才與專業賺錢，宜防合約糾紛。",
            career: "官祿宮見巨門，適合律師、教師、業務、媒體等靠口才的行業。",
            spouse: "夫妻宮見巨門，與配偶容易口角，宜多包容少爭辯。",
        },
        caution: "忌疑心重，言語傷人。",
    },
    StarKnowledge {
        name: "天相",
        element: "陽水",
        group: "南斗",
        title: "印星",
        keywords: &["輔佐", "公正", "服務"],
        personality: "正直公道，溫文有禮，樂於協調。",
        readings: PalaceReadings {
            life: "天相坐命，為人厚道，重視形象，善於協調人事。",
            wealth: "財帛宮見天相，財運平穩，多靠職位與信用獲得。",
            career: "官祿宮見天相，適合秘書、幕僚、行政、公關等輔佐性工作。",
            spouse: "夫妻宮見天相，配偶端正體貼，婚姻重視門當戶對。",
        },
        caution: "忌缺乏主見，容易受人左右。",
    },
    StarKnowledge {
        name: "天梁",
        element: "陽土",
        group: "南斗",
        title: "蔭星",
        keywords: &["庇蔭", "清高", "長者風範"],
        personality: "成熟穩重，有正義感，喜歡照顧他人。",
        readings: PalaceReadings {
            life: "天梁坐命，具有長者風範，常能逢凶化吉，為人排憂解難。",
            wealth: "財帛宮見天梁，財運清而不濁，不宜投機，宜靠專業。",
            career: "官祿宮見天梁，適合醫療、宗教、教育、監察等照顧或把關的工作。",
            spouse: "夫妻宮見天梁，配偶年長或個性成熟，婚姻中多扮演照顧者。",
        },
        caution: "忌倚老賣老，好管閒事。",
    },
    StarKnowledge {
        name: "七殺",
        element: "陰金",
        group: "南斗",
        title: "將星",
        keywords: &["衝勁", "孤剋", "開創"],
        personality: "性格剛烈，勇於冒險，不畏艱難。",
        readings: PalaceReadings {
            life: "七殺坐命，個性獨立，敢衝敢拚，人生起伏較大。",
            wealth: "財帛宮見七殺，財來得快也去得快，宜開創更須守成。",
            career: "官祿宮見七殺，適合創業、軍警、業務開發等挑戰性工作。",
            spouse: "夫妻宮見七殺，感情來得急，配偶個性強，宜晚婚。",
        },
        caution: "忌衝動莽撞，孤軍奮戰。",
    },
    StarKnowledge {
        name: "破軍",
        element: "陰水",
        group: "北斗",
        title: "耗星",
        keywords: &["破舊立新", "變動", "消耗"],
        personality: "勇於改革，喜新厭舊，不按牌理出牌。",
        readings: PalaceReadings {
            life: "破軍坐命，一生變動多，先破後立，具開創精神。",
            wealth: "財帛宮見破軍，財務起伏大，花錢大方，需防破耗。",
            career: "官祿宮見破軍，適合改革、創業、開發新市場等需要突破的工作。",
            spouse: "夫妻宮見破軍，感情變化較多，宜晚婚或選擇包容的伴侶。",
        },
        caution: "忌衝動破壞，缺乏耐性。",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_major_star_is_indexed() {
        assert_eq!(STAR_INDEX.len(), MAJOR_STARS.len());
        for star in MAJOR_STARS.iter() {
            assert_eq!(star_knowledge(star.name).map(|k| k.name), Some(star.name));
        }
    }

    #[test]
    fn test_brightness_qualifier_is_ignored() {
        assert_eq!(star_knowledge("太陽（廟）").map(|k| k.name), Some("太陽"));
        assert_eq!(star_knowledge("太陰(陷)").map(|k| k.name), Some("太陰"));
    }

    #[test]
    fn test_minor_stars_miss() {
        assert!(star_knowledge("文昌").is_none());
        assert!(star_knowledge("").is_none());
        assert!(render_star_in_palace("左輔", "命宮").is_none());
    }

    #[test]
    fn test_unknown_palace_misses() {
        assert!(render_star_in_palace("紫微", "大限").is_none());
    }

    #[test]
    fn test_palace_specific_reading() {
        let life = render_star_in_palace("紫微", "命宮").unwrap();
        let career = render_star_in_palace("紫微", "官祿").unwrap();
        assert!(life.starts_with("【紫微坐命宮】帝星・陰土・北斗"));
        assert!(life.contains("紫微坐命，天生帶有王者氣質"));
        assert!(career.starts_with("【紫微坐官祿宮】"));
        assert!(career.contains("官祿宮見紫微"));
    }

    #[test]
    fn test_other_palaces_use_personality() {
        let text = render_star_in_palace("天同", "福德宮").unwrap();
        assert!(text.contains("溫和隨緣，樂天知命，人緣好。\n\n星曜特質"));
    }

    #[test]
    fn test_palace_preference_notes() {
        let favored = render_star_in_palace("武曲", "財帛宮").unwrap();
        assert!(favored.ends_with("財帛宮喜見武曲，主星得位。"));

        let disfavored = render_star_in_palace("破軍", "夫妻宮").unwrap();
        assert!(disfavored.ends_with("夫妻宮忌見破軍，須留意其負面影響。"));

        let neutral = render_star_in_palace("天機", "命宮").unwrap();
        assert!(neutral.ends_with("需要注意：忌多謀少決，精神容易緊繃。"));
    }
}
