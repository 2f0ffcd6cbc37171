//! The four transformations (四化) attached to stars in a palace.

use super::{Palace, PalaceReadings};
use serde::Serialize;

/// One of the four transformation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Transformation {
    Prosperity,
    Authority,
    Fame,
    Obstacle,
}

impl Transformation {
    pub const ALL: [Transformation; 4] = [
        Transformation::Prosperity,
        Transformation::Authority,
        Transformation::Fame,
        Transformation::Obstacle,
    ];

    /// Parse a label with or without the leading 化; simplified forms are
    /// accepted as well.
    pub fn from_label(label: &str) -> Option<Transformation> {
        let label = label.trim();
        let core = label.strip_prefix('化').unwrap_or(label);
        match core {
            "祿" | "禄" => Some(Transformation::Prosperity),
            "權" | "权" => Some(Transformation::Authority),
            "科" => Some(Transformation::Fame),
            "忌" => Some(Transformation::Obstacle),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Transformation::Prosperity => "化祿",
            Transformation::Authority => "化權",
            Transformation::Fame => "化科",
            Transformation::Obstacle => "化忌",
        }
    }

    pub fn knowledge(&self) -> &'static TransformationKnowledge {
        &TRANSFORMATION_TABLE[*self as usize]
    }
}

/// Curated record for one transformation.
#[derive(Debug)]
pub struct TransformationKnowledge {
    pub transformation: Transformation,
    pub meaning: &'static str,
    pub keywords: &'static [&'static str],
    pub readings: PalaceReadings,
    /// Used for palaces without a dedicated reading.
    pub general: &'static str,
}

/// Render the fragment for a (star, palace, transformation) triple.
pub fn render_transformation_in_palace(label: &str, palace: &str, star: &str) -> Option<String> {
    let k = Transformation::from_label(label)?.knowledge();
    let palace = Palace::from_name(palace)?;
    let reading = k.readings.for_palace(palace).unwrap_or(k.general);

    Some(format!(
        "【{star}{label}入{palace}】{keywords}\n\
         {meaning}\n\
         {reading}",
        star = star.trim(),
        label = k.transformation.label(),
        palace = palace.name(),
        keywords = k.keywords.join("、"),
        meaning = k.meaning,
    ))
}

static TRANSFORMATION_TABLE: [TransformationKnowledge; 4] = [
    TransformationKnowledge {
        transformation: Transformation::Prosperity,
        meaning: "化祿主福祿與順遂，象徵資源與機會的流入。",
        keywords: &["財祿", "人緣", "順利"],
        readings: PalaceReadings {
            life: "化祿入命宮，人緣佳、機會多，一生較為順遂。",
            wealth: "化祿入財帛宮，財源廣進，收入來源多元。",
            career: "化祿入官祿宮，事業順利，工作能帶來實質收益。",
            spouse: "化祿入夫妻宮，感情甜蜜，配偶能帶來助力。",
        },
        general: "化祿所在之處，是此生較容易有所收穫的領域。",
    },
    TransformationKnowledge {
        transformation: Transformation::Authority,
        meaning: "化權主權力與掌控，象徵積極主導與行動力。",
        keywords: &["權力", "掌控", "積極"],
        readings: PalaceReadings {
            life: "化權入命宮，個性強勢有主見，具領導能力。",
            wealth: "化權入財帛宮，掌握財務主導權，賺錢態度積極。",
            career: "化權入官祿宮，事業上握有實權，適合管理與決策。",
            spouse: "化權入夫妻宮，配偶強勢或雙方爭奪主導權，宜互相尊重。",
        },
        general: "化權所在之處，是此生想要掌握主導權的領域。",
    },
    TransformationKnowledge {
        transformation: Transformation::Fame,
        meaning: "化科主名聲與貴人，象徵文采、信譽與理性。",
        keywords: &["名聲", "貴人", "文采"],
        readings: PalaceReadings {
            life: "化科入命宮，氣質斯文，重視名譽，一生多貴人。",
            wealth: "化科入財帛宮，理財有計畫，財來得名正言順。",
            career: "化科入官祿宮，事業上有名聲與專業地位，利於考試升遷。",
            spouse: "化科入夫妻宮，配偶有涵養，感情理性和諧。",
        },
        general: "化科所在之處，是此生容易獲得肯定與名聲的領域。",
    },
    TransformationKnowledge {
        transformation: Transformation::Obstacle,
        meaning: "化忌主執著與阻礙，象徵虧欠與需要用心經營的課題。",
        keywords: &["執著", "阻礙", "課題"],
        readings: PalaceReadings {
            life: "化忌入命宮，個性執著，容易鑽牛角尖，一生需學習放下。",
            wealth: "化忌入財帛宮，財務容易有波折，需防投資失利與借貸。",
            career: "化忌入官祿宮，事業壓力大，工作中易遇阻礙，但專注可成。",
            spouse: "化忌入夫妻宮，感情容易糾結，對伴侶期待過高。",
        },
        general: "化忌所在之處，是此生需要用心經營的功課。",
    },
];
