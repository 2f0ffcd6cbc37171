//! Earthly branches (地支): traits, hidden stems, harmonies and clashes.

use super::{bullets, Element, Polarity, Stem};
use serde::Serialize;

/// One of the twelve earthly branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    /// All branches in cycle order.
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// Parse a branch symbol. Surrounding whitespace is ignored.
    pub fn from_symbol(symbol: &str) -> Option<Branch> {
        let symbol = symbol.trim();
        Branch::ALL.into_iter().find(|branch| branch.symbol() == symbol)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Branch::Zi => "子",
            Branch::Chou => "丑",
            Branch::Yin => "寅",
            Branch::Mao => "卯",
            Branch::Chen => "辰",
            Branch::Si => "巳",
            Branch::Wu => "午",
            Branch::Wei => "未",
            Branch::Shen => "申",
            Branch::You => "酉",
            Branch::Xu => "戌",
            Branch::Hai => "亥",
        }
    }

    pub fn knowledge(&self) -> &'static BranchKnowledge {
        &BRANCH_TABLE[*self as usize]
    }

    /// Six-harmony (六合) partner and the element the pair combines into.
    pub fn harmony(&self) -> (Branch, Element) {
        match self {
            Branch::Zi => (Branch::Chou, Element::Earth),
            Branch::Chou => (Branch::Zi, Element::Earth),
            Branch::Yin => (Branch::Hai, Element::Wood),
            Branch::Hai => (Branch::Yin, Element::Wood),
            Branch::Mao => (Branch::Xu, Element::Fire),
            Branch::Xu => (Branch::Mao, Element::Fire),
            Branch::Chen => (Branch::You, Element::Metal),
            Branch::You => (Branch::Chen, Element::Metal),
            Branch::Si => (Branch::Shen, Element::Water),
            Branch::Shen => (Branch::Si, Element::Water),
            Branch::Wu => (Branch::Wei, Element::Earth),
            Branch::Wei => (Branch::Wu, Element::Earth),
        }
    }

    /// Six-clash (六沖) opponent: the branch six steps away.
    pub fn clash(&self) -> Branch {
        Branch::ALL[(*self as usize + 6) % 12]
    }
}

/// Curated record for one branch.
#[derive(Debug)]
pub struct BranchKnowledge {
    pub branch: Branch,
    pub element: Element,
    pub polarity: Polarity,
    pub season: &'static str,
    pub month: &'static str,
    pub hours: &'static str,
    pub hidden_stems: &'static [Stem],
    pub nature: &'static str,
    pub character: &'static [&'static str],
    /// Body systems the branch is associated with.
    pub body: &'static str,
    pub animal: &'static str,
}

/// Look up a branch record by symbol.
pub fn branch_knowledge(symbol: &str) -> Option<&'static BranchKnowledge> {
    Branch::from_symbol(symbol).map(|branch| branch.knowledge())
}

/// Render the day-branch fragment that follows the day-master text.
pub fn render_day_branch(symbol: &str) -> Option<String> {
    let k = branch_knowledge(symbol)?;
    let hidden = k
        .hidden_stems
        .iter()
        .map(|stem| stem.symbol())
        .collect::<Vec<_>>()
        .join("、");

    Some(format!(
        "【日支{branch}（{element}・{animal}）】\n\n\
         藏干：{hidden}\n\
         自然象徵：{nature}\n\n\
         性格傾向：\n{character}\n\n\
         健康對應：{body}",
        branch = k.branch.symbol(),
        element = k.element.symbol(),
        animal = k.animal,
        nature = k.nature,
        character = bullets(k.character),
        body = k.body,
    ))
}

static BRANCH_TABLE: [BranchKnowledge; 12] = [
    BranchKnowledge {
        branch: Branch::Zi,
        element: Element::Water,
        polarity: Polarity::Yang,
        season: "冬季",
        month: "十一月",
        hours: "23:00-01:00",
        hidden_stems: &[Stem::Gui],
        nature: "深夜、寒冷、收藏",
        character: &[
            "聰明機智，思維活躍",
            "適應力強，靈活變通",
            "有時城府較深",
            "情緒起伏大",
        ],
        body: "腎臟、膀胱、耳朵",
        animal: "鼠",
    },
    BranchKnowledge {
        branch: Branch::Chou,
        element: Element::Earth,
        polarity: Polarity::Yin,
        season: "冬末春初",
        month: "十二月",
        hours: "01:00-03:00",
        hidden_stems: &[Stem::Ji, Stem::Gui, Stem::Xin],
        nature: "濕土、墓庫、積蓄",
        character: &[
            "踏實穩重，有耐心",
            "善於積累，懂得儲蓄",
            "有時固執保守",
            "不善表達情感",
        ],
        body: "脾胃、腹部",
        animal: "牛",
    },
    BranchKnowledge {
        branch: Branch::Yin,
        element: Element::Wood,
        polarity: Polarity::Yang,
        season: "春季",
        month: "正月",
        hours: "03:00-05:00",
        hidden_stems: &[Stem::Jia, Stem::Bing, Stem::Wu],
        nature: "初春、生發、開始",
        character: &[
            "有衝勁，敢於開創",
            "正直勇敢，有領導力",
            "有時過於急躁",
            "喜歡自由，不受約束",
        ],
        body: "肝膽、四肢",
        animal: "虎",
    },
    BranchKnowledge {
        branch: Branch::Mao,
        element: Element::Wood,
        polarity: Polarity::Yin,
        season: "春季",
        month: "二月",
        hours: "05:00-07:00",
        hidden_stems: &[Stem::Yi],
        nature: "仲春、溫和、生長",
        character: &[
            "溫和有禮，人緣好",
            "善於溝通，有藝術天分",
            "有時優柔寡斷",
            "重視外表形象",
        ],
        body: "肝臟、眼睛",
        animal: "兔",
    },
    BranchKnowledge {
        branch: Branch::Chen,
        element: Element::Earth,
        polarity: Polarity::Yang,
        season: "春末夏初",
        month: "三月",
        hours: "07:00-09:00",
        hidden_stems: &[Stem::Wu, Stem::Yi, Stem::Gui],
        nature: "水庫、變化、轉折",
        character: &[
            "有包容心，能容納不同",
            "變化多端，適應力強",
            "有時情緒不穩",
            "有神秘感",
        ],
        body: "脾胃、皮膚",
        animal: "龍",
    },
    BranchKnowledge {
        branch: Branch::Si,
        element: Element::Fire,
        polarity: Polarity::Yin,
        season: "夏季",
        month: "四月",
        hours: "09:00-11:00",
        hidden_stems: &[Stem::Bing, Stem::Geng, Stem::Wu],
        nature: "初夏、熱情、轉化",
        character: &[
            "聰明靈活，反應快",
            "有智慧，善於謀略",
            "有時心機較重",
            "適應環境能力強",
        ],
        body: "心臟、眼睛",
        animal: "蛇",
    },
    BranchKnowledge {
        branch: Branch::Wu,
        element: Element::Fire,
        polarity: Polarity::Yang,
        season: "夏季",
        month: "五月",
        hours: "11:00-13:00",
        hidden_stems: &[Stem::Ding, Stem::Ji],
        nature: "盛夏、光明、熱情",
        character: &[
            "熱情開朗，積極向上",
            "有領導力，喜歡表現",
            "有時衝動急躁",
            "情緒來得快去得也快",
        ],
        body: "心臟、血液",
        animal: "馬",
    },
    BranchKnowledge {
        branch: Branch::Wei,
        element: Element::Earth,
        polarity: Polarity::Yin,
        season: "夏末秋初",
        month: "六月",
        hours: "13:00-15:00",
        hidden_stems: &[Stem::Ji, Stem::Ding, Stem::Yi],
        nature: "木庫、滋養、包容",
        character: &[
            "溫和善良，有愛心",
            "有藝術天分，審美好",
            "有時過於敏感",
            "容易委屈自己",
        ],
        body: "脾胃、腸道",
        animal: "羊",
    },
    BranchKnowledge {
        branch: Branch::Shen,
        element: Element::Metal,
        polarity: Polarity::Yang,
        season: "秋季",
        month: "七月",
        hours: "15:00-17:00",
        hidden_stems: &[Stem::Geng, Stem::Ren, Stem::Wu],
        nature: "初秋、收斂、變革",
        character: &[
            "聰明靈活，反應敏捷",
            "善於變通，有商業頭腦",
            "有時過於精明",
            "喜歡自由，不愛受約束",
        ],
        body: "肺、大腸",
        animal: "猴",
    },
    BranchKnowledge {
        branch: Branch::You,
        element: Element::Metal,
        polarity: Polarity::Yin,
        season: "秋季",
        month: "八月",
        hours: "17:00-19:00",
        hidden_stems: &[Stem::Xin],
        nature: "仲秋、收穫、完美",
        character: &[
            "追求完美，注重細節",
            "有品味，審美能力強",
            "有時過於挑剔",
            "口才好，善於表達",
        ],
        body: "肺、皮膚",
        animal: "雞",
    },
    BranchKnowledge {
        branch: Branch::Xu,
        element: Element::Earth,
        polarity: Polarity::Yang,
        season: "秋末冬初",
        month: "九月",
        hours: "19:00-21:00",
        hidden_stems: &[Stem::Wu, Stem::Xin, Stem::Ding],
        nature: "火庫、忠誠、守護",
        character: &[
            "忠誠可靠，重義氣",
            "有責任感，值得信賴",
            "有時固執己見",
            "對認定的事堅持到底",
        ],
        body: "脾胃、四肢",
        animal: "狗",
    },
    BranchKnowledge {
        branch: Branch::Hai,
        element: Element::Water,
        polarity: Polarity::Yin,
        season: "冬季",
        month: "十月",
        hours: "21:00-23:00",
        hidden_stems: &[Stem::Ren, Stem::Jia],
        nature: "初冬、收藏、包容",
        character: &[
            "善良寬厚，有包容心",
            "有智慧，思想深刻",
            "有時過於放縱",
            "情感豐富但不善表達",
        ],
        body: "腎臟、生殖系統",
        animal: "豬",
    },
];
