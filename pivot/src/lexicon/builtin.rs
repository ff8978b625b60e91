//! Built-in Japanese lexicon
//!
//! Tables are declared in priority order; `RuleStore::compile` relies on the
//! tail table order and re-sorts everything else into canonical order.

use super::{
    AdjectiveEntry, AdverbEntry, DomainEntry, LayerEntry, Lexicon, TailEntry, TemperatureEntry,
    VerbEntry, VoiceEntry,
};
use crate::morphology::{AdjectiveSentiment, VerbCategory};
use crate::ranking::DomainWeights;
use crate::temperature::Temperature;
use crate::voice::{Layer, VoiceCode};

// ─────────────────────────────────────────────────────────────────────────────
// Lexical classifier: (voice, keywords, patterns)
// ─────────────────────────────────────────────────────────────────────────────

const VOICE_TABLE: &[(VoiceCode, &[&str], &[&str])] = &[
    (
        VoiceCode::Pain,
        &[
            "困っている", "問題", "課題", "うまくいかない", "できない",
            "難しい", "障害", "ボトルネック", "トラブル", "エラー",
            "遅れ", "遅延", "不足", "ミス", "失敗", "止まる",
            "時間がかかる", "手間", "非効率", "無駄", "面倒",
            "バグ", "不具合", "故障", "落ちる", "動かない",
        ],
        &[
            r"(.+?)(?:で|に)困っている",
            r"(.+?)(?:が|は)(?:問題|課題)(?:だ|です|になっている)",
            r"(.+?)(?:が|は)(?:うまくいかない|難しい|厳しい)",
            r"(.+?)(?:が|に)時間がかかる",
        ],
    ),
    (
        VoiceCode::Insecurity,
        &[
            "心配", "不安", "懸念", "気になる", "気がかり",
            "大丈夫か", "リスク", "危ない", "もしかしたら",
            "かもしれない", "恐れ", "属人化", "引継ぎ",
            "辞めたら", "いなくなったら", "将来", "今後",
        ],
        &[
            r"(.+?)(?:が|を)(?:心配|不安|懸念)",
            r"(.+?)(?:かもしれない|恐れがある)",
            r"(?:辞め|いなくなっ)たら(.+?)(?:が|は|も)(?:困る|終わる|できない)",
        ],
    ),
    (
        VoiceCode::Vision,
        &[
            "してほしい", "欲しい", "ほしい", "があれば", "できたら",
            "期待", "要望", "希望", "理想", "改善したい",
            "効率化", "自動化", "システム化", "デジタル化",
            "したい", "できるように", "なればいい", "なるといい",
            "導入したい", "使いたい", "実現したい",
        ],
        &[
            r"(.+?)(?:して|が)(?:ほしい|欲しい|ホシイ)",
            r"(.+?)(?:があれば|できれば)(?:いい|良い|嬉しい|助かる)",
            r"(.+?)(?:を|が)(?:効率化|自動化|改善)(?:したい|してほしい)",
        ],
    ),
    (
        VoiceCode::Objection,
        &[
            "反対", "抵抗", "無理", "やりたくない",
            "前もダメだった", "失敗した", "うまくいかなかった",
            "嫌", "面倒", "ストレス", "対立", "衝突",
            "やらされ", "強制", "納得できない",
        ],
        &[
            r"(?:前|以前|過去)(?:に|も)(.+?)(?:が|で)(?:失敗|ダメ|うまくいかなかった)",
            r"(.+?)(?:に|は)(?:反対|抵抗)(?:がある|している)",
            r"(.+?)(?:を|は)(?:やりたくない|したくない)",
        ],
    ),
    (
        VoiceCode::Traction,
        &[
            "うまくいっている", "成功", "順調", "問題ない",
            "満足", "良い", "便利", "助かっている", "効率的",
            "強み", "得意", "定着", "回っている", "機能している",
            "気に入っている", "使いやすい", "スムーズ",
            "うまく", "ちゃんと", "しっかり", "快適",
        ],
        &[
            r"(.+?)(?:は|が)(?:うまくいっている|順調|成功)",
            r"(.+?)(?:に|は)(?:満足|問題ない)",
            r"(.+?)(?:は|が)(?:便利|助かっている|効率的)",
        ],
    ),
];

// ─────────────────────────────────────────────────────────────────────────────
// Morphology
// ─────────────────────────────────────────────────────────────────────────────

const VERB_TABLE: &[(VerbCategory, &[&str])] = &[
    (
        VerbCategory::Obstacle,
        &[
            "困っている", "困ってる", "困る", "止まって", "止まる", "止まった",
            "詰まる", "詰まって", "妨げ", "邪魔", "引っかかる", "つまずく",
        ],
    ),
    (
        VerbCategory::Difficulty,
        &[
            "うまくいかない", "できない", "進まない", "追いつかない", "間に合わない",
            "手間取る", "手間がかかる", "時間がかかる", "苦労", "苦戦", "回らない",
        ],
    ),
    (
        VerbCategory::Loss,
        &[
            "失う", "失った", "失われ", "いなくなったら", "なくなる", "なくなって",
            "辞めたら", "辞めてしまう", "消える", "消えて", "途絶え", "手放す",
        ],
    ),
    (
        VerbCategory::Desire,
        &[
            "したい", "してほしい", "して欲しい", "ほしい", "欲しい", "できたら",
            "できれば", "助かる", "望む", "願う", "なればいい", "なるといい", "あればいい",
        ],
    ),
    (
        VerbCategory::Rejection,
        &[
            "やりたくない", "したくない", "使いたくない", "反対", "拒否", "断る",
            "断った", "嫌がる", "受け入れられない", "納得できない", "やらされ",
        ],
    ),
    (
        VerbCategory::Success,
        &[
            "うまくいった", "うまくいっている", "成功した", "成功している", "解決した",
            "改善した", "改善された", "定着した", "回っている", "助かっている",
            "助かった", "機能している", "できるようになった", "できた", "減った",
        ],
    ),
];

const ADJECTIVE_TABLE: &[(AdjectiveSentiment, &[&str])] = &[
    (
        AdjectiveSentiment::Positive,
        &[
            "便利", "快適", "簡単", "使いやすい", "分かりやすい", "わかりやすい",
            "スムーズ", "嬉しい", "うれしい", "素晴らしい", "良い", "良かった",
            "よかった", "効率的",
        ],
    ),
    (
        AdjectiveSentiment::Negative,
        &[
            "悪い", "ひどい", "つらい", "辛い", "面倒", "大変", "厳しい", "遅い",
            "煩雑", "不便", "使いにくい", "分かりにくい", "わかりにくい", "難しい",
            "しんどい",
        ],
    ),
    (
        AdjectiveSentiment::Anxiety,
        &["不安", "心配", "怖い", "こわい", "危ない", "危うい", "心細い", "気がかり"],
    ),
];

/// Degree buckets: 2.0 / 1.5 / 1.3 amplify, 0.7 / 0.5 attenuate
const ADVERB_TABLE: &[(&str, f64)] = &[
    ("めちゃくちゃ", 2.0),
    ("絶対", 2.0),
    ("非常に", 1.5),
    ("本当に", 1.5),
    ("とても", 1.5),
    ("すごく", 1.5),
    ("かなり", 1.3),
    ("結構", 1.3),
    ("特に", 1.3),
    ("少し", 0.7),
    ("ちょっと", 0.7),
    ("多少", 0.7),
    ("若干", 0.7),
    ("やや", 0.7),
    ("あまり", 0.5),
    ("たいして", 0.5),
];

/// Sentence endings in priority order: (name, pattern, certainty, tendency)
const TAIL_TABLE: &[(&str, &str, f64, Option<VoiceCode>)] = &[
    (
        "assertive",
        r"(?:です|である|ます|ました|でした|だった|ている|ていた|ています)(?:よね|よ|ね)?$",
        1.0,
        None,
    ),
    (
        "experiential",
        r"(?:たことがある|たことがあった|てきた)(?:よ|ね)?$",
        0.9,
        None,
    ),
    (
        "speculative",
        r"(?:かもしれない|かもしれません|かも|だろう|でしょう|と思う)(?:ね|よ|な)?$",
        0.6,
        Some(VoiceCode::Insecurity),
    ),
    (
        "hearsay",
        r"(?:らしい|そうだ|とのこと|と聞いた|って聞いた|みたいだ)(?:よ|ね)?$",
        0.5,
        None,
    ),
    (
        "desiderative",
        r"(?:たい|てほしい|て欲しい|ほしい|欲しい|といい|ばいい|たらいい)(?:なあ|な|ね|よ)?$",
        0.8,
        Some(VoiceCode::Vision),
    ),
    (
        "negative_desiderative",
        r"(?:たくない|てほしくない|ほしくない)(?:な|ね|よ)?$",
        0.8,
        Some(VoiceCode::Objection),
    ),
];

// ─────────────────────────────────────────────────────────────────────────────
// Layers, temperature, domains
// ─────────────────────────────────────────────────────────────────────────────

const LAYER_TABLE: &[(Layer, &[&str], &[&str])] = &[
    (
        Layer::Process,
        &[
            "業務", "作業", "工程", "手順", "プロセス", "フロー", "運用", "入力",
            "承認", "集計", "処理",
        ],
        &[
            r"([一-龯ァ-ヶー]+(?:業務|作業|工程|手順|プロセス|フロー|運用))",
            r"([一-龯ァ-ヶー]+(?:入力|承認|集計|処理))",
        ],
    ),
    (
        Layer::Tool,
        &[
            "Excel", "エクセル", "スプレッドシート", "kintone", "Slack", "Teams",
            "Salesforce", "RPA", "AI", "チャットボット", "システム", "ツール",
            "アプリ", "ソフト",
        ],
        &[
            r"([A-Za-z][A-Za-z0-9+.-]*)",
            r"([一-龯ァ-ヶー]*(?:システム|ツール|アプリ|ソフト))",
        ],
    ),
    (
        Layer::People,
        &[
            "担当者", "上司", "部下", "社員", "メンバー", "チーム", "お客様", "顧客",
            "現場", "経営者", "社長", "管理職", "新人", "ベテラン", "営業",
        ],
        &[
            r"([一-龯ァ-ヶー]*(?:担当者|上司|部下|社員|メンバー|チーム|顧客|経営者|社長|管理職|新人|ベテラン))",
        ],
    ),
];

const TEMPERATURE_TABLE: &[(Temperature, &[&str])] = &[
    (
        Temperature::High,
        &["絶対", "本当に", "非常に", "とても", "すごく", "めちゃくちゃ", "いつも", "毎回", "必ず"],
    ),
    (
        Temperature::Medium,
        &["かなり", "結構", "わりと", "時々", "たまに", "よく"],
    ),
    (
        Temperature::Low,
        &["少し", "ちょっと", "多少", "若干", "たぶん", "おそらく"],
    ),
];

/// (name, [P, I, V, O, T])
const DOMAIN_TABLE: &[(&str, [f64; 5])] = &[
    ("biz_analysis", [2.0, 1.0, 1.0, 1.0, 1.5]),
    ("customer_support", [1.5, 1.5, 1.0, 2.0, 1.0]),
    ("product_discovery", [1.5, 1.0, 2.0, 1.0, 1.0]),
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Assemble the built-in tables into an owned [`Lexicon`]
pub fn lexicon() -> Lexicon {
    Lexicon {
        voices: VOICE_TABLE
            .iter()
            .map(|(voice, keywords, patterns)| VoiceEntry {
                voice: *voice,
                keywords: strings(keywords),
                patterns: strings(patterns),
            })
            .collect(),
        verbs: VERB_TABLE
            .iter()
            .map(|(category, phrases)| VerbEntry {
                category: *category,
                phrases: strings(phrases),
            })
            .collect(),
        adjectives: ADJECTIVE_TABLE
            .iter()
            .map(|(sentiment, words)| AdjectiveEntry {
                sentiment: *sentiment,
                words: strings(words),
            })
            .collect(),
        adverbs: ADVERB_TABLE
            .iter()
            .map(|(phrase, factor)| AdverbEntry {
                phrase: (*phrase).to_string(),
                factor: *factor,
            })
            .collect(),
        tails: TAIL_TABLE
            .iter()
            .map(|(name, pattern, certainty, tendency)| TailEntry {
                name: (*name).to_string(),
                pattern: (*pattern).to_string(),
                certainty: *certainty,
                tendency: *tendency,
            })
            .collect(),
        layers: LAYER_TABLE
            .iter()
            .map(|(layer, keywords, patterns)| LayerEntry {
                layer: *layer,
                keywords: strings(keywords),
                patterns: strings(patterns),
            })
            .collect(),
        temperature: TEMPERATURE_TABLE
            .iter()
            .map(|(level, indicators)| TemperatureEntry {
                level: *level,
                indicators: strings(indicators),
            })
            .collect(),
        domains: DOMAIN_TABLE
            .iter()
            .map(|(name, weights)| DomainEntry {
                name: (*name).to_string(),
                weights: DomainWeights::from_array(*weights),
            })
            .collect(),
    }
}
