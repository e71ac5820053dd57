//! Raw backend JSON to [`Report`].
//!
//! The backend has produced several result vocabularies over time: Chinese
//! section keys, English camelCase, English snake_case, and mixtures of the
//! three. Each section is looked up under every known alias (first present
//! wins) and every leaf is read leniently. Normalization never fails; anything
//! missing or of the wrong shape becomes `None` or an empty list.

use crate::lookup::{
    Entry, MENTIONS, QUOTES, SHARE, SUMMARY, count, entries, entries_at,
    entry_detail, entry_label, field, has_any, key_scripts, level, number, scalar_number,
    scalar_text, share, strings, strings_at, text,
};
use crate::schema::{
    BrandAnalysis, Comparison, DimensionScore, FeedbackSection, Insight, Opportunity, Persona,
    PersonaSection, PositionPoint, RatingBucket, Report, ReportMeta, SchemaGeneration, Sentiment,
    UnmetNeed,
};
use reviewscope_api_models::Language;
use serde_json::Value;

const OWN: &[&str] = &["ownBrandAnalysis", "own_brand_analysis", "本品分析", "本品牌分析"];
const COMPETITOR: &[&str] = &["competitorAnalysis", "competitor_analysis", "竞品分析"];
const PERSONAS: &[&str] = &[
    "消费者画像分析",
    "userPersonas",
    "user_personas",
    "consumerPersonas",
    "userInsights",
];
const FEEDBACK: &[&str] = &["按评分划分的消费者反馈", "feedbackByRating", "ratingFeedback", "feedback"];
const UNMET: &[&str] = &["未满足的需求", "未满足需求", "unmetNeeds", "unmet_needs"];
const COMPARISON: &[&str] = &["竞品对比分析", "competitiveComparison", "comparison"];
const OPPORTUNITIES: &[&str] = &["机会建议", "改进机会", "opportunities", "suggestions"];

const WRAPPERS: &[&str] = &["result", "data", "analysis", "analysis_result", "analysisResult"];
const META: &[&str] = &["metadata", "meta", "元数据", "基本信息"];
const ID: &[&str] = &["id", "analysis_id", "analysisId", "report_id", "reportId"];
const CATEGORY: &[&str] = &[
    "targetCategory",
    "target_category",
    "category",
    "目标品类",
    "品类",
];
const GENERATED_AT: &[&str] = &[
    "timestamp",
    "generated_at",
    "generatedAt",
    "createdAt",
    "created_at",
    "生成时间",
];
const REVIEW_COUNT: &[&str] = &[
    "total_reviews",
    "totalReviews",
    "review_count",
    "reviewCount",
    "评论总数",
    "评论数量",
];
const AVERAGE_RATING: &[&str] = &["average_rating", "averageRating", "avg_rating", "平均评分"];
const EXEC_SUMMARY: &[&str] = &[
    "executive_summary",
    "executiveSummary",
    "summary",
    "总结",
    "摘要",
    "核心发现",
];
const LANGUAGE: &[&str] = &["language", "lang", "语言"];
const BRAND: &[&str] = &["brand", "brand_name", "brandName", "product", "品牌", "产品"];

const PERSONA_LIST: &[&str] = &["personas", "user_personas", "用户画像", "画像", "人群"];
const SCENARIOS: &[&str] = &[
    "usage_scenarios",
    "usageScenarios",
    "scenarios",
    "使用场景",
    "场景",
];
const MOTIVATIONS: &[&str] = &[
    "purchase_motivations",
    "purchaseMotivations",
    "motivations",
    "购买动机",
    "动机",
];
const TRAITS: &[&str] = &["traits", "characteristics", "tags", "features", "特征", "标签", "特点"];

const RATINGS: &[&str] = &[
    "ratings",
    "by_rating",
    "byRating",
    "rating_distribution",
    "ratingDistribution",
    "评分分布",
    "各评分反馈",
];
const POSITIVES: &[&str] = &["positive", "positives", "praise", "正面反馈", "好评", "优点"];
const NEGATIVES: &[&str] = &["negative", "negatives", "complaints", "负面反馈", "差评", "缺点"];
const HIGHLIGHTS: &[&str] = &[
    "highlights",
    "themes",
    "key_points",
    "keyPoints",
    "feedback",
    "主要反馈",
    "关键点",
    "主题",
];
const STARS: &[&str] = &["stars", "rating", "star", "score", "星级", "评分"];

const UNMET_LIST: &[&str] = &["needs", "items", "list", "需求列表"];
const SEVERITY: &[&str] = &["severity", "importance", "priority", "严重程度", "重要性"];

const OWN_STRENGTHS: &[&str] = &["own_strengths", "ownStrengths", "our_strengths", "本品优势"];
const OWN_WEAKNESSES: &[&str] = &["own_weaknesses", "ownWeaknesses", "our_weaknesses", "本品劣势"];
const COMP_STRENGTHS: &[&str] = &["competitor_strengths", "competitorStrengths", "竞品优势"];
const COMP_WEAKNESSES: &[&str] = &["competitor_weaknesses", "competitorWeaknesses", "竞品劣势"];
const DIMENSIONS: &[&str] = &[
    "dimensions",
    "dimension_scores",
    "dimensionScores",
    "scores",
    "对比维度",
    "维度对比",
    "维度评分",
];
const DIMENSION_NAME: &[&str] = &["dimension", "name", "维度", "名称"];
const OWN_SCORE: &[&str] = &["own", "ownScore", "own_score", "本品", "本品得分"];
const COMP_SCORE: &[&str] = &["competitor", "competitorScore", "competitor_score", "竞品", "竞品得分"];
const POSITIONING: &[&str] = &["positioning", "market_positioning", "marketPositioning", "市场定位", "定位"];
const AXIS_X: &[&str] = &["x", "price", "价格", "横轴"];
const AXIS_Y: &[&str] = &["y", "quality", "satisfaction", "质量", "满意度", "纵轴"];
const IS_OWN: &[&str] = &["isOwn", "is_own", "own", "本品"];

const OPPORTUNITY_LIST: &[&str] = &["opportunities", "suggestions", "items", "建议列表"];
const PRIORITY: &[&str] = &["priority", "优先级"];
const IMPACT: &[&str] = &["impact", "expected_impact", "expectedImpact", "影响", "预期影响", "潜在影响"];
const EFFORT: &[&str] = &["effort", "difficulty", "implementation_difficulty", "难度", "实施难度"];
const EVIDENCE: &[&str] = &["evidence", "basis", "supporting_reviews", "依据", "证据"];
const ACTIONS: &[&str] = &["actions", "action_items", "actionItems", "steps", "行动建议", "具体措施", "措施"];

/// Fold a raw analysis result into a [`Report`].
///
/// Accepts the result object itself, a `{"result": {...}}` style wrapper, or
/// a JSON document serialized into a string.
#[must_use]
pub fn normalize(raw: &Value) -> Report {
    let reparsed;
    let mut root = raw;
    if let Value::String(body) = raw {
        reparsed = serde_json::from_str::<Value>(body.trim()).unwrap_or(Value::Null);
        root = &reparsed;
    }
    let root = unwrap_envelope(root);

    let own_source = field(root, OWN).unwrap_or(root);
    let mut own = brand(own_source);
    if own.is_empty() && !std::ptr::eq(own_source, root) {
        own = brand(root);
    }
    let competitor = field(root, COMPETITOR)
        .map(brand)
        .filter(|analysis| !analysis.is_empty());
    let comparison = field(root, COMPARISON)
        .or_else(|| field(own_source, COMPARISON))
        .map(comparison)
        .unwrap_or_default();
    let opportunities = field(root, OPPORTUNITIES)
        .or_else(|| field(own_source, OPPORTUNITIES))
        .map(opportunities)
        .unwrap_or_default();

    Report {
        meta: meta(root),
        own,
        competitor,
        comparison,
        opportunities,
    }
}

/// Classify the key vocabulary of a raw result.
#[must_use]
pub fn detect_generation(raw: &Value) -> SchemaGeneration {
    let root = unwrap_envelope(raw);
    let Some(map) = root.as_object().filter(|map| !map.is_empty()) else {
        return SchemaGeneration::Empty;
    };
    let (mut localized, mut legacy) = key_scripts(map);
    if let Some(own) = field(root, OWN).and_then(Value::as_object) {
        let (own_localized, own_legacy) = key_scripts(own);
        localized |= own_localized;
        legacy |= own_legacy;
    }
    match (localized, legacy) {
        (true, true) => SchemaGeneration::Mixed,
        (true, false) => SchemaGeneration::Localized,
        (false, true) => SchemaGeneration::Legacy,
        (false, false) => SchemaGeneration::Empty,
    }
}

fn unwrap_envelope(root: &Value) -> &Value {
    let known = [OWN, COMPETITOR, PERSONAS, FEEDBACK, UNMET, COMPARISON, OPPORTUNITIES];
    if known.iter().any(|keys| has_any(root, keys)) {
        return root;
    }
    field(root, WRAPPERS)
        .filter(|inner| inner.is_object())
        .map_or(root, unwrap_envelope)
}

fn meta(root: &Value) -> ReportMeta {
    let nested = field(root, META);
    let lookup_text = |keys: &[&str]| {
        text(root, keys).or_else(|| nested.and_then(|inner| text(inner, keys)))
    };
    let lookup_number = |keys: &[&str]| {
        number(root, keys).or_else(|| nested.and_then(|inner| number(inner, keys)))
    };
    let review_count = count(root, REVIEW_COUNT).or_else(|| nested.and_then(|inner| count(inner, REVIEW_COUNT)));

    ReportMeta {
        id: lookup_text(ID),
        category: lookup_text(CATEGORY),
        generated_at: lookup_text(GENERATED_AT),
        language: lookup_text(LANGUAGE).and_then(|tag| Language::from_tag(&tag)),
        generation: detect_generation(root),
        review_count,
        average_rating: lookup_number(AVERAGE_RATING).map(|rating| rating.clamp(1.0, 5.0)),
        summary: lookup_text(EXEC_SUMMARY),
    }
}

fn brand(section: &Value) -> BrandAnalysis {
    BrandAnalysis {
        brand: text(section, BRAND),
        personas: field(section, PERSONAS).map(personas).unwrap_or_default(),
        feedback: field(section, FEEDBACK).map(feedback).unwrap_or_default(),
        unmet_needs: field(section, UNMET).map(unmet_needs).unwrap_or_default(),
    }
}

fn personas(section: &Value) -> PersonaSection {
    let structured = [PERSONA_LIST, SCENARIOS, MOTIVATIONS, SUMMARY]
        .iter()
        .any(|keys| has_any(section, keys));
    if !structured {
        return PersonaSection {
            personas: entries(section).into_iter().filter_map(persona).collect(),
            ..PersonaSection::default()
        };
    }
    PersonaSection {
        summary: text(section, SUMMARY),
        personas: entries_at(section, PERSONA_LIST)
            .into_iter()
            .filter_map(persona)
            .collect(),
        scenarios: insights_at(section, SCENARIOS),
        motivations: insights_at(section, MOTIVATIONS),
    }
}

fn persona(entry: Entry<'_>) -> Option<Persona> {
    let name = entry_label(entry)?;
    Some(Persona {
        name,
        description: entry_detail(entry),
        share: share(entry.value, SHARE),
        traits: strings_at(entry.value, TRAITS),
        quotes: strings_at(entry.value, QUOTES),
    })
}

fn insight(entry: Entry<'_>) -> Option<Insight> {
    let label = entry_label(entry)?;
    let keyed_number = entry.key.is_some() && entry.value.is_number();
    Some(Insight {
        label,
        detail: entry_detail(entry),
        share: share(entry.value, SHARE),
        mentions: count(entry.value, MENTIONS).or_else(|| {
            keyed_number
                .then(|| scalar_number(entry.value))
                .flatten()
                .filter(|n| *n >= 0.0)
                .map(round_count)
        }),
        quotes: strings_at(entry.value, QUOTES),
    })
}

fn insights(value: &Value) -> Vec<Insight> {
    entries(value).into_iter().filter_map(insight).collect()
}

fn insights_at(value: &Value, keys: &[&str]) -> Vec<Insight> {
    field(value, keys).map(insights).unwrap_or_default()
}

fn feedback(section: &Value) -> FeedbackSection {
    let structured = [RATINGS, POSITIVES, NEGATIVES, SUMMARY]
        .iter()
        .any(|keys| has_any(section, keys));
    let mut ratings: Vec<RatingBucket> = if structured {
        entries_at(section, RATINGS)
    } else {
        entries(section)
    }
    .into_iter()
    .filter_map(rating_bucket)
    .collect();
    ratings.sort_by(|a, b| b.stars.cmp(&a.stars));

    if !structured {
        return FeedbackSection {
            ratings,
            ..FeedbackSection::default()
        };
    }
    FeedbackSection {
        summary: text(section, SUMMARY),
        ratings,
        positives: insights_at(section, POSITIVES),
        negatives: insights_at(section, NEGATIVES),
    }
}

fn rating_bucket(entry: Entry<'_>) -> Option<RatingBucket> {
    let label = entry_label(entry)?;
    let stars = number(entry.value, STARS)
        .map(clamp_stars)
        .or_else(|| stars_in(&label));
    let sentiment = stars.map_or_else(|| sentiment_in(&label), Sentiment::from_stars);
    let highlights = match entry.value {
        Value::Array(_) => insights(entry.value),
        Value::String(_) => strings(entry.value)
            .into_iter()
            .map(|label| Insight {
                label,
                ..Insight::default()
            })
            .collect(),
        _ => insights_at(entry.value, HIGHLIGHTS),
    };
    Some(RatingBucket {
        stars,
        label,
        count: count(entry.value, MENTIONS).or_else(|| {
            scalar_number(entry.value)
                .filter(|n| *n >= 0.0 && entry.value.is_number())
                .map(round_count)
        }),
        share: share(entry.value, SHARE),
        sentiment,
        highlights,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_stars(raw: f64) -> u8 {
    raw.round().clamp(1.0, 5.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_count(raw: f64) -> u64 {
    raw.round() as u64
}

/// First star digit in a label such as `5星`, `five_star`, `四星` or `1-2 stars`.
fn stars_in(label: &str) -> Option<u8> {
    const WORDS: [(&str, u8); 10] = [
        ("five", 5),
        ("four", 4),
        ("three", 3),
        ("two", 2),
        ("one", 1),
        ("五", 5),
        ("四", 4),
        ("三", 3),
        ("二", 2),
        ("一", 1),
    ];
    if let Some(digit) = label.chars().find_map(|c| c.to_digit(10)) {
        return u8::try_from(digit).ok().filter(|d| (1..=5).contains(d));
    }
    let lowered = label.to_lowercase();
    WORDS
        .iter()
        .find(|(word, _)| lowered.contains(word))
        .map(|(_, stars)| *stars)
}

fn sentiment_in(label: &str) -> Sentiment {
    let lowered = label.to_lowercase();
    if ["positive", "good", "好评", "正面"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        Sentiment::Positive
    } else if ["negative", "bad", "差评", "负面"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn unmet_needs(section: &Value) -> Vec<UnmetNeed> {
    let list = field(section, UNMET_LIST).unwrap_or(section);
    entries(list)
        .into_iter()
        .filter(|entry| !matches!(entry.key, Some(key) if SUMMARY.contains(&key)))
        .filter_map(|entry| {
            Some(UnmetNeed {
                need: entry_label(entry)?,
                detail: entry_detail(entry),
                severity: level(entry.value, SEVERITY),
                mentions: count(entry.value, MENTIONS),
                quotes: strings_at(entry.value, QUOTES),
            })
        })
        .collect()
}

fn comparison(section: &Value) -> Comparison {
    Comparison {
        summary: text(section, SUMMARY).or_else(|| scalar_text(section)),
        own_strengths: insights_at(section, OWN_STRENGTHS),
        own_weaknesses: insights_at(section, OWN_WEAKNESSES),
        competitor_strengths: insights_at(section, COMP_STRENGTHS),
        competitor_weaknesses: insights_at(section, COMP_WEAKNESSES),
        dimensions: entries_at(section, DIMENSIONS)
            .into_iter()
            .filter_map(dimension)
            .collect(),
        positioning: positioning(field(section, POSITIONING)),
    }
}

fn dimension(entry: Entry<'_>) -> Option<DimensionScore> {
    let dimension = text(entry.value, DIMENSION_NAME).or_else(|| entry_label(entry))?;
    let score = |keys: &[&str]| number(entry.value, keys).map(|n| n.clamp(0.0, 10.0));
    Some(DimensionScore {
        dimension,
        own: score(OWN_SCORE),
        competitor: score(COMP_SCORE),
    })
}

/// Scatter points rescaled so both axes span 0 to 100.
///
/// Axes reported on a 0-1 or 0-10 scale are stretched; anything else is clamped.
fn positioning(section: Option<&Value>) -> Vec<PositionPoint> {
    let Some(section) = section else {
        return Vec::new();
    };
    let raw: Vec<(String, f64, f64, bool)> = entries(section)
        .into_iter()
        .filter_map(|entry| {
            let label = entry_label(entry)?;
            let x = number(entry.value, AXIS_X)?;
            let y = number(entry.value, AXIS_Y)?;
            let own = field(entry.value, IS_OWN)
                .is_some_and(|flag| flag.as_bool().unwrap_or(false) || flag.as_str() == Some("own"));
            Some((label, x, y, own))
        })
        .collect();
    let scale_for = |max: f64| {
        if max <= 1.0 {
            100.0
        } else if max <= 10.0 {
            10.0
        } else {
            1.0
        }
    };
    let x_scale = scale_for(raw.iter().map(|p| p.1).fold(0.0, f64::max));
    let y_scale = scale_for(raw.iter().map(|p| p.2).fold(0.0, f64::max));
    raw.into_iter()
        .map(|(label, x, y, own)| PositionPoint {
            label,
            x: (x * x_scale).clamp(0.0, 100.0),
            y: (y * y_scale).clamp(0.0, 100.0),
            own,
        })
        .collect()
}

fn opportunities(section: &Value) -> Vec<Opportunity> {
    let list = field(section, OPPORTUNITY_LIST).unwrap_or(section);
    let mut items: Vec<Opportunity> = entries(list)
        .into_iter()
        .filter(|entry| !matches!(entry.key, Some(key) if SUMMARY.contains(&key)))
        .filter_map(|entry| {
            Some(Opportunity {
                title: entry_label(entry)?,
                description: entry_detail(entry),
                priority: level(entry.value, PRIORITY),
                impact: level(entry.value, IMPACT),
                effort: level(entry.value, EFFORT),
                evidence: {
                    let mut evidence = strings_at(entry.value, EVIDENCE);
                    evidence.extend(strings_at(entry.value, QUOTES));
                    evidence
                },
                actions: strings_at(entry.value, ACTIONS),
            })
        })
        .collect();
    items.sort_by(|a, b| b.priority.cmp(&a.priority));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Level;
    use serde_json::json;

    fn localized_fixture() -> Value {
        json!({
            "目标品类": "无线耳机",
            "评论总数": "1,204",
            "平均评分": 4.3,
            "本品分析": {
                "消费者画像分析": {
                    "总结": "以通勤人群为主",
                    "用户画像": [
                        {"名称": "通勤族", "描述": "每天地铁通勤", "占比": "45%", "特征": ["注重降噪", "预算中等"]},
                        {"名称": "学生", "占比": 0.25}
                    ],
                    "使用场景": {"通勤": "地铁和公交", "运动": "跑步"}
                },
                "按评分划分的消费者反馈": {
                    "1星": {"数量": 12, "主要反馈": ["断连", "电池衰减"]},
                    "5星": {"数量": 300, "占比": "60%", "主要反馈": [{"主题": "音质", "提及次数": 88}]}
                },
                "未满足的需求": [
                    {"需求": "多设备切换", "严重程度": "高", "典型评论": ["希望能同时连两台设备"]}
                ]
            },
            "竞品对比分析": {
                "总结": "本品降噪领先",
                "本品优势": ["降噪"],
                "竞品优势": [{"名称": "续航", "描述": "多 10 小时"}],
                "维度评分": [{"维度": "音质", "本品": 8.5, "竞品": "7"}]
            },
            "机会建议": [
                {"标题": "推出多点连接", "优先级": "中", "行动建议": "固件升级；宣传卖点"},
                {"标题": "改善电池", "优先级": "高"}
            ]
        })
    }

    #[test]
    fn localized_result_normalizes_every_section() {
        let report = normalize(&localized_fixture());
        assert_eq!(report.meta.generation, SchemaGeneration::Localized);
        assert_eq!(report.meta.category.as_deref(), Some("无线耳机"));
        assert_eq!(report.meta.review_count, Some(1204));

        let personas = &report.own.personas;
        assert_eq!(personas.summary.as_deref(), Some("以通勤人群为主"));
        assert_eq!(personas.personas.len(), 2);
        assert_eq!(personas.personas[0].share, Some(45.0));
        assert_eq!(personas.personas[0].traits, vec!["注重降噪", "预算中等"]);
        assert_eq!(personas.personas[1].share, Some(25.0));
        assert_eq!(personas.scenarios.len(), 2);

        let ratings = &report.own.feedback.ratings;
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].stars, Some(5));
        assert_eq!(ratings[0].sentiment, Sentiment::Positive);
        assert_eq!(ratings[0].highlights[0].mentions, Some(88));
        assert_eq!(ratings[1].stars, Some(1));
        assert_eq!(ratings[1].count, Some(12));

        assert_eq!(report.own.unmet_needs[0].severity, Level::High);
        assert_eq!(report.comparison.dimensions[0].competitor, Some(7.0));
        assert!(report.has_competitor());

        assert_eq!(report.opportunities[0].title, "改善电池");
        assert_eq!(report.opportunities[1].actions, vec!["固件升级", "宣传卖点"]);
    }

    #[test]
    fn legacy_camel_case_result_normalizes() {
        let raw = json!({
            "targetCategory": "Coffee Grinders",
            "ownBrandAnalysis": {
                "userPersonas": [{"name": "Home barista", "percentage": 52}],
                "unmetNeeds": {"needs": ["Quieter motor"]}
            },
            "competitorAnalysis": {
                "feedbackByRating": {"ratings": [{"label": "2 stars", "count": 9}]}
            },
            "opportunities": {"items": [{"title": "Noise dampening", "impact": 8}]}
        });
        let report = normalize(&raw);
        assert_eq!(report.meta.generation, SchemaGeneration::Legacy);
        assert_eq!(report.own.personas.personas[0].name, "Home barista");
        assert_eq!(report.own.unmet_needs[0].need, "Quieter motor");
        let competitor = report.competitor.as_ref().map(|c| &c.feedback.ratings[0]);
        assert_eq!(competitor.and_then(|b| b.stars), Some(2));
        assert_eq!(competitor.map(|b| b.sentiment), Some(Sentiment::Negative));
        assert_eq!(report.opportunities[0].impact, Level::High);
        assert!(report.comparison.is_empty());
    }

    #[test]
    fn one_percent_persona_is_not_inflated() {
        let raw = json!({"userPersonas": [
            {"name": "Audiophile", "percentage": 1},
            {"name": "Commuter", "percentage": 99}
        ]});
        let report = normalize(&raw);
        let shares: Vec<_> = report.own.personas.personas.iter().map(|p| p.share).collect();
        assert_eq!(shares, vec![Some(1.0), Some(99.0)]);
    }

    #[test]
    fn snake_case_and_mixed_keys_are_detected() {
        let raw = json!({
            "own_brand_analysis": {"user_personas": [{"name": "Gamer"}]},
            "竞品对比分析": {"summary": "close race"}
        });
        assert_eq!(detect_generation(&raw), SchemaGeneration::Mixed);
        let report = normalize(&raw);
        assert_eq!(report.own.personas.personas[0].name, "Gamer");
        assert_eq!(report.comparison.summary.as_deref(), Some("close race"));
    }

    #[test]
    fn own_brand_falls_back_to_root_and_envelopes_unwrap() {
        let raw = json!({"result": {"unmetNeeds": ["Longer cable"], "userInsights": ["Night owls"]}});
        let report = normalize(&raw);
        assert_eq!(report.own.unmet_needs[0].need, "Longer cable");
        assert_eq!(report.own.personas.personas[0].name, "Night owls");
        assert!(report.competitor.is_none());
    }

    #[test]
    fn stringified_json_is_reparsed() {
        let raw = Value::String(r#"{"suggestions": ["Bundle a case"]}"#.to_string());
        let report = normalize(&raw);
        assert_eq!(report.opportunities[0].title, "Bundle a case");
    }

    #[test]
    fn garbage_and_empty_inputs_never_panic() {
        for raw in [
            json!(null),
            json!({}),
            json!([1, 2, 3]),
            json!("not json"),
            json!({"本品分析": 42, "机会建议": {"x": null}, "comparison": [null, true]}),
            json!({"feedback": {"ratings": "n/a"}, "unmet_needs": [{}, {"need": ""}]}),
        ] {
            let report = normalize(&raw);
            assert!(report.own.unmet_needs.iter().all(|n| !n.need.is_empty()));
        }
        assert!(normalize(&json!({})).is_empty());
        assert_eq!(detect_generation(&json!({})), SchemaGeneration::Empty);
    }

    #[test]
    fn ratings_and_percentages_are_clamped() {
        let raw = json!({
            "average_rating": 9,
            "feedback": {"ratings": [{"label": "top", "rating": 11, "share": "250%"}]}
        });
        let report = normalize(&raw);
        assert_eq!(report.meta.average_rating, Some(5.0));
        let bucket = &report.own.feedback.ratings[0];
        assert_eq!(bucket.stars, Some(5));
        assert_eq!(bucket.share, Some(100.0));
    }

    #[test]
    fn positioning_axes_are_rescaled() {
        let raw = json!({
            "comparison": {
                "positioning": [
                    {"name": "Us", "x": 0.8, "y": 7, "isOwn": true},
                    {"name": "Them", "x": 0.4, "y": 9}
                ]
            }
        });
        let points = normalize(&raw).comparison.positioning;
        assert_eq!(points.len(), 2);
        assert!(points[0].own);
        assert!((points[0].x - 80.0).abs() < 1e-9);
        assert!((points[1].y - 90.0).abs() < 1e-9);
    }
}
