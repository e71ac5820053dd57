//! Alias-aware accessors over untyped JSON.

use crate::schema::Level;
use serde_json::{Map, Value};

/// One element of a list-like value: array items have no key, object entries do.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry<'a> {
    pub(crate) key: Option<&'a str>,
    pub(crate) value: &'a Value,
}

pub(crate) const LABEL: &[&str] = &[
    "name", "title", "label", "theme", "topic", "aspect", "persona", "need", "名称", "标题",
    "主题", "类型", "画像", "画像名称", "需求", "方面",
];
pub(crate) const DETAIL: &[&str] = &[
    "description", "detail", "details", "explanation", "desc", "analysis", "reason", "描述",
    "详情", "说明", "分析", "原因", "具体描述",
];
pub(crate) const SUMMARY: &[&str] = &[
    "summary", "overview", "conclusion", "总结", "概述", "摘要", "总体结论", "核心发现",
];
pub(crate) const SHARE: &[&str] = &[
    "percentage", "percent", "share", "ratio", "proportion", "占比", "比例", "百分比",
];
pub(crate) const MENTIONS: &[&str] = &[
    "count", "mentions", "mention_count", "mentionCount", "frequency", "数量", "提及次数",
    "次数", "频次", "评论数",
];
pub(crate) const QUOTES: &[&str] = &[
    "quotes", "examples", "sample_reviews", "sampleReviews", "reviews", "typical_reviews",
    "典型评论", "评论示例", "用户原声", "原声", "示例评论", "示例",
];

/// First present, non-null value under any alias.
pub(crate) fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = value.as_object()?;
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|found| !found.is_null())
}

/// Whether the object carries any of the aliases.
pub(crate) fn has_any(value: &Value, keys: &[&str]) -> bool {
    field(value, keys).is_some()
}

/// Trimmed, non-empty text under any alias; numbers and booleans are stringified.
pub(crate) fn text(value: &Value, keys: &[&str]) -> Option<String> {
    field(value, keys).and_then(scalar_text)
}

/// Text of a scalar value, or `None` for blanks and containers.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Lenient number under any alias.
pub(crate) fn number(value: &Value, keys: &[&str]) -> Option<f64> {
    field(value, keys).and_then(scalar_number)
}

/// Parse `42`, `"42"`, `"42%"`, `"1,204"` or `"4.5/5"` into a float.
pub(crate) fn scalar_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let head = raw.split('/').next().unwrap_or_default();
            let cleaned: String = head
                .trim()
                .trim_end_matches(['%', '％'])
                .chars()
                .filter(|c| *c != ',')
                .collect();
            cleaned.trim().parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Share expressed on a 0 to 100 scale; fractions below one are scaled up.
pub(crate) fn share(value: &Value, keys: &[&str]) -> Option<f64> {
    let raw = field(value, keys)?;
    let number = scalar_number(raw)?;
    let is_fraction = !matches!(raw, Value::String(s) if s.contains(['%', '％']));
    let scaled = if is_fraction && number > 0.0 && number < 1.0 {
        number * 100.0
    } else {
        number
    };
    Some(scaled.clamp(0.0, 100.0))
}

/// Non-negative count under any alias.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn count(value: &Value, keys: &[&str]) -> Option<u64> {
    let number = number(value, keys)?;
    (number >= 0.0).then(|| number.round() as u64)
}

/// Items of a list-like value. Arrays yield their elements; objects their entries.
pub(crate) fn entries(value: &Value) -> Vec<Entry<'_>> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| Entry { key: None, value: item })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, item)| !item.is_null())
            .map(|(key, item)| Entry {
                key: Some(key.as_str()),
                value: item,
            })
            .collect(),
        Value::Null => Vec::new(),
        other => vec![Entry {
            key: None,
            value: other,
        }],
    }
}

/// Entries of the first list found under any alias.
pub(crate) fn entries_at<'a>(value: &'a Value, keys: &[&str]) -> Vec<Entry<'a>> {
    field(value, keys).map(entries).unwrap_or_default()
}

/// Flatten strings or string-bearing objects into a list of text.
pub(crate) fn strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                scalar_text(item)
                    .or_else(|| text(item, &["quote", "text", "content", "review", "内容", "评论"]))
                    .or_else(|| text(item, LABEL))
            })
            .collect(),
        Value::String(raw) => scalar_text(value)
            .map(|_| {
                raw.split(['\n', ';', '；'])
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        Value::Object(map) => map.values().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

/// Strings under any alias.
pub(crate) fn strings_at(value: &Value, keys: &[&str]) -> Vec<String> {
    field(value, keys).map(strings).unwrap_or_default()
}

/// Label of an entry: explicit label field, the scalar itself, or the object key.
pub(crate) fn entry_label(entry: Entry<'_>) -> Option<String> {
    text(entry.value, LABEL)
        .or_else(|| scalar_text(entry.value).filter(|_| entry.key.is_none()))
        .or_else(|| entry.key.map(str::trim).filter(|k| !k.is_empty()).map(ToString::to_string))
}

/// Detail of an entry; a keyed scalar (`{"Battery": "lasts long"}`) uses the scalar.
pub(crate) fn entry_detail(entry: Entry<'_>) -> Option<String> {
    text(entry.value, DETAIL).or_else(|| {
        entry
            .key
            .and_then(|_| scalar_text(entry.value))
            .filter(|_| !entry.value.is_number())
    })
}

/// Qualitative level from words (`high`, `高`) or scores on 0-1, 0-10 or 0-100 scales.
pub(crate) fn level(value: &Value, keys: &[&str]) -> Level {
    field(value, keys).map_or(Level::Unspecified, scalar_level)
}

pub(crate) fn scalar_level(value: &Value) -> Level {
    if let Value::String(raw) = value {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("high")
            || lowered.contains("critical")
            || lowered.contains('高')
            || lowered.contains("严重")
            || lowered.contains("紧急")
        {
            return Level::High;
        }
        if lowered.contains("medium") || lowered.contains("moderate") || lowered.contains('中') {
            return Level::Medium;
        }
        if lowered.contains("low") || lowered.contains("minor") || lowered.contains('低') {
            return Level::Low;
        }
    }
    let Some(score) = scalar_number(value) else {
        return Level::Unspecified;
    };
    let unit = if score <= 1.0 {
        score
    } else if score <= 10.0 {
        score / 10.0
    } else {
        score / 100.0
    };
    if unit >= 0.67 {
        Level::High
    } else if unit >= 0.34 {
        Level::Medium
    } else {
        Level::Low
    }
}

/// `(has non-ASCII keys, has ASCII keys)` for schema generation detection.
pub(crate) fn key_scripts(map: &Map<String, Value>) -> (bool, bool) {
    let localized = map.keys().any(|key| !key.is_ascii());
    let legacy = map.keys().any(|key| key.is_ascii());
    (localized, legacy)
}
