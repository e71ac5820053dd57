//! JSON-backed English and Chinese text bundles.

use reviewscope_api_models::{Language, StepView};
use serde_json::Value;
use std::sync::LazyLock;

/// Translation bundle containing a parsed JSON tree for one language.
#[derive(Clone, Debug)]
pub struct TranslationBundle {
    /// Language backing this bundle.
    pub language: Language,
    tree: Value,
}

impl PartialEq for TranslationBundle {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
    }
}

impl Default for TranslationBundle {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl TranslationBundle {
    /// Build the bundle for `language`. Missing keys fall back to English.
    #[must_use]
    pub fn new(language: Language) -> Self {
        let tree: Value = serde_json::from_str(raw_bundle(language)).unwrap_or(Value::Null);
        Self { language, tree }
    }

    /// Resolve a dotted path (`section.key`) with English fallback and caller default.
    #[must_use]
    pub fn text(&self, path: &str, default: &str) -> String {
        resolve(&self.tree, path)
            .or_else(|| resolve(&EN_FALLBACK.tree, path))
            .unwrap_or_else(|| default.to_string())
    }

    /// Like [`Self::text`] but falls back to the path itself.
    #[must_use]
    pub fn t(&self, path: &str) -> String {
        self.text(path, path)
    }

    /// Resolve `path` and substitute `{name}` placeholders.
    #[must_use]
    pub fn format(&self, path: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(path), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
    }

    /// Step label in this bundle's language.
    #[must_use]
    pub fn step_label<'a>(&self, step: &'a StepView) -> &'a str {
        step.label(self.language)
    }
}

static EN_FALLBACK: LazyLock<TranslationBundle> =
    LazyLock::new(|| TranslationBundle::new(Language::En));

fn resolve(tree: &Value, path: &str) -> Option<String> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str().map(ToString::to_string)
}

const fn raw_bundle(language: Language) -> &'static str {
    match language {
        Language::En => include_str!("../i18n/en.json"),
        Language::Zh => include_str!("../i18n/zh.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_paths(node: &Value, prefix: &str, out: &mut Vec<String>) {
        if let Value::Object(map) = node {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                leaf_paths(child, &path, out);
            }
        } else {
            out.push(prefix.to_string());
        }
    }

    #[test]
    fn missing_key_falls_back_to_default() {
        let bundle = TranslationBundle::new(Language::Zh);
        assert_eq!(bundle.text("nonexistent.key", "fallback"), "fallback");
        assert_eq!(bundle.t("nonexistent.key"), "nonexistent.key");
    }

    #[test]
    fn bundles_cover_the_same_keys() {
        let mut english = Vec::new();
        let mut chinese = Vec::new();
        leaf_paths(&TranslationBundle::new(Language::En).tree, "", &mut english);
        leaf_paths(&TranslationBundle::new(Language::Zh).tree, "", &mut chinese);
        english.sort();
        chinese.sort();
        assert!(!english.is_empty());
        assert_eq!(english, chinese);
    }

    #[test]
    fn languages_resolve_their_own_text() {
        assert_eq!(TranslationBundle::new(Language::En).t("nav.history"), "History");
        assert_eq!(TranslationBundle::new(Language::Zh).t("nav.history"), "历史报告");
    }

    #[test]
    fn format_substitutes_placeholders() {
        let bundle = TranslationBundle::new(Language::En);
        assert_eq!(bundle.format("missing {n}", &[("n", "3")]), "missing 3");
    }

    #[test]
    fn step_labels_prefer_chinese_names() {
        let step: StepView = serde_json::from_value(serde_json::json!({
            "id": "extract", "name": "Extract", "name_zh": "提取", "status": "running"
        }))
        .expect("step");
        assert_eq!(TranslationBundle::new(Language::Zh).step_label(&step), "提取");
        assert_eq!(TranslationBundle::new(Language::En).step_label(&step), "Extract");
    }
}
