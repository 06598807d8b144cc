//! Locale string resolution.
//!
//! Dictionaries are nested JSON objects keyed by path segment. A dotted key
//! such as `dashboard.title` walks one object level per segment and resolves
//! only when the walk ends on a string.
//!
//! Resolution never fails: a missing locale falls back to the default
//! locale's dictionary, a missing key is retried against the default locale,
//! and a key missing everywhere degrades to its last path segment.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const PT_DICTIONARY: &str = include_str!("../../locales/pt.json");
const EN_DICTIONARY: &str = include_str!("../../locales/en.json");
const ES_DICTIONARY: &str = include_str!("../../locales/es.json");

/// Supported interface languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
    Es,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Pt, Locale::En, Locale::Es];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" | "pt_br" => Ok(Locale::Pt),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "es" | "es-es" | "es_es" => Ok(Locale::Es),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// Resolves dotted keys against per-locale dictionaries
#[derive(Debug, Clone)]
pub struct Translator {
    dictionaries: HashMap<Locale, Value>,
    default_locale: Locale,
    empty: Value,
}

impl Translator {
    /// Translator with the bundled pt/en/es dictionaries
    pub fn bundled(default_locale: Locale) -> Self {
        let mut translator = Self::new(default_locale);
        for (locale, source) in [
            (Locale::Pt, PT_DICTIONARY),
            (Locale::En, EN_DICTIONARY),
            (Locale::Es, ES_DICTIONARY),
        ] {
            match serde_json::from_str::<Value>(source) {
                Ok(dictionary) => translator = translator.with_dictionary(locale, dictionary),
                Err(e) => tracing::error!("Bundled dictionary for '{}' is not valid JSON: {}", locale, e),
            }
        }
        translator
    }

    /// Translator with no dictionaries loaded
    pub fn new(default_locale: Locale) -> Self {
        Self {
            dictionaries: HashMap::new(),
            default_locale,
            empty: Value::Object(Default::default()),
        }
    }

    pub fn with_dictionary(mut self, locale: Locale, dictionary: Value) -> Self {
        self.dictionaries.insert(locale, dictionary);
        self
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    pub fn has_locale(&self, locale: Locale) -> bool {
        self.dictionaries.contains_key(&locale)
    }

    /// Full dictionary for `locale`, or the default locale's when it is not loaded
    pub fn dictionary(&self, locale: Locale) -> &Value {
        self.dictionaries
            .get(&locale)
            .or_else(|| self.dictionaries.get(&self.default_locale))
            .unwrap_or(&self.empty)
    }

    pub fn translate(&self, locale: Locale, key: &str) -> String {
        self.translate_with(locale, key, &HashMap::new())
    }

    /// Resolve `key` for `locale`, substituting `{name}` placeholders from `params`
    pub fn translate_with(&self, locale: Locale, key: &str, params: &HashMap<String, String>) -> String {
        let resolved = lookup(self.dictionary(locale), key).or_else(|| {
            if locale == self.default_locale {
                return None;
            }
            self.dictionaries
                .get(&self.default_locale)
                .and_then(|dictionary| lookup(dictionary, key))
        });

        match resolved {
            Some(template) => interpolate(template, params),
            None => {
                tracing::debug!("Missing translation for '{}' in '{}'", key, locale);
                last_segment(key).to_string()
            }
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::bundled(Locale::default())
    }
}

/// Walk `key` one segment at a time; only a string leaf counts as resolved
fn lookup<'a>(dictionary: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(dictionary, |node, segment| node.as_object()?.get(segment))?
        .as_str()
}

/// Single left-to-right pass; substituted values are never rescanned
fn interpolate(template: &str, params: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|name| !name.contains('{'))
            .and_then(|name| params.get(name).map(|value| (name.len(), value)));

        match value {
            Some((name_len, value)) => {
                out.push_str(value);
                rest = &after[name_len + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn last_segment(key: &str) -> &str {
    match key.rsplit('.').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => key,
    }
}
