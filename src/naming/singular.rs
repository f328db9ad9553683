//! Plural → singular, for naming the element type of array properties.
//!
//! English only and heuristic. The rules look at the trailing word of a key
//! (`line_items`, `lineItems` → `item`) and leave the rest untouched.
use once_cell::sync::Lazy;
use regex::Regex;

/// Turns a plural key into its singular form. Must be total: a word it
/// doesn't recognise comes back unchanged.
pub trait Singularize {
    fn singularize(&self, word: &str) -> String;
}

impl<F> Singularize for F
where
    F: Fn(&str) -> String,
{
    fn singularize(&self, word: &str) -> String {
        self(word)
    }
}

/// Rule-based English singularizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

const UNCOUNTABLE: &[&str] = &[
    "data", "metadata", "equipment", "information", "rice", "money", "species", "series",
    "fish", "sheep", "deer", "news", "moose", "offspring", "aircraft", "luggage", "feedback",
    "software", "hardware", "media",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
];

/// Ordered; the first matching rule wins.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)(alias|status|campus|census|virus|bus)es$", "${1}"),
        (r"(?i)(octop|alumn|fung|cact|radi|stimul|syllab|nucle)i$", "${1}us"),
        (r"(?i)^(cris|ax|test)es$", "${1}is"),
        (r"(?i)(shoe|toe)s$", "${1}"),
        (r"(?i)(her|potat|tomat|ech|vet)oes$", "${1}o"),
        (r"(?i)(x|ch|ss|sh|zz)es$", "${1}"),
        (r"(?i)(movie|cookie|zombie|selfie|rookie|calorie)s$", "${1}"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(lea|loa|thie|shea)ves$", "${1}f"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(hive|tive|drive|curve|valve|groove|move|glove)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)^(analy|ba|diagno|parenthe|progno|synop|the)ses$", "${1}sis"),
        (r"(?i)(ss|us|is)$", "${1}"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let re = Regex::new(pattern).unwrap_or_else(|e| panic!("bad singular rule {pattern}: {e}"));
        (re, replacement)
    })
    .collect()
});

impl Singularize for EnglishInflector {
    fn singularize(&self, word: &str) -> String {
        let split = last_word_start(word);
        let (head, last) = word.split_at(split);
        if last.is_empty() {
            return word.to_string();
        }

        let lower = last.to_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some((_, single)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
            return format!("{head}{}", match_case(last, single));
        }

        for (re, replacement) in RULES.iter() {
            if re.is_match(last) {
                return format!("{head}{}", re.replace(last, *replacement));
            }
        }
        word.to_string()
    }
}

/// Byte offset where the trailing word starts: after the last separator, or
/// at the last lower→upper camelCase boundary.
fn last_word_start(word: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (i, c) in word.char_indices() {
        if matches!(c, '_' | '-' | ' ') {
            start = i + c.len_utf8();
        } else if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            start = i;
        }
        prev = Some(c);
    }
    start
}

fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    let all_upper = original.chars().count() > 1 && original.chars().all(|c| !c.is_lowercase());
    if all_upper {
        replacement.to_uppercase()
    } else if first_upper {
        let mut rs = replacement.chars();
        match rs.next() {
            Some(c) => c.to_uppercase().chain(rs).collect(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}
