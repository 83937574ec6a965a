//! Title filter: decides whether a raw search result actually belongs to a
//! tracked keyword. Pure — no network or persistence side effects.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{PriceMatch, RawSearchItem};

/// Titles containing any of these are dropped, unless the word is part of
/// the search keyword itself. Bundle/multi-pack listings pollute single-item
/// price history.
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &["세트", "묶음", "박스", "개입"];

/// Counting/container units recognized in quantity tokens.
const QTY_UNITS: &[&str] = &["개", "캔", "입", "팩", "봉", "병", "포", "매", "장", "ea", "p"];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

/// `<digits><unit>`, e.g. "30개", "12캔", "24EA".
static QTY_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+)(개|캔|입|팩|봉|병|포|매|장|ea|p)$").expect("qty regex")
});

/// "x30" / "X 30" multiplier notation, word-bounded so "x300" never matches
/// a 30-quantity token.
static X_QTY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)x\s*(\d+)\b").expect("x-qty regex"));

/// Strip markup tags from an API title. `<b>콜라</b>` → `콜라`.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// If `token` is a quantity token, return its numeric part.
fn quantity_number(token: &str) -> Option<&str> {
    QTY_TOKEN_RE
        .captures(token)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// A quantity matches when any `<number><unit>` variant appears in the
/// title, or an `x<number>` multiplier does. "30개" in the keyword accepts
/// titles saying "30캔", "30팩", "x30", "X 30", ...
fn quantity_in_title(number: &str, title: &str) -> bool {
    for unit in QTY_UNITS {
        if title.contains(&format!("{number}{unit}")) {
            return true;
        }
    }
    X_QTY_RE.captures_iter(title).any(|c| &c[1] == number)
}

/// Filter raw search results against a tracked keyword.
///
/// Every whitespace token of the keyword must be found in the title:
/// quantity tokens flexibly (see [`quantity_in_title`]), plain tokens as a
/// case-insensitive substring. An empty keyword imposes no token
/// constraints. Exclusion keywords then suppress the title — except when
/// the user explicitly searched for the word, i.e. it already appears in
/// the keyword.
///
/// Passing `None` (or an empty list) for `exclude_keywords` applies
/// [`DEFAULT_EXCLUDE_KEYWORDS`].
pub fn filter_items(
    keyword: &str,
    items: &[RawSearchItem],
    exclude_keywords: Option<&[String]>,
) -> Vec<PriceMatch> {
    let keyword_lower = keyword.to_lowercase();
    let tokens: Vec<&str> = keyword_lower.split_whitespace().collect();

    let exclude: Vec<String> = match exclude_keywords {
        Some(list) if !list.is_empty() => list.iter().map(|s| s.to_lowercase()).collect(),
        _ => DEFAULT_EXCLUDE_KEYWORDS.iter().map(|s| s.to_lowercase()).collect(),
    };

    items
        .iter()
        .filter_map(|item| {
            let clean_title = strip_tags(&item.title);
            let title_lower = clean_title.to_lowercase();

            for token in &tokens {
                let matched = match quantity_number(token) {
                    Some(number) => quantity_in_title(number, &title_lower),
                    None => title_lower.contains(token),
                };
                if !matched {
                    return None;
                }
            }

            for ex in &exclude {
                if title_lower.contains(ex.as_str()) && !keyword_lower.contains(ex.as_str()) {
                    return None;
                }
            }

            Some(PriceMatch {
                title: clean_title,
                price: item.price,
                shop_name: item.shop_name.clone(),
                product_url: item.product_url.clone(),
                raw: item.raw.clone(),
            })
        })
        .collect()
}
