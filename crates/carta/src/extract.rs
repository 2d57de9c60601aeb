use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Category, MenuItem};

/// Class hints marking an element as likely menu content.
const MENU_HINT_SELECTORS: &str =
    r#"[class*="menu"], [class*="dish"], [class*="product"], [class*="item"]"#;

/// Ordered categorization rules, first match wins. More specific groups sit
/// above broader ones so that e.g. "Kids' Soft Drink" lands in kids rather
/// than drink.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Starter, &["starter", "appetizer", "soup", "salad"]),
    (Category::Kids, &["kids", "junior", "child"]),
    (
        Category::Drink,
        &["drink", "beverage", "wine", "beer", "cocktail", "juice", "soft"],
    ),
    (
        Category::Dessert,
        &["dessert", "pudding", "cake", "ice cream", "sweet"],
    ),
    (Category::Side, &["side", "chips", "fries", "rice"]),
];

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 100;

/// Length window for the generic pass. Lines outside it are either too short
/// to be a name or are whole-page text blobs.
const GENERIC_MIN_CHARS: usize = 3;
const GENERIC_MAX_CHARS: usize = 150;

const LEADING_BULLETS: [char; 9] = ['-', '–', '—', '•', '*', '·', '●', '.', ':'];

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Currency symbols accepted in both prefix and suffix position.
    pub currencies: Vec<char>,
    /// Exclusive price bounds. Guards against phone numbers, postcodes and
    /// other unrelated quantities.
    pub min_price: f64,
    pub max_price: f64,
    pub max_items: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            currencies: vec!['£', '$'],
            min_price: 0.0,
            max_price: 200.0,
            max_items: 100,
        }
    }
}

impl ExtractOptions {
    pub fn validate(self) -> Result<Self, String> {
        if self.currencies.is_empty() {
            return Err("At least one currency symbol is required".to_string());
        }
        if self.min_price >= self.max_price {
            return Err(format!(
                "Minimum price ({}) must be below maximum price ({})",
                self.min_price, self.max_price
            ));
        }
        if self.max_items == 0 {
            return Err("Item cap must be greater than 0".to_string());
        }
        Ok(self)
    }
}

/// Extracts a deduplicated, sorted, capped menu from page HTML.
///
/// Two scanning strategies run in order; the first that yields any candidate
/// wins. A page where neither matches produces an empty menu, not an error.
pub fn extract_menu(html: &str, options: &ExtractOptions) -> Vec<MenuItem> {
    let document = Html::parse_document(html);
    let matcher = PriceMatcher::new(options);

    let strategies: [fn(&Html, &PriceMatcher) -> Vec<MenuItem>; 2] =
        [scan_menu_elements, scan_body_lines];

    let mut candidates = Vec::new();
    for strategy in strategies {
        candidates = strategy(&document, &matcher);
        if !candidates.is_empty() {
            break;
        }
    }
    log::debug!("Extracted {} raw candidate(s)", candidates.len());

    finalize(candidates, options)
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Targeted pass over elements with menu-like class names.
fn scan_menu_elements(document: &Html, matcher: &PriceMatcher) -> Vec<MenuItem> {
    let hint_selector = Selector::parse(MENU_HINT_SELECTORS).unwrap();
    document
        .select(&hint_selector)
        .filter_map(|element| matcher.candidate(elem_text(element).trim()))
        .collect()
}

/// Generic fallback over every line of body text, restricted to short spans.
fn scan_body_lines(document: &Html, matcher: &PriceMatcher) -> Vec<MenuItem> {
    let body_selector = Selector::parse("body").unwrap();
    let Some(body) = document.select(&body_selector).next() else {
        return Vec::new();
    };
    elem_text(body)
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let len = line.chars().count();
            if !(GENERIC_MIN_CHARS..=GENERIC_MAX_CHARS).contains(&len) {
                return None;
            }
            matcher.candidate(line)
        })
        .collect()
}

fn finalize(candidates: Vec<MenuItem>, options: &ExtractOptions) -> Vec<MenuItem> {
    let mut seen = HashSet::new();
    let mut items: Vec<MenuItem> = candidates
        .into_iter()
        .filter(|item| seen.insert((item.name.clone(), price_cents(item.price))))
        .collect();

    items.sort_by(|a, b| a.category.cmp(&b.category).then(a.price.total_cmp(&b.price)));
    items.truncate(options.max_items);
    items
}

/// Prices carry at most two decimals, so whole pence are an exact dedup key.
fn price_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// Compiled price patterns for one extraction run. The currency symbol set is
/// configurable, so these cannot be static.
struct PriceMatcher {
    price_re: Regex,
    strip_re: Regex,
    min_price: f64,
    max_price: f64,
}

impl PriceMatcher {
    fn new(options: &ExtractOptions) -> Self {
        let class: String = options
            .currencies
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let amount = r"\d+(?:\.\d{1,2})?";

        let price_re = Regex::new(&format!(
            r"[{class}]\s*({amount})|({amount})\s*[{class}]"
        ))
        .expect("invalid regex: price");
        let strip_re = Regex::new(&format!(
            r"[{class}]\s*{amount}|{amount}\s*[{class}]"
        ))
        .expect("invalid regex: price strip");

        Self {
            price_re,
            strip_re,
            min_price: options.min_price,
            max_price: options.max_price,
        }
    }

    /// Turns one text span into a menu item, or rejects it.
    fn candidate(&self, text: &str) -> Option<MenuItem> {
        let caps = self.price_re.captures(text)?;
        let amount = caps.get(1).or_else(|| caps.get(2))?.as_str();
        let price: f64 = amount.parse().ok()?;
        if price <= self.min_price || price >= self.max_price {
            return None;
        }

        let name = self.derive_name(text);
        if name.chars().count() < MIN_NAME_CHARS {
            return None;
        }

        Some(MenuItem {
            category: categorize(&name),
            name,
            price,
        })
    }

    /// Name = the span minus every currency amount, whitespace collapsed,
    /// leading bullets trimmed, clamped to 100 chars.
    fn derive_name(&self, text: &str) -> String {
        let stripped = self.strip_re.replace_all(text, " ");
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        let name: String = collapsed
            .trim_start_matches(LEADING_BULLETS)
            .trim()
            .chars()
            .take(MAX_NAME_CHARS)
            .collect();
        name.trim_end().to_string()
    }
}

fn categorize(name: &str) -> Category {
    let lower = name.to_lowercase();
    for (category, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *category;
        }
    }
    Category::default()
}
