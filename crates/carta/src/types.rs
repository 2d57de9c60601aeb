use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error(
    "Invalid category '{0}'. Accepted values: 'starter', 'main', 'side', 'dessert', 'drink', 'kids'"
)]
pub struct CategoryParseError(String);

/// Coarse menu category. Declaration order is the display order used when
/// sorting extracted menus: starters first, kids items last.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Starter,
    #[default]
    Main,
    Side,
    Dessert,
    Drink,
    Kids,
}

impl Category {
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Starter => "starter",
            Category::Main => "main",
            Category::Side => "side",
            Category::Dessert => "dessert",
            Category::Drink => "drink",
            Category::Kids => "kids",
        }
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Category::Starter),
            "main" => Ok(Category::Main),
            "side" => Ok(Category::Side),
            "dessert" => Ok(Category::Dessert),
            "drink" => Ok(Category::Drink),
            "kids" => Ok(Category::Kids),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A single priced menu entry. Identity for deduplication is the exact
/// `(name, price)` pair, case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    pub category: Category,
}

impl Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {:.2} [{}]", self.name, self.price, self.category)
    }
}

/// How a page was acquired before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquireMethod {
    Http,
    Browser,
}

impl Display for AcquireMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquireMethod::Http => write!(f, "http"),
            AcquireMethod::Browser => write!(f, "browser"),
        }
    }
}

/// Response contract for a fetch-and-extract run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub success: bool,
    pub items: Vec<MenuItem>,
    pub source: String,
    pub count: usize,
    pub method: AcquireMethod,
}

impl FetchResult {
    pub fn new(items: Vec<MenuItem>, source: String, method: AcquireMethod) -> Self {
        Self {
            success: true,
            count: items.len(),
            items,
            source,
            method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for slug in ["starter", "main", "side", "dessert", "drink", "kids"] {
            let category = Category::from_str(slug).expect("should parse");
            assert_eq!(category.to_string(), slug);
        }
        assert!(Category::from_str("brunch").is_err());
    }

    #[test]
    fn test_category_display_order() {
        assert!(Category::Starter < Category::Main);
        assert!(Category::Main < Category::Side);
        assert!(Category::Side < Category::Dessert);
        assert!(Category::Dessert < Category::Drink);
        assert!(Category::Drink < Category::Kids);
    }

    #[test]
    fn test_fetch_result_counts_items() {
        let items = vec![MenuItem {
            name: "Margherita".to_string(),
            price: 10.95,
            category: Category::Main,
        }];
        let result = FetchResult::new(items, "https://example.com".to_string(), AcquireMethod::Http);
        assert!(result.success);
        assert_eq!(result.count, 1);
    }
}
