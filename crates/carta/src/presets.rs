use serde::{Deserialize, Serialize};

use crate::types::{Category, MenuItem};

/// A hard-coded fallback menu for a known restaurant, served when live
/// extraction is not wanted. Unrelated to the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMenu {
    pub restaurant: String,
    pub items: Vec<MenuItem>,
}

fn item(name: &str, price: f64, category: Category) -> MenuItem {
    MenuItem {
        name: name.to_string(),
        price,
        category,
    }
}

pub fn preset_menus() -> Vec<PresetMenu> {
    vec![
        PresetMenu {
            restaurant: "Bella Italia".to_string(),
            items: vec![
                item("Bruschetta", 5.95, Category::Starter),
                item("Margherita", 10.95, Category::Main),
                item("Spaghetti Carbonara", 12.50, Category::Main),
                item("Garlic Bread", 4.50, Category::Side),
                item("Tiramisu", 6.25, Category::Dessert),
                item("House Red Wine (175ml)", 5.50, Category::Drink),
                item("Kids Penne Pomodoro", 5.95, Category::Kids),
            ],
        },
        PresetMenu {
            restaurant: "The Golden Fork".to_string(),
            items: vec![
                item("Soup of the Day", 5.50, Category::Starter),
                item("Beer Battered Fish and Chips", 13.95, Category::Main),
                item("Ribeye Steak", 24.00, Category::Main),
                item("Skinny Fries", 3.50, Category::Side),
                item("Sticky Toffee Pudding", 6.50, Category::Dessert),
                item("Fresh Orange Juice", 3.25, Category::Drink),
                item("Kids Sausage and Mash", 6.00, Category::Kids),
            ],
        },
        PresetMenu {
            restaurant: "Golden Dragon".to_string(),
            items: vec![
                item("Crispy Spring Rolls", 4.80, Category::Starter),
                item("Sweet and Sour Chicken", 9.80, Category::Main),
                item("Beef in Black Bean Sauce", 10.20, Category::Main),
                item("Egg Fried Rice", 3.80, Category::Side),
                item("Banana Fritters", 4.50, Category::Dessert),
                item("Jasmine Tea", 2.50, Category::Drink),
            ],
        },
    ]
}
