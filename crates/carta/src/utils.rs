use crate::types::{Category, MenuItem};

/// Per-category item counts for text output.
#[derive(Debug)]
pub struct MenuStats {
    pub starters: usize,
    pub mains: usize,
    pub sides: usize,
    pub desserts: usize,
    pub drinks: usize,
    pub kids: usize,
    pub total: usize,
}

impl MenuStats {
    pub fn from_items(items: &[MenuItem]) -> MenuStats {
        let count = |category: Category| items.iter().filter(|i| i.category == category).count();
        MenuStats {
            starters: count(Category::Starter),
            mains: count(Category::Main),
            sides: count(Category::Side),
            desserts: count(Category::Dessert),
            drinks: count(Category::Drink),
            kids: count(Category::Kids),
            total: items.len(),
        }
    }
}

impl std::fmt::Display for MenuStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Starters: {}", self.starters)?;
        writeln!(f, "  Mains:    {}", self.mains)?;
        writeln!(f, "  Sides:    {}", self.sides)?;
        writeln!(f, "  Desserts: {}", self.desserts)?;
        writeln!(f, "  Drinks:   {}", self.drinks)?;
        writeln!(f, "  Kids:     {}", self.kids)?;
        writeln!(f, "  Total:    {}", self.total)
    }
}
