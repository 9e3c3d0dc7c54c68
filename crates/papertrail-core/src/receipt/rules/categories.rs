//! Keyword-table categorization of item names.
//!
//! Matching is plain lowercase substring containment. Categories are checked in table
//! order and the first hit wins, so overlapping keywords ("gas" is both travel and
//! utilities) always resolve to the earlier category.

use tracing::trace;

use crate::models::config::CategoryConfig;
use crate::models::expense::Category;

/// Default keyword table, in tie-break order.
pub const DEFAULT_CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::FoodAndDining,
        &[
            "coffee", "restaurant", "cafe", "food", "meal", "lunch", "dinner", "breakfast",
            "pizza", "burger", "sandwich", "salad", "sushi", "chinese", "italian", "mexican",
            "bakery", "dessert", "ice cream", "drink", "beverage", "tea", "juice", "soda",
        ],
    ),
    (
        Category::OfficeSupplies,
        &[
            "office", "supplies", "stationery", "paper", "ink", "printer", "pen", "pencil",
            "notebook", "folder", "binder", "stapler", "tape", "scissors", "marker",
            "highlighter", "envelope", "stamp", "postage", "shipping", "mail",
        ],
    ),
    (
        Category::TravelAndTransport,
        &[
            "gas", "fuel", "transport", "taxi", "uber", "lyft", "bus", "train", "subway",
            "metro", "airport", "flight", "hotel", "lodging", "parking", "toll", "rental",
            "car", "bike", "scooter",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie", "cinema", "concert", "show", "ticket", "theater", "museum", "gallery",
            "park", "zoo", "aquarium", "amusement", "game", "sports", "gym", "fitness",
            "yoga", "pool", "golf", "tennis",
        ],
    ),
    (
        Category::Shopping,
        &[
            "store", "shop", "market", "mall", "retail", "clothing", "shoes", "accessories",
            "electronics", "phone", "computer", "laptop", "tablet", "camera", "appliance",
            "furniture", "decor", "garden", "hardware",
        ],
    ),
    (
        Category::HealthAndWellness,
        &[
            "pharmacy", "drug", "medicine", "vitamin", "supplement", "doctor", "dentist",
            "clinic", "hospital", "medical", "health", "wellness", "spa", "massage", "salon",
            "barber", "hair", "nails", "beauty",
        ],
    ),
    (
        Category::Education,
        &[
            "school", "university", "college", "course", "class", "book", "textbook",
            "library", "tuition", "fee", "education", "learning", "training", "workshop",
            "seminar", "conference",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electric", "gas", "water", "internet", "phone", "cable", "tv", "streaming",
            "subscription", "utility", "bill", "payment", "service", "maintenance",
        ],
    ),
];

/// Ordered category keyword table.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl CategoryTable {
    /// Table with the default keywords.
    pub fn new() -> Self {
        Self::from_config(&CategoryConfig::default())
    }

    /// Table from configuration; keywords are lowercased and blanks dropped.
    pub fn from_config(config: &CategoryConfig) -> Self {
        let entries = config
            .table
            .iter()
            .map(|entry| {
                let keywords = entry
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (entry.category, keywords)
            })
            .collect();

        Self { entries }
    }

    /// Category for an item name, `Other` when no keyword matches.
    pub fn categorize(&self, name: &str) -> Category {
        self.matching_keyword(name)
            .map(|(category, _)| category)
            .unwrap_or(Category::Other)
    }

    /// First matching category and the keyword that matched.
    pub fn matching_keyword(&self, name: &str) -> Option<(Category, &str)> {
        let lower = name.to_lowercase();

        for (category, keywords) in &self.entries {
            if let Some(keyword) = keywords.iter().find(|k| lower.contains(k.as_str())) {
                trace!("{:?} matched keyword {:?} -> {}", name, keyword, category);
                return Some((*category, keyword.as_str()));
            }
        }

        None
    }

    /// Categories in table order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(category, _)| *category)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}
