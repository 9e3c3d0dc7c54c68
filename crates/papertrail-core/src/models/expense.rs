//! Expense line items and spending categories.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PapertrailError;

/// Spending category assigned to a line item.
///
/// Serialized with the upper-case label shown on receipts summaries
/// (e.g. `"FOOD & DINING"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "FOOD & DINING")]
    FoodAndDining,

    #[serde(rename = "OFFICE SUPPLIES")]
    OfficeSupplies,

    #[serde(rename = "TRAVEL & TRANSPORT")]
    TravelAndTransport,

    #[serde(rename = "ENTERTAINMENT")]
    Entertainment,

    #[serde(rename = "SHOPPING")]
    Shopping,

    #[serde(rename = "HEALTH & WELLNESS")]
    HealthAndWellness,

    #[serde(rename = "EDUCATION")]
    Education,

    #[serde(rename = "UTILITIES")]
    Utilities,

    /// Fallback when no keyword matches.
    #[serde(rename = "OTHER")]
    Other,
}

impl Category {
    /// All categories, in default keyword-table order with `Other` last.
    pub const ALL: [Category; 9] = [
        Category::FoodAndDining,
        Category::OfficeSupplies,
        Category::TravelAndTransport,
        Category::Entertainment,
        Category::Shopping,
        Category::HealthAndWellness,
        Category::Education,
        Category::Utilities,
        Category::Other,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodAndDining => "FOOD & DINING",
            Category::OfficeSupplies => "OFFICE SUPPLIES",
            Category::TravelAndTransport => "TRAVEL & TRANSPORT",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Shopping => "SHOPPING",
            Category::HealthAndWellness => "HEALTH & WELLNESS",
            Category::Education => "EDUCATION",
            Category::Utilities => "UTILITIES",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = PapertrailError;

    /// Accepts the display label or a snake-case name, case-insensitively
    /// (`"food & dining"`, `"FOOD_AND_DINING"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);

        Category::ALL
            .iter()
            .copied()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| PapertrailError::UnknownCategory(s.trim().to_string()))
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace('&', " and ")
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One purchase entry recognized on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Item description, whitespace-collapsed.
    pub name: String,

    /// Price with two fractional digits, never negative.
    pub amount: Decimal,

    /// Spending category.
    pub category: Category,

    /// Receipt date, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ExpenseItem {
    pub fn new(name: impl Into<String>, amount: Decimal, category: Category) -> Self {
        Self {
            name: name.into(),
            amount,
            category,
            date: None,
        }
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Copy of this item with a corrected category.
    pub fn recategorized(&self, category: Category) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }
}
