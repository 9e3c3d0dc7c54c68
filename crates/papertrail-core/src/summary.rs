//! Expense aggregation for breakdown views.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::expense::{Category, ExpenseItem};

/// Sum of the items in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Decimal,
    pub item_count: usize,
}

/// Total spending and its per-category breakdown.
///
/// Categories appear in the order they were first seen among the items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total: Decimal,
    pub by_category: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    pub fn get(&self, category: Category) -> Option<&CategoryTotal> {
        self.by_category.iter().find(|c| c.category == category)
    }

    /// Fraction of the total spent in `category`, `None` when nothing was spent.
    pub fn share(&self, category: Category) -> Option<f64> {
        if self.total.is_zero() {
            return None;
        }
        let amount = self.get(category).map(|c| c.amount).unwrap_or_default();
        (amount / self.total).to_f64()
    }

    /// Fold more items into this summary.
    ///
    /// An item that would overflow the running total is left out.
    pub fn add_items(&mut self, items: &[ExpenseItem]) {
        for item in items {
            let Some(total) = self.total.checked_add(item.amount) else {
                warn!("Skipping {:?}: total overflow adding {}", item.name, item.amount);
                continue;
            };

            match self.by_category.iter_mut().find(|c| c.category == item.category) {
                Some(entry) => {
                    let Some(amount) = entry.amount.checked_add(item.amount) else {
                        warn!("Skipping {:?}: {} total overflow", item.name, item.category);
                        continue;
                    };
                    entry.amount = amount;
                    entry.item_count += 1;
                }
                None => self.by_category.push(CategoryTotal {
                    category: item.category,
                    amount: item.amount,
                    item_count: 1,
                }),
            }
            self.total = total;
        }
    }
}

/// Total and stable first-seen grouping by category.
pub fn aggregate(items: &[ExpenseItem]) -> ExpenseSummary {
    let mut summary = ExpenseSummary::default();
    summary.add_items(items);
    summary
}
