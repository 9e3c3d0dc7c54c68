//! Configuration structures for the receipt pipeline.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PapertrailError, Result};
use crate::models::budget::BudgetPeriod;
use crate::models::expense::Category;
use crate::receipt::rules::categories::DEFAULT_CATEGORY_KEYWORDS;
use crate::receipt::rules::patterns::{
    DEFAULT_DATE_FORMATS, SUBTOTAL_KEYWORDS, TAX_KEYWORDS, TOTAL_KEYWORDS,
};

/// Main configuration for the papertrail pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PapertrailConfig {
    /// Transcript parsing configuration.
    pub parsing: ParsingConfig,

    /// Totals validation configuration.
    pub validation: ValidationConfig,

    /// Category keyword table.
    pub categories: CategoryConfig,

    /// Per-category budget limits.
    pub budget: BudgetConfig,
}

/// Transcript parsing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Date formats (chrono syntax), tried in order on every line.
    pub date_formats: Vec<String>,

    /// Leave subtotal/tax/total lines out of the item list.
    pub exclude_summary_lines: bool,

    /// Leave out lines that hold a price but no item name.
    pub skip_unnamed_items: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            date_formats: to_strings(DEFAULT_DATE_FORMATS),
            exclude_summary_lines: false,
            skip_unnamed_items: false,
        }
    }
}

/// Totals validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Keywords marking the subtotal line (matched case-insensitively).
    pub subtotal_keywords: Vec<String>,

    /// Keywords marking the tax line.
    pub tax_keywords: Vec<String>,

    /// Keywords marking the grand total line.
    pub total_keywords: Vec<String>,

    /// Maximum (exclusive) gap between subtotal + tax and total.
    pub tolerance: Decimal,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            subtotal_keywords: to_strings(SUBTOTAL_KEYWORDS),
            tax_keywords: to_strings(TAX_KEYWORDS),
            total_keywords: to_strings(TOTAL_KEYWORDS),
            tolerance: Decimal::new(1, 2),
        }
    }
}

/// Keywords for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Ordered category keyword table. Earlier entries win ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub table: Vec<CategoryKeywords>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_CATEGORY_KEYWORDS
                .iter()
                .map(|(category, keywords)| CategoryKeywords {
                    category: *category,
                    keywords: to_strings(keywords),
                })
                .collect(),
        }
    }
}

/// Spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLimit {
    pub category: Category,
    pub amount: Decimal,
    pub period: BudgetPeriod,
}

/// Budget configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub limits: Vec<CategoryLimit>,
}

impl PapertrailConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the configuration can drive the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.parsing.date_formats.iter().all(|f| f.trim().is_empty()) {
            return Err(PapertrailError::Config(
                "parsing.date_formats must contain at least one format".to_string(),
            ));
        }

        let keyword_lists = [
            ("validation.subtotal_keywords", &self.validation.subtotal_keywords),
            ("validation.tax_keywords", &self.validation.tax_keywords),
            ("validation.total_keywords", &self.validation.total_keywords),
        ];
        for (name, keywords) in keyword_lists {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(PapertrailError::Config(format!(
                    "{} must contain at least one keyword",
                    name
                )));
            }
        }

        if self.validation.tolerance <= Decimal::ZERO {
            return Err(PapertrailError::Config(format!(
                "validation.tolerance must be positive, got {}",
                self.validation.tolerance
            )));
        }

        if let Some(limit) = self.budget.limits.iter().find(|l| l.amount < Decimal::ZERO) {
            return Err(PapertrailError::Config(format!(
                "budget limit for {} is negative",
                limit.category
            )));
        }

        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
