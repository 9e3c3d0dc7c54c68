//! Budgets: per-category limits and the rolling daily/weekly/monthly spending state.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PapertrailError, Result};
use crate::models::expense::Category;
use crate::models::totals::ReceiptTotals;
use crate::summary::ExpenseSummary;

/// Length of a budget cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// Whether `a` and `b` fall into the same cycle of this period.
    ///
    /// Weeks are ISO weeks.
    pub fn same_cycle(&self, a: NaiveDate, b: NaiveDate) -> bool {
        match self {
            BudgetPeriod::Daily => a == b,
            BudgetPeriod::Weekly => a.iso_week() == b.iso_week(),
            BudgetPeriod::Monthly => a.year() == b.year() && a.month() == b.month(),
            BudgetPeriod::Yearly => a.year() == b.year(),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for BudgetPeriod {
    type Err = PapertrailError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(BudgetPeriod::Daily),
            "weekly" | "week" => Ok(BudgetPeriod::Weekly),
            "monthly" | "month" => Ok(BudgetPeriod::Monthly),
            "yearly" | "year" | "annual" => Ok(BudgetPeriod::Yearly),
            _ => Err(PapertrailError::UnknownPeriod(s.trim().to_string())),
        }
    }
}

/// A spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,

    /// Limit for one period.
    pub amount: Decimal,

    pub period: BudgetPeriod,

    pub start_date: NaiveDate,

    /// Amount spent so far.
    #[serde(default)]
    pub spent: Decimal,
}

impl Budget {
    pub fn new(category: Category, amount: Decimal, period: BudgetPeriod, start_date: NaiveDate) -> Self {
        Self {
            category,
            amount,
            period,
            start_date,
            spent: Decimal::ZERO,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.amount - self.spent
    }

    /// Fraction of the limit spent, `None` for a zero limit.
    pub fn progress(&self) -> Option<f64> {
        if self.amount.is_zero() {
            return None;
        }
        (self.spent / self.amount).to_f64()
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }

    pub fn record_spending(&mut self, amount: Decimal) {
        self.spent = self.spent.saturating_add(amount);
    }
}

/// Add each category's sum from `summary` to the budgets tracking that category.
pub fn apply_summary(budgets: &mut [Budget], summary: &ExpenseSummary) {
    for budget in budgets.iter_mut() {
        if let Some(entry) = summary.get(budget.category) {
            budget.record_spending(entry.amount);
            debug!(
                "Budget {} ({}) now at {} of {}",
                budget.category, budget.period, budget.spent, budget.amount
            );
        }
    }
}

/// Limit and spending for one rolling period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBudget {
    pub limit: Decimal,
    pub spent: Decimal,
}

impl PeriodBudget {
    pub fn remaining(&self) -> Decimal {
        self.limit - self.spent
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }
}

/// Overall daily/weekly/monthly spending, fed by validated receipts.
///
/// Counters roll over to zero when a receipt is recorded in a new day, ISO week or
/// month relative to the last update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetState {
    pub daily: PeriodBudget,
    pub weekly: PeriodBudget,
    pub monthly: PeriodBudget,

    /// Day of the last recorded receipt.
    pub last_updated: Option<NaiveDate>,
}

impl BudgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_limits(&mut self, daily: Decimal, weekly: Decimal, monthly: Decimal) {
        self.daily.limit = daily;
        self.weekly.limit = weekly;
        self.monthly.limit = monthly;
    }

    /// Period entry for `period`; yearly limits are not tracked here.
    pub fn period(&self, period: BudgetPeriod) -> Option<&PeriodBudget> {
        match period {
            BudgetPeriod::Daily => Some(&self.daily),
            BudgetPeriod::Weekly => Some(&self.weekly),
            BudgetPeriod::Monthly => Some(&self.monthly),
            BudgetPeriod::Yearly => None,
        }
    }

    /// Reset counters whose cycle ended between the last update and `today`.
    ///
    /// A `today` before the last update leaves every counter alone.
    pub fn roll_over(&mut self, today: NaiveDate) {
        let Some(last) = self.last_updated else {
            return;
        };
        if today < last {
            return;
        }

        if !BudgetPeriod::Daily.same_cycle(last, today) {
            self.daily.spent = Decimal::ZERO;
        }
        if !BudgetPeriod::Weekly.same_cycle(last, today) {
            self.weekly.spent = Decimal::ZERO;
        }
        if !BudgetPeriod::Monthly.same_cycle(last, today) {
            self.monthly.spent = Decimal::ZERO;
        }
    }

    /// Add a receipt's total to every period.
    ///
    /// Receipts whose totals did not reconcile are ignored; returns whether the
    /// receipt was recorded. A receipt dated before the last update only counts toward
    /// the periods still open on that day, and `last_updated` does not move back.
    pub fn record_receipt(&mut self, totals: &ReceiptTotals, today: NaiveDate) -> bool {
        if !totals.is_matched {
            debug!("Skipping unreconciled receipt: {}", totals.message);
            return false;
        }

        match self.last_updated {
            Some(last) if today < last => {
                for (period, counter) in [
                    (BudgetPeriod::Daily, &mut self.daily),
                    (BudgetPeriod::Weekly, &mut self.weekly),
                    (BudgetPeriod::Monthly, &mut self.monthly),
                ] {
                    if period.same_cycle(last, today) {
                        counter.spent = counter.spent.saturating_add(totals.total);
                    }
                }
                info!("Recorded back-dated receipt total {} on {}", totals.total, today);
            }
            _ => {
                self.roll_over(today);
                for counter in [&mut self.daily, &mut self.weekly, &mut self.monthly] {
                    counter.spent = counter.spent.saturating_add(totals.total);
                }
                self.last_updated = Some(today);
                info!("Recorded receipt total {} on {}", totals.total, today);
            }
        }

        true
    }

    /// Load state from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save state to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::ExpenseItem;
    use crate::summary::aggregate;
    use pretty_assertions::assert_eq;

    fn d(units: i64) -> Decimal {
        Decimal::new(units, 2)
    }

    fn date(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn matched(total: i64) -> ReceiptTotals {
        ReceiptTotals::reconcile(d(total), Decimal::ZERO, d(total), d(1))
    }

    #[test]
    fn test_budget_derived_fields() {
        let mut budget = Budget::new(Category::FoodAndDining, d(10000), BudgetPeriod::Monthly, date(2024, 1, 1));
        budget.record_spending(d(2500));

        assert_eq!(budget.remaining(), d(7500));
        assert_eq!(budget.progress(), Some(0.25));
        assert!(!budget.is_over_budget());

        budget.record_spending(d(8000));
        assert!(budget.is_over_budget());
        assert_eq!(budget.remaining(), d(-500));
    }

    #[test]
    fn test_zero_limit_has_no_progress() {
        let budget = Budget::new(Category::Other, Decimal::ZERO, BudgetPeriod::Daily, date(2024, 1, 1));
        assert_eq!(budget.progress(), None);
        assert!(!budget.is_over_budget());
    }

    #[test]
    fn test_apply_summary_matches_categories() {
        let items = vec![
            ExpenseItem::new("Coffee", d(350), Category::FoodAndDining),
            ExpenseItem::new("Pen", d(200), Category::OfficeSupplies),
            ExpenseItem::new("Bagel", d(250), Category::FoodAndDining),
        ];
        let summary = aggregate(&items);

        let mut budgets = vec![
            Budget::new(Category::FoodAndDining, d(5000), BudgetPeriod::Weekly, date(2024, 1, 1)),
            Budget::new(Category::Shopping, d(5000), BudgetPeriod::Weekly, date(2024, 1, 1)),
        ];
        apply_summary(&mut budgets, &summary);

        assert_eq!(budgets[0].spent, d(600));
        assert_eq!(budgets[1].spent, Decimal::ZERO);
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Monthly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert_eq!("week".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert!("fortnightly".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn test_record_receipt_accumulates_within_a_day() {
        let mut state = BudgetState::new();
        state.set_limits(d(5000), d(20000), d(80000));

        assert!(state.record_receipt(&matched(1100), date(2024, 5, 15)));
        assert!(state.record_receipt(&matched(900), date(2024, 5, 15)));

        assert_eq!(state.daily.spent, d(2000));
        assert_eq!(state.weekly.spent, d(2000));
        assert_eq!(state.monthly.spent, d(2000));
        assert_eq!(state.daily.remaining(), d(3000));
        assert_eq!(state.last_updated, Some(date(2024, 5, 15)));
    }

    #[test]
    fn test_unmatched_receipt_is_ignored() {
        let mut state = BudgetState::new();
        let verdict = ReceiptTotals::reconcile(d(1000), d(100), d(1200), d(1));

        assert!(!state.record_receipt(&verdict, date(2024, 5, 15)));
        assert_eq!(state, BudgetState::new());
    }

    #[test]
    fn test_roll_over_resets_finished_cycles() {
        let mut state = BudgetState::new();
        // Wednesday
        state.record_receipt(&matched(1000), date(2024, 5, 15));

        // Next day, same ISO week and month.
        state.record_receipt(&matched(500), date(2024, 5, 16));
        assert_eq!(state.daily.spent, d(500));
        assert_eq!(state.weekly.spent, d(1500));
        assert_eq!(state.monthly.spent, d(1500));

        // Following Monday: new week, same month.
        state.record_receipt(&matched(200), date(2024, 5, 20));
        assert_eq!(state.daily.spent, d(200));
        assert_eq!(state.weekly.spent, d(200));
        assert_eq!(state.monthly.spent, d(1700));

        // New month.
        state.record_receipt(&matched(300), date(2024, 6, 3));
        assert_eq!(state.monthly.spent, d(300));
    }

    #[test]
    fn test_back_dated_receipt_keeps_latest_day() {
        let mut state = BudgetState::new();
        state.record_receipt(&matched(1000), date(2024, 5, 16));

        // Day before, same ISO week and month.
        assert!(state.record_receipt(&matched(200), date(2024, 5, 15)));
        assert_eq!(state.daily.spent, d(1000));
        assert_eq!(state.weekly.spent, d(1200));
        assert_eq!(state.monthly.spent, d(1200));
        assert_eq!(state.last_updated, Some(date(2024, 5, 16)));

        state.record_receipt(&matched(300), date(2024, 5, 16));
        assert_eq!(state.daily.spent, d(1300));
        assert_eq!(state.weekly.spent, d(1500));
        assert_eq!(state.monthly.spent, d(1500));

        // Previous month counts toward nothing still open.
        assert!(state.record_receipt(&matched(5000), date(2024, 4, 30)));
        assert_eq!(state.monthly.spent, d(1500));
        assert_eq!(state.last_updated, Some(date(2024, 5, 16)));
    }

    #[test]
    fn test_roll_over_ignores_earlier_day() {
        let mut state = BudgetState::new();
        state.record_receipt(&matched(1000), date(2024, 5, 16));
        state.roll_over(date(2024, 5, 1));
        assert_eq!(state.daily.spent, d(1000));
    }

    #[test]
    fn test_period_lookup() {
        let mut state = BudgetState::new();
        state.set_limits(d(1000), d(5000), d(20000));

        assert_eq!(state.period(BudgetPeriod::Weekly).map(|p| p.limit), Some(d(5000)));
        assert_eq!(state.period(BudgetPeriod::Yearly), None);
    }

    #[test]
    fn test_state_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.json");

        let mut state = BudgetState::new();
        state.set_limits(d(1000), d(5000), d(20000));
        state.record_receipt(&matched(450), date(2024, 2, 29));
        state.save(&path).unwrap();

        assert_eq!(BudgetState::from_file(&path).unwrap(), state);
    }
}
