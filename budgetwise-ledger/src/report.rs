//! Budget vs. spending report, grouped by category.

use budgetwise_core::{classify, Allocations, BudgetType, SavingsGoal};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::expenses::{by_category, month_bounds, Expense};

/// Percent used above which a category is flagged
pub const ALERT_THRESHOLD: f64 = 90.0;
/// Spending may run this far (as a fraction) ahead of the month and still be on pace
const PACE_SLACK: f64 = 0.05;

/// Banded budget health score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Excellent,
    Good,
    Caution,
    Warning,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthBand::Excellent
        } else if score >= 60.0 {
            HealthBand::Good
        } else if score >= 40.0 {
            HealthBand::Caution
        } else {
            HealthBand::Warning
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            HealthBand::Excellent => "Excellent! You're managing your budget very well!",
            HealthBand::Good => "Good job! Your budget is on track.",
            HealthBand::Caution => "Caution: Your spending is slightly higher than ideal.",
            HealthBand::Warning => "Warning: Your budget needs attention!",
        }
    }
}

/// Fraction of `today`'s month that has passed, counting today
pub fn month_progress(today: NaiveDate) -> f64 {
    let (first, next) = month_bounds(today);
    let days = (next - first).num_days().max(1);
    today.day() as f64 / days as f64
}

/// One category's budget next to what was spent
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUsage {
    pub category: String,
    pub allocated: f64,
    pub spent: f64,
    pub percent_used: f64,
}

impl CategoryUsage {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.allocated
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetReport {
    pub income: f64,
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    /// Share of the budget still available
    pub percent_remaining: f64,
    /// Share of the budget already spent
    pub percent_spent: f64,
    /// Sorted by percent used, highest first
    pub categories: Vec<CategoryUsage>,
    /// Spending in categories that have no budget line
    pub unbudgeted: BTreeMap<String, f64>,
}

/// Flatten allocations into category -> amount
pub fn budget_amounts(allocations: &Allocations) -> BTreeMap<String, f64> {
    allocations
        .iter()
        .map(|(label, a)| (label.clone(), a.amount))
        .collect()
}

impl BudgetReport {
    /// Compare `budget` against `expenses`. With no budget, income is the budget.
    pub fn build(income: f64, budget: &BTreeMap<String, f64>, expenses: &[Expense]) -> Self {
        let spent_by_category = by_category(expenses);
        let total_budget = if budget.is_empty() {
            income
        } else {
            budget.values().sum()
        };
        let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
        let remaining = total_budget - total_spent;

        let pct_of_budget = |v: f64| if total_budget > 0.0 { v / total_budget * 100.0 } else { 0.0 };

        let mut categories: Vec<CategoryUsage> = budget
            .iter()
            .map(|(category, &allocated)| {
                let spent = spent_by_category.get(category).copied().unwrap_or(0.0);
                CategoryUsage {
                    category: category.clone(),
                    allocated,
                    spent,
                    percent_used: if allocated > 0.0 { spent / allocated * 100.0 } else { 0.0 },
                }
            })
            .collect();
        categories.sort_by(|a, b| b.percent_used.total_cmp(&a.percent_used));

        let unbudgeted = spent_by_category
            .into_iter()
            .filter(|(category, _)| !budget.contains_key(category))
            .collect();

        Self {
            income,
            total_budget,
            total_spent,
            remaining,
            percent_remaining: pct_of_budget(remaining),
            percent_spent: pct_of_budget(total_spent),
            categories,
            unbudgeted,
        }
    }

    /// Categories above the alert threshold
    pub fn alerts(&self) -> Vec<&CategoryUsage> {
        self.categories
            .iter()
            .filter(|c| c.percent_used > ALERT_THRESHOLD)
            .collect()
    }

    /// Fraction of the budget spent
    fn used_fraction(&self) -> f64 {
        if self.total_budget > 0.0 {
            self.total_spent / self.total_budget
        } else {
            0.0
        }
    }

    /// 100 when spending keeps pace with the month; every point spent ahead
    /// of the calendar costs two.
    pub fn health_score(&self, today: NaiveDate) -> f64 {
        let ahead = (self.used_fraction() - month_progress(today)) * 100.0 * 2.0;
        100.0 - ahead.clamp(0.0, 100.0)
    }

    pub fn health_band(&self, today: NaiveDate) -> HealthBand {
        HealthBand::from_score(self.health_score(today))
    }

    /// Spending is no more than 5 points ahead of the month
    pub fn on_pace(&self, today: NaiveDate) -> bool {
        self.used_fraction() <= month_progress(today) + PACE_SLACK
    }

    /// Would spending `amount` more push `category` over its budget?
    pub fn would_exceed(&self, category: &str, amount: f64) -> bool {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .is_some_and(|c| c.spent + amount > c.allocated)
    }
}

/// Count an expense towards the savings goal when it was booked to a
/// Savings-typed category. Returns true when the goal changed.
pub fn record_savings_contribution(goal: &mut SavingsGoal, expense: &Expense) -> bool {
    if classify(&expense.category) != BudgetType::SavingsInvestments {
        return false;
    }
    goal.contribute(expense.amount);
    tracing::info!(
        item = %goal.item,
        added = expense.amount,
        total = goal.current_savings,
        "savings goal progress updated"
    );
    true
}
