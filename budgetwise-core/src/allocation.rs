//! Heuristic allocation engine.
//!
//! Each budget type gets a weight from a profile-selected table, the table is
//! normalized to sum to 1, and a type's share is split evenly across the user
//! categories classified into it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::money::{round1, round2};
use crate::profile::{FinancialGoal, Profile};
use crate::taxonomy::{BudgetType, Category};

/// Allocation for a single category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    /// Share of income, 1 decimal place
    pub percentage: f64,
    /// Currency amount, 2 decimal places
    pub amount: f64,
}

impl Allocation {
    pub fn new(percentage: f64, amount: f64) -> Self {
        Self { percentage, amount }
    }
}

/// Category label -> allocation
pub type Allocations = BTreeMap<String, Allocation>;

/// Per-type weights; raw values are not guaranteed to sum to 1
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TypeWeights {
    pub essentials: f64,
    pub lifestyle: f64,
    pub savings: f64,
    pub debt: f64,
    pub other: f64,
}

impl TypeWeights {
    /// Pick the weight table for a profile. Debt outranks the financial goal.
    pub fn for_profile(profile: &Profile) -> Self {
        let savings = profile.saving_preference / 100.0;

        let (essentials, lifestyle, debt) = if profile.has_debt {
            (0.45, 0.15, 0.25)
        } else {
            match profile.financial_goal {
                FinancialGoal::EmergencyFund | FinancialGoal::MajorPurchase => (0.45, 0.20, 0.05),
                FinancialGoal::LongTermWealth => (0.40, 0.15, 0.05),
                _ => (0.40, 0.30, 0.05),
            }
        };

        Self {
            essentials,
            lifestyle,
            savings,
            debt,
            other: 0.05,
        }
    }

    pub fn total(&self) -> f64 {
        self.essentials + self.lifestyle + self.savings + self.debt + self.other
    }

    /// Scale every weight so the table sums to 1
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return *self;
        }
        Self {
            essentials: self.essentials / total,
            lifestyle: self.lifestyle / total,
            savings: self.savings / total,
            debt: self.debt / total,
            other: self.other / total,
        }
    }

    pub fn weight(&self, budget_type: BudgetType) -> f64 {
        match budget_type {
            BudgetType::Essentials => self.essentials,
            BudgetType::Lifestyle => self.lifestyle,
            BudgetType::SavingsInvestments => self.savings,
            BudgetType::DebtEmis => self.debt,
            BudgetType::OtherSubscriptions => self.other,
        }
    }
}

/// Output of [`allocate`]
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult {
    pub allocations: Allocations,
    /// Normalized weights the split was computed from
    pub weights: TypeWeights,
}

fn count_by_type(categories: &[Category]) -> HashMap<BudgetType, usize> {
    let mut counts: HashMap<BudgetType, usize> = HashMap::new();
    for c in categories {
        *counts.entry(c.budget_type).or_insert(0) += 1;
    }
    counts
}

/// Split `income` across `categories` using the profile's weight table.
///
/// A type with no categories leaves its share unallocated.
pub fn allocate(income: f64, categories: &[Category], profile: &Profile) -> AllocationResult {
    let weights = TypeWeights::for_profile(profile).normalized();
    let counts = count_by_type(categories);

    let mut allocations = Allocations::new();
    for c in categories {
        let n = counts.get(&c.budget_type).copied().unwrap_or(1).max(1);
        let weight = weights.weight(c.budget_type) / n as f64;
        allocations.insert(
            c.label.clone(),
            Allocation::new(round1(weight * 100.0), round2(income * weight)),
        );
    }

    AllocationResult {
        allocations,
        weights,
    }
}

/// Quick-setup split: needs 50%, wants 30%, savings 15%, debt 5%.
///
/// Other-typed categories share whatever income is left.
pub fn rule_of_thumb(income: f64, categories: &[Category]) -> Allocations {
    let counts = count_by_type(categories);
    let mut amounts: BTreeMap<String, f64> = BTreeMap::new();

    for c in categories {
        let share = match c.budget_type {
            BudgetType::Essentials => 0.50,
            BudgetType::Lifestyle => 0.30,
            BudgetType::SavingsInvestments => 0.15,
            BudgetType::DebtEmis => 0.05,
            BudgetType::OtherSubscriptions => continue,
        };
        let n = counts.get(&c.budget_type).copied().unwrap_or(1).max(1);
        amounts.insert(c.label.clone(), income * share / n as f64);
    }

    let others = counts.get(&BudgetType::OtherSubscriptions).copied().unwrap_or(0);
    if others > 0 {
        let remaining = (income - amounts.values().sum::<f64>()).max(0.0);
        for c in categories.iter().filter(|c| c.budget_type == BudgetType::OtherSubscriptions) {
            amounts.insert(c.label.clone(), remaining / others as f64);
        }
    }

    amounts
        .into_iter()
        .map(|(label, amount)| {
            let pct = if income > 0.0 { amount / income * 100.0 } else { 0.0 };
            (label, Allocation::new(round1(pct), round2(amount)))
        })
        .collect()
}

/// Sum of all allocation percentages
pub fn total_percentage(allocations: &Allocations) -> f64 {
    allocations.values().map(|a| a.percentage).sum()
}

/// How the allocated total compares to income
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationBalance {
    Complete,
    Unallocated(f64),
    OverAllocated(f64),
}

/// A category allocation that looks out of line for its type
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationWarning {
    pub category: String,
    pub percentage: f64,
    pub message: String,
}

/// Sanity review of a (usually hand-edited) allocation
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReview {
    pub total_allocated: f64,
    pub balance: AllocationBalance,
    pub warnings: Vec<AllocationWarning>,
}

/// Check totals against income and flag categories outside typical ranges
pub fn review(income: f64, allocations: &Allocations) -> AllocationReview {
    let total_allocated: f64 = allocations.values().map(|a| a.amount).sum();
    let remaining = income - total_allocated;
    let balance = if remaining.abs() < 0.01 {
        AllocationBalance::Complete
    } else if remaining > 0.0 {
        AllocationBalance::Unallocated(round2(remaining))
    } else {
        AllocationBalance::OverAllocated(round2(-remaining))
    };

    let mut warnings = Vec::new();
    for (label, a) in allocations {
        let pct = a.percentage;
        let message = match label.as_str() {
            "Entertainment" | "Shopping" | "Travel" | "Lifestyle" if pct > 30.0 => Some(format!(
                "Your allocation for {label} seems high at {pct:.1}%. Consider reducing it."
            )),
            "Essentials" | "Food & Dining" if pct < 20.0 => Some(format!(
                "Your allocation for {label} seems low at {pct:.1}%. Make sure it's sufficient."
            )),
            "Savings & Investments" | "Investments" if pct < 10.0 => Some(
                "Consider allocating at least 10% to savings/investments for financial security."
                    .to_string(),
            ),
            _ => None,
        };
        if let Some(message) = message {
            warnings.push(AllocationWarning {
                category: label.clone(),
                percentage: pct,
                message,
            });
        }
    }

    AllocationReview {
        total_allocated: round2(total_allocated),
        balance,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{categories_from_labels, default_categories};

    fn profile(goal: FinancialGoal, has_debt: bool, pref: f64) -> Profile {
        Profile::new(50000.0, default_categories(), pref, has_debt, goal, "early career")
    }

    #[test]
    fn test_debt_table_wins_over_goal() {
        let w = TypeWeights::for_profile(&profile(FinancialGoal::LongTermWealth, true, 20.0));
        assert_eq!(w.essentials, 0.45);
        assert_eq!(w.debt, 0.25);
        assert_eq!(w.savings, 0.2);
    }

    #[test]
    fn test_goal_tables() {
        let w = TypeWeights::for_profile(&profile(FinancialGoal::MajorPurchase, false, 10.0));
        assert_eq!((w.essentials, w.lifestyle, w.debt), (0.45, 0.20, 0.05));

        let w = TypeWeights::for_profile(&profile(FinancialGoal::EnjoyLifeNow, false, 10.0));
        assert_eq!((w.essentials, w.lifestyle, w.debt), (0.40, 0.30, 0.05));
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let w = TypeWeights::for_profile(&profile(FinancialGoal::Balance, false, 35.0)).normalized();
        assert!((w.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_type_share_split_evenly() {
        let cats = categories_from_labels(&["Food & Dining", "Health", "Travel"]);
        let p = Profile::new(10000.0, cats.clone(), 20.0, false, FinancialGoal::Balance, "");
        let result = allocate(p.income, &cats, &p);

        let food = result.allocations["Food & Dining"];
        let health = result.allocations["Health"];
        assert_eq!(food, health);
        // balanced table already sums to 1: Essentials 0.40 split two ways
        assert_eq!(food.amount, 2000.0);
        assert_eq!(food.percentage, 20.0);
    }

    #[test]
    fn test_empty_type_share_is_dropped() {
        let cats = categories_from_labels(&["Essentials", "Lifestyle"]);
        let p = Profile::new(1000.0, cats.clone(), 20.0, false, FinancialGoal::Balance, "");
        let result = allocate(p.income, &cats, &p);
        let total = total_percentage(&result.allocations);
        // 0.70 of a 1.00 table lands on categories, the rest is not redistributed
        assert!((total - 70.0).abs() < 0.11, "total {total}");
    }

    #[test]
    fn test_unknown_category_gets_other_share() {
        let cats = categories_from_labels(&["Pet Care", "Essentials"]);
        let p = Profile::new(1000.0, cats.clone(), 20.0, false, FinancialGoal::Balance, "");
        let result = allocate(p.income, &cats, &p);
        assert_eq!(result.allocations["Pet Care"].amount, 50.0);
    }

    #[test]
    fn test_zero_income_yields_zero_amounts() {
        let p = Profile::new(0.0, default_categories(), 20.0, false, FinancialGoal::Balance, "");
        let result = allocate(0.0, &p.categories, &p);
        assert!(result.allocations.values().all(|a| a.amount == 0.0));
        assert!((total_percentage(&result.allocations) - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_rule_of_thumb() {
        let cats = categories_from_labels(&["Food & Dining", "Transportation", "Travel", "Education"]);
        let a = rule_of_thumb(10000.0, &cats);
        assert_eq!(a["Food & Dining"].amount, 2500.0);
        assert_eq!(a["Travel"].amount, 3000.0);
        // Other takes the remainder: 10000 - 5000 - 3000
        assert_eq!(a["Education"].amount, 2000.0);
        assert_eq!(a["Education"].percentage, 20.0);
    }

    #[test]
    fn test_review_flags_outliers() {
        let mut a = Allocations::new();
        a.insert("Travel".into(), Allocation::new(40.0, 400.0));
        a.insert("Essentials".into(), Allocation::new(15.0, 150.0));
        a.insert("Investments".into(), Allocation::new(5.0, 50.0));
        let r = review(1000.0, &a);
        assert_eq!(r.warnings.len(), 3);
        assert_eq!(r.balance, AllocationBalance::Unallocated(400.0));

        a.insert("Health".into(), Allocation::new(50.0, 500.0));
        assert_eq!(review(1000.0, &a).balance, AllocationBalance::OverAllocated(100.0));
    }
}
