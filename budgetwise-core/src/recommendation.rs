//! The canonical budget recommendation and its heuristic producer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::allocation::{allocate, Allocations};
use crate::profile::{FinancialGoal, Profile, PurchaseGoal};
use crate::savings::{plan_savings, reallocate_for_savings, SavingsPlan};
use crate::taxonomy;

/// The one shape callers see, whichever path produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetRecommendation {
    pub allocations: Allocations,
    pub explanations: BTreeMap<String, String>,
    pub tips: BTreeMap<String, Vec<String>>,
    pub savings_plan: Option<SavingsPlan>,
    pub summary: String,
}

/// Build a recommendation from the fixed weight tables alone
pub fn heuristic(
    profile: &Profile,
    purchase: Option<&PurchaseGoal>,
    today: NaiveDate,
) -> BudgetRecommendation {
    let income = profile.income;
    let mut allocations = allocate(income, &profile.categories, profile).allocations;

    let purchase = purchase.filter(|p| p.is_declared());
    let savings_plan = purchase.map(|p| {
        let plan = plan_savings(income, &p.item, p.cost, p.deadline, today);
        reallocate_for_savings(&mut allocations, &profile.categories, income, &plan);
        plan
    });

    let mut explanations = BTreeMap::new();
    let mut tips = BTreeMap::new();
    for c in &profile.categories {
        explanations.insert(
            c.label.clone(),
            taxonomy::explanation(&c.label, &profile.life_stage, profile.saving_preference),
        );
        tips.insert(c.label.clone(), taxonomy::tips(&c.label));
    }

    let pref = profile.saving_preference;
    let summary = match (&savings_plan, profile.financial_goal) {
        _ if profile.has_debt => format!(
            "This budget prioritizes debt reduction while maintaining a {pref}% savings rate."
        ),
        (Some(plan), _) => format!(
            "This budget helps save for your {} within {} months.",
            plan.item, plan.timeline_months
        ),
        (None, FinancialGoal::EmergencyFund) => {
            format!("This plan builds your emergency fund with {pref}% savings.")
        }
        (None, FinancialGoal::LongTermWealth) => format!(
            "This budget emphasizes long-term wealth building with {pref}% to savings."
        ),
        _ => format!("This budget balances current lifestyle with a {pref}% savings rate."),
    };

    BudgetRecommendation {
        allocations,
        explanations,
        tips,
        savings_plan,
        summary,
    }
}
