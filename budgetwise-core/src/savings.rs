//! Savings-goal planning, the savings reallocation step, and goal progress.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::allocation::Allocations;
use crate::money::{format_amount, round1, round2, round_to};
use crate::taxonomy::Category;

/// Share of monthly income above which a savings goal is flagged unrealistic
pub const REALISTIC_INCOME_SHARE: f64 = 25.0;

/// Monthly plan for a purchase goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsPlan {
    pub item: String,
    pub total_cost: f64,
    pub monthly_amount: f64,
    pub timeline_months: u32,
    pub percentage_of_income: f64,
    pub is_realistic: bool,
    pub recommendation: String,
}

/// Months between `today` and `deadline`, at least 1
pub fn months_until(deadline: NaiveDate, today: NaiveDate) -> u32 {
    let days = (deadline - today).num_days();
    round_to(days as f64 / 30.0, 0).max(1.0) as u32
}

/// Compute the monthly contribution for a purchase and judge its feasibility
pub fn plan_savings(
    income: f64,
    item: &str,
    cost: f64,
    deadline: NaiveDate,
    today: NaiveDate,
) -> SavingsPlan {
    let days_until = (deadline - today).num_days();
    let months = months_until(deadline, today);
    let monthly = cost / months as f64;
    let pct = if income > 0.0 { monthly / income * 100.0 } else { 0.0 };
    let is_realistic = pct <= REALISTIC_INCOME_SHARE;

    let recommendation = if is_realistic {
        format!("Save {} monthly to reach your goal.", format_amount(monthly))
    } else if days_until < 365 {
        let extended = round_to(cost / (income * REALISTIC_INCOME_SHARE / 100.0), 0);
        format!(
            "This goal requires {pct:.1}% of your income, which is high. \
             Consider extending your timeline to {extended} months."
        )
    } else {
        format!(
            "This goal requires {pct:.1}% of your income. \
             Consider reducing your target amount or extending your timeline."
        )
    };

    SavingsPlan {
        item: item.to_string(),
        total_cost: cost,
        monthly_amount: round2(monthly),
        timeline_months: months,
        percentage_of_income: round2(pct),
        is_realistic,
        recommendation,
    }
}

/// Move funds from Lifestyle categories into the best-funded savings category
/// so it covers `plan.monthly_amount`.
///
/// Nothing changes when there is no savings category, the savings category
/// already covers the plan, or Lifestyle cannot cover the shortfall.
/// Returns true when allocations were adjusted.
pub fn reallocate_for_savings(
    allocations: &mut Allocations,
    categories: &[Category],
    income: f64,
    plan: &SavingsPlan,
) -> bool {
    let mut target: Option<(&str, f64)> = None;
    for c in categories.iter().filter(|c| c.is_savings()) {
        let amount = allocations.get(&c.label).map(|a| a.amount).unwrap_or(0.0);
        if target.is_none_or(|(_, best)| amount > best) {
            target = Some((c.label.as_str(), amount));
        }
    }
    let Some((savings_label, savings_amount)) = target else {
        return false;
    };

    let monthly = plan.monthly_amount;
    let shortfall = monthly - savings_amount;
    if shortfall <= 0.0 {
        return false;
    }

    let lifestyle: Vec<&Category> = categories
        .iter()
        .filter(|c| c.is_lifestyle() && allocations.contains_key(&c.label))
        .collect();
    let lifestyle_total: f64 = lifestyle.iter().map(|c| allocations[&c.label].amount).sum();
    if lifestyle_total <= shortfall {
        return false;
    }

    let pct_of = |amount: f64| if income > 0.0 { round1(amount / income * 100.0) } else { 0.0 };

    for c in lifestyle {
        if let Some(a) = allocations.get_mut(&c.label) {
            let reduced = a.amount - a.amount / lifestyle_total * shortfall;
            a.amount = round2(reduced);
            a.percentage = pct_of(reduced);
        }
    }

    if let Some(a) = allocations.get_mut(savings_label) {
        a.amount = round2(monthly);
        a.percentage = pct_of(monthly);
    } else {
        allocations.insert(
            savings_label.to_string(),
            crate::allocation::Allocation::new(pct_of(monthly), round2(monthly)),
        );
    }
    true
}

/// A savings goal as stored by the user's document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub item: String,
    pub total_cost: f64,
    pub monthly_amount: f64,
    pub timeline_months: u32,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub current_savings: f64,
    pub percentage_of_income: f64,
}

impl SavingsGoal {
    /// New goal; money already saved reduces the monthly contribution
    pub fn create(
        item: impl Into<String>,
        total_cost: f64,
        target_date: NaiveDate,
        already_saved: f64,
        income: f64,
        today: NaiveDate,
    ) -> Self {
        let months = months_until(target_date, today);
        let needed = (total_cost - already_saved).max(0.0);
        let monthly = needed / months as f64;
        Self {
            item: item.into(),
            total_cost,
            monthly_amount: round2(monthly),
            timeline_months: months,
            start_date: today,
            target_date,
            current_savings: already_saved,
            percentage_of_income: if income > 0.0 { round2(monthly / income * 100.0) } else { 0.0 },
        }
    }

    /// Adopt a plan produced by the planner
    pub fn from_plan(plan: &SavingsPlan, target_date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            item: plan.item.clone(),
            total_cost: plan.total_cost,
            monthly_amount: plan.monthly_amount,
            timeline_months: plan.timeline_months,
            start_date: today,
            target_date,
            current_savings: 0.0,
            percentage_of_income: plan.percentage_of_income,
        }
    }

    pub fn contribute(&mut self, amount: f64) {
        self.current_savings += amount;
    }

    pub fn progress(&self, today: NaiveDate) -> GoalProgress {
        progress(self, today)
    }
}

/// Saved-vs-elapsed comparison, with a 5 point tolerance band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduleStatus {
    Ahead(f64),
    Behind(f64),
    OnTrack,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Percent of the total cost saved so far
    pub saved_percent: f64,
    /// Percent of the goal window already elapsed
    pub time_percent: f64,
    pub days_remaining: i64,
    pub status: ScheduleStatus,
}

const SCHEDULE_BAND: f64 = 5.0;

/// How far along a goal is, in money and in time
pub fn progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
    let saved_percent = if goal.total_cost > 0.0 {
        goal.current_savings / goal.total_cost * 100.0
    } else {
        0.0
    };

    let elapsed = (today - goal.start_date).num_days();
    let window = (goal.target_date - goal.start_date).num_days();
    let time_percent = if window > 0 {
        elapsed as f64 / window as f64 * 100.0
    } else {
        0.0
    };

    let status = if saved_percent > time_percent + SCHEDULE_BAND {
        ScheduleStatus::Ahead(round1(saved_percent - time_percent))
    } else if time_percent > saved_percent + SCHEDULE_BAND {
        ScheduleStatus::Behind(round1(time_percent - saved_percent))
    } else {
        ScheduleStatus::OnTrack
    };

    GoalProgress {
        saved_percent: round1(saved_percent),
        time_percent: round1(time_percent),
        days_remaining: (goal.target_date - today).num_days().max(0),
        status,
    }
}
