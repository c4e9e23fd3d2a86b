//! Plain-text tables for the terminal.

use budgetwise_core::{
    classify, format_amount, total_percentage, AllocationBalance, AllocationReview, Allocations,
    BudgetRecommendation, GoalProgress, SavingsGoal, SavingsPlan, ScheduleStatus,
};

pub fn money(sym: &str, amount: f64) -> String {
    format!("{sym}{}", format_amount(amount))
}

pub fn print_allocations(allocations: &Allocations, sym: &str) {
    let width = allocations.keys().map(|k| k.chars().count()).max().unwrap_or(8).max(8);
    println!("{:<width$}  {:>7}  {:>14}  type", "category", "share", "amount");
    for (label, a) in allocations {
        println!(
            "{:<width$}  {:>6.1}%  {:>14}  {}",
            label,
            a.percentage,
            money(sym, a.amount),
            classify(label)
        );
    }
    println!("{:<width$}  {:>6.1}%", "total", total_percentage(allocations));
}

pub fn print_review(review: &AllocationReview, sym: &str) {
    match review.balance {
        AllocationBalance::Complete => println!("\nYour budget is fully allocated."),
        AllocationBalance::Unallocated(r) => {
            println!("\nYou have {} unallocated in your budget.", money(sym, r))
        }
        AllocationBalance::OverAllocated(r) => {
            println!("\nYour budget exceeds your income by {}.", money(sym, r))
        }
    }
    for w in &review.warnings {
        println!("! {}", w.message);
    }
}

pub fn print_plan(plan: &SavingsPlan, sym: &str) {
    println!("\n## Savings plan: {}\n", plan.item);
    println!("Total cost:      {}", money(sym, plan.total_cost));
    println!("Monthly saving:  {}", money(sym, plan.monthly_amount));
    println!("Timeline:        {} months", plan.timeline_months);
    println!("Share of income: {:.1}%", plan.percentage_of_income);
    println!("Realistic:       {}", if plan.is_realistic { "yes" } else { "no" });
    println!("{}", plan.recommendation);
}

pub fn print_recommendation(rec: &BudgetRecommendation, sym: &str) {
    println!("{}\n", rec.summary);
    print_allocations(&rec.allocations, sym);

    println!("\n## Notes\n");
    for (label, text) in &rec.explanations {
        println!("{label}: {text}");
        for tip in rec.tips.get(label).into_iter().flatten() {
            println!("  - {tip}");
        }
    }

    if let Some(plan) = &rec.savings_plan {
        print_plan(plan, sym);
    }
}

pub fn print_goal(goal: &SavingsGoal, progress: &GoalProgress, sym: &str) {
    println!("## Savings goal: {}\n", goal.item);
    println!(
        "Saved {} of {} ({:.1}%)",
        money(sym, goal.current_savings),
        money(sym, goal.total_cost),
        progress.saved_percent
    );
    println!("Monthly target: {} over {} months", money(sym, goal.monthly_amount), goal.timeline_months);
    println!(
        "Target date {} ({} days left, {:.1}% of the time elapsed)",
        goal.target_date, progress.days_remaining, progress.time_percent
    );
    match progress.status {
        ScheduleStatus::Ahead(d) => println!("You're {d:.1} points ahead of schedule."),
        ScheduleStatus::Behind(d) => println!("You're {d:.1} points behind schedule."),
        ScheduleStatus::OnTrack => println!("You're on track."),
    }
}
