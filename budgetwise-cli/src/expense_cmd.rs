use anyhow::{bail, Result};
use budgetwise_ledger::{
    append_expense, budget_amounts, parse_expenses_csv, recent, record_savings_contribution, BudgetReport, Expense,
    ExpenseFilter, Period, SortOrder,
};
use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::load_config;
use crate::render::money;
use crate::state::{
    expenses_path, read_activity, read_budget, read_goal, require_profile, write_activity, write_goal,
};

/// Spending window for reports and overspend checks
const REPORT_DAYS: i64 = 30;

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    /// Log an expense
    Add {
        category: String,

        amount: f64,

        #[arg(long, default_value = "")]
        notes: String,

        /// Defaults to today; streaks still count the day you log it
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Transaction history
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// last-30-days, last-90-days, this-month, last-month, this-year or all-time
        #[arg(long, default_value = "last-30-days")]
        period: Period,

        /// newest, oldest, highest or lowest
        #[arg(long, default_value = "newest")]
        sort: SortOrder,
    },

    /// Budget vs. spending over recent days
    Report {
        #[arg(long, default_value_t = REPORT_DAYS)]
        days: i64,
    },
}

pub fn run(cmd: ExpenseCommand) -> Result<()> {
    match cmd {
        ExpenseCommand::Add {
            category,
            amount,
            notes,
            date,
        } => add(category, amount, notes, date),
        ExpenseCommand::List { category, period, sort } => list(ExpenseFilter {
            category,
            period,
            sort,
        }),
        ExpenseCommand::Report { days } => report(days),
    }
}

/// Positive, finite amount
fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("amount must be a positive number (got {amount})");
    }
    Ok(())
}

fn add(category: String, amount: f64, notes: String, date: Option<NaiveDate>) -> Result<()> {
    check_amount(amount)?;
    let user = require_profile()?;
    let today = load_config()?.today()?;
    let sym = &user.currency_symbol;
    let path = expenses_path()?;

    if !user.budget.category_labels().contains(&category) {
        println!("Note: '{category}' is not one of your categories.");
    }

    let budget = read_budget()?.map(|b| budget_amounts(&b)).unwrap_or_default();
    let existing = parse_expenses_csv(&path)?;
    let window = recent(&existing, today, REPORT_DAYS);
    let before = BudgetReport::build(user.budget.income, &budget, &window);
    if before.would_exceed(&category, amount) {
        println!("Warning: this expense will exceed your {category} budget.");
    }

    let expense = Expense::new(date.unwrap_or(today), category, amount, notes);
    append_expense(&path, &expense)?;
    println!("Logged {} for {}.", money(sym, amount), expense.category);

    if let Some(mut goal) = read_goal()? {
        if record_savings_contribution(&mut goal, &expense) {
            write_goal(&goal)?;
            println!(
                "Counted towards your {} goal: {} saved.",
                goal.item,
                money(sym, goal.current_savings)
            );
        }
    }

    let mut activity = read_activity()?;
    let earned = activity.record_expense(today);
    write_activity(&activity)?;
    for a in earned {
        println!("Achievement unlocked: {}", a.title());
    }
    Ok(())
}

fn list(filter: ExpenseFilter) -> Result<()> {
    let user = require_profile()?;
    let today = load_config()?.today()?;
    let sym = &user.currency_symbol;

    let rows = filter.apply(&parse_expenses_csv(expenses_path()?)?, today);
    println!(
        "# Transactions: {}, {}\n",
        filter.category.as_deref().unwrap_or("all categories"),
        filter.period.label()
    );
    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }
    for e in &rows {
        println!("{}  {:<24} {:>14}  {}", e.date, e.category, money(sym, e.amount), e.notes);
    }
    let total: f64 = rows.iter().map(|e| e.amount).sum();
    println!("\n{} transaction(s), {} total", rows.len(), money(sym, total));
    Ok(())
}

fn report(days: i64) -> Result<()> {
    let user = require_profile()?;
    let today = load_config()?.today()?;
    let sym = &user.currency_symbol;

    let expenses = parse_expenses_csv(expenses_path()?)?;
    let window = recent(&expenses, today, days);
    let budget = read_budget()?.map(|b| budget_amounts(&b)).unwrap_or_default();
    let r = BudgetReport::build(user.budget.income, &budget, &window);

    println!("# Spending, last {days} days\n");
    println!("Budget:    {}", money(sym, r.total_budget));
    println!("Spent:     {} ({:.1}%)", money(sym, r.total_spent), r.percent_spent);
    println!("Remaining: {} ({:.1}%)", money(sym, r.remaining), r.percent_remaining);
    println!(
        "Pace:      {}",
        if r.on_pace(today) { "on track" } else { "over budget pace" }
    );
    println!(
        "\nBudget health: {:.0}/100. {}",
        r.health_score(today),
        r.health_band(today).message()
    );

    if !r.categories.is_empty() {
        println!("\n## By category\n");
        for c in &r.categories {
            println!(
                "{:<24} {:>14} of {:>14}  {:>6.1}%{}",
                c.category,
                money(sym, c.spent),
                money(sym, c.allocated),
                c.percent_used,
                if c.is_over_budget() { "  over" } else { "" }
            );
        }
    }

    if !r.unbudgeted.is_empty() {
        println!("\n## Outside the budget\n");
        for (category, spent) in &r.unbudgeted {
            println!("{:<24} {:>14}", category, money(sym, *spent));
        }
    }

    let alerts = r.alerts();
    if !alerts.is_empty() {
        println!();
        for c in alerts {
            println!("! {} is at {:.1}% of its budget.", c.category, c.percent_used);
        }
    }

    println!("\n## Recent\n");
    if window.is_empty() {
        println!("(no expenses logged; add one with: budgetwise expense add <category> <amount>)");
    }
    for e in window.iter().take(10) {
        println!("{}  {:<24} {:>14}  {}", e.date, e.category, money(sym, e.amount), e.notes);
    }

    let activity = read_activity()?;
    println!("\nStreak: {} day(s), {} expenses logged", activity.streak, activity.total_expenses);
    if !activity.achievements.is_empty() {
        let titles: Vec<&str> = activity.achievements.iter().map(|a| a.title()).collect();
        println!("Achievements: {}", titles.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amount() {
        assert!(check_amount(12.5).is_ok());
        assert!(check_amount(0.0).is_err());
        assert!(check_amount(f64::NAN).is_err());
        assert!(check_amount(f64::INFINITY).is_err());
    }
}
