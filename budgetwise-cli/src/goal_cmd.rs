use anyhow::{bail, Result};
use budgetwise_core::SavingsGoal;
use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::load_config;
use crate::render;
use crate::state::{read_goal, remove_goal, require_profile, write_goal};

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// Start saving towards a purchase
    Create {
        #[arg(long)]
        item: String,

        #[arg(long)]
        cost: f64,

        /// Target date, YYYY-MM-DD
        #[arg(long)]
        deadline: NaiveDate,

        /// Amount already saved
        #[arg(long, default_value_t = 0.0)]
        saved: f64,
    },

    /// Show progress against the schedule
    Show,

    /// Record money put towards the goal
    Contribute { amount: f64 },

    /// Delete the goal
    Remove,
}

pub fn run(cmd: GoalCommand) -> Result<()> {
    match cmd {
        GoalCommand::Create {
            item,
            cost,
            deadline,
            saved,
        } => create(item, cost, deadline, saved),
        GoalCommand::Show => show(),
        GoalCommand::Contribute { amount } => contribute(amount),
        GoalCommand::Remove => {
            if remove_goal()? {
                println!("Savings goal removed.");
            } else {
                println!("No savings goal to remove.");
            }
            Ok(())
        }
    }
}

/// Positive, finite amount
fn check_amount(what: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("{what} must be a positive number (got {amount})");
    }
    Ok(())
}

fn create(item: String, cost: f64, deadline: NaiveDate, saved: f64) -> Result<()> {
    if item.trim().is_empty() {
        bail!("a goal needs an item");
    }
    check_amount("cost", cost)?;
    if !saved.is_finite() || saved < 0.0 {
        bail!("saved must be zero or a positive number (got {saved})");
    }
    let user = require_profile()?;
    let today = load_config()?.today()?;
    if deadline <= today {
        bail!("deadline {deadline} must be after today ({today})");
    }

    let goal = SavingsGoal::create(item.trim(), cost, deadline, saved, user.budget.income, today);
    write_goal(&goal)?;
    println!(
        "Saving {} per month for {} months ({:.1}% of income).",
        render::money(&user.currency_symbol, goal.monthly_amount),
        goal.timeline_months,
        goal.percentage_of_income
    );
    Ok(())
}

fn load_goal() -> Result<SavingsGoal> {
    match read_goal()? {
        Some(g) => Ok(g),
        None => bail!("No savings goal. Run: budgetwise goal create --item <item> --cost <cost> --deadline <YYYY-MM-DD>"),
    }
}

fn show() -> Result<()> {
    let user = require_profile()?;
    let today = load_config()?.today()?;
    let goal = load_goal()?;
    render::print_goal(&goal, &goal.progress(today), &user.currency_symbol);
    Ok(())
}

fn contribute(amount: f64) -> Result<()> {
    check_amount("amount", amount)?;
    let user = require_profile()?;
    let mut goal = load_goal()?;
    goal.contribute(amount);
    write_goal(&goal)?;
    tracing::info!(item = %goal.item, amount, "manual contribution");
    println!(
        "Added {}. Saved so far: {}.",
        render::money(&user.currency_symbol, amount),
        render::money(&user.currency_symbol, goal.current_savings)
    );
    Ok(())
}
