use anyhow::{bail, Result};
use budgetwise_core::money::{round1, round2};
use budgetwise_core::{review, rule_of_thumb, Allocation, Allocations};
use clap::Subcommand;

use crate::render;
use crate::state::{read_budget, require_profile, write_budget};

#[derive(Subcommand, Debug)]
pub enum BudgetCommand {
    /// Show the saved budget with warnings
    Show,

    /// Reset the budget to the 50/30/15/5 quick setup
    Quick,

    /// Set one category's share of income
    Set {
        category: String,

        /// Percent of monthly income
        percent: f64,
    },
}

pub fn run(cmd: BudgetCommand) -> Result<()> {
    match cmd {
        BudgetCommand::Show => show(),
        BudgetCommand::Quick => quick(),
        BudgetCommand::Set { category, percent } => set(&category, percent),
    }
}

fn load_budget() -> Result<Allocations> {
    match read_budget()? {
        Some(b) => Ok(b),
        None => bail!("No budget saved yet. Run: budgetwise budget quick (or budgetwise recommend --save)"),
    }
}

fn show() -> Result<()> {
    let user = require_profile()?;
    let budget = load_budget()?;
    println!("# Budget\n");
    render::print_allocations(&budget, &user.currency_symbol);
    render::print_review(&review(user.budget.income, &budget), &user.currency_symbol);
    Ok(())
}

fn quick() -> Result<()> {
    let user = require_profile()?;
    let budget = rule_of_thumb(user.budget.income, &user.budget.categories);
    write_budget(&budget)?;
    println!("# Quick setup budget (50% needs, 30% wants, 15% savings, 5% debt)\n");
    render::print_allocations(&budget, &user.currency_symbol);
    render::print_review(&review(user.budget.income, &budget), &user.currency_symbol);
    Ok(())
}

/// Replace one category's allocation; the category must be in the budget or profile
pub fn apply_percent(budget: &mut Allocations, known: &[String], category: &str, percent: f64, income: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&percent) {
        bail!("percent must be between 0 and 100 (got {percent})");
    }
    if !budget.contains_key(category) && !known.iter().any(|k| k == category) {
        bail!(
            "unknown category '{category}' (known: {})",
            budget.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    budget.insert(
        category.to_string(),
        Allocation::new(round1(percent), round2(income * percent / 100.0)),
    );
    Ok(())
}

fn set(category: &str, percent: f64) -> Result<()> {
    let user = require_profile()?;
    let income = user.budget.income;
    let mut budget = read_budget()?.unwrap_or_default();
    apply_percent(&mut budget, &user.budget.category_labels(), category, percent, income)?;
    write_budget(&budget)?;

    println!(
        "Set {category} to {percent:.1}% ({}).",
        render::money(&user.currency_symbol, income * percent / 100.0)
    );
    render::print_review(&review(income, &budget), &user.currency_symbol);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_percent() {
        let mut budget = Allocations::new();
        let known = vec!["Travel".to_string()];
        apply_percent(&mut budget, &known, "Travel", 12.5, 40000.0).unwrap();
        assert_eq!(budget["Travel"], Allocation::new(12.5, 5000.0));

        assert!(apply_percent(&mut budget, &known, "Boats", 5.0, 40000.0).is_err());
        assert!(apply_percent(&mut budget, &known, "Travel", 120.0, 40000.0).is_err());
        assert!(apply_percent(&mut budget, &known, "Travel", f64::NAN, 40000.0).is_err());
    }
}
