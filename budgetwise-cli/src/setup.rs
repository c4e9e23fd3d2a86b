use anyhow::Result;
use budgetwise_core::taxonomy::{categories_from_labels, clean_label, suggested_categories};
use budgetwise_core::{review, rule_of_thumb, FinancialGoal, Profile, PurchaseGoal};
use chrono::NaiveDate;
use std::io::{self, Write};

use crate::config::load_config;
use crate::onboard::{decide_next_step, OnboardState, OnboardStep};
use crate::recommend_cmd::{advise, save_recommendation};
use crate::render;
use crate::state::{profile_path, write_budget, write_profile, UserProfile};

pub const USER_TYPES: [&str; 5] = ["Student", "Salaried Employee", "Freelancer", "Business Owner", "Other"];
pub const CURRENCIES: [&str; 4] = ["₹ INR", "$ USD", "€ EUR", "£ GBP"];

const DEFAULT_SAVING_PREFERENCE: f64 = 20.0;
/// Saving preference slider bounds
const SAVING_RANGE: (f64, f64) = (5.0, 50.0);

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Ask until `parse` accepts the answer
fn prompt_until<T>(label: &str, warning: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    loop {
        if let Some(v) = parse(&prompt(label)?) {
            return Ok(v);
        }
        println!("{warning}");
    }
}

fn print_options(options: &[&str]) {
    for (i, o) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, o);
    }
}

/// 1-based menu pick; blank selects `default`
pub fn parse_choice(input: &str, count: usize, default: usize) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    input.parse::<usize>().ok().filter(|n| (1..=count).contains(n)).map(|n| n - 1)
}

/// Positive amount, thousands separators allowed
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

pub fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// "₹ INR" -> "₹"
pub fn currency_symbol(choice: &str) -> String {
    choice.split_whitespace().next().unwrap_or("$").to_string()
}

/// Comma-separated numbers from the suggestion list or custom names.
/// Blank picks the first four suggestions.
pub fn parse_category_picks(input: &str, suggestions: &[&str]) -> Vec<String> {
    let raw: Vec<String> = if input.trim().is_empty() {
        suggestions.iter().take(4).map(|s| s.to_string()).collect()
    } else {
        input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| match t.parse::<usize>() {
                Ok(n) if (1..=suggestions.len()).contains(&n) => suggestions[n - 1].to_string(),
                _ => t.to_string(),
            })
            .collect()
    };

    let mut picks: Vec<String> = Vec::new();
    for r in raw {
        let label = clean_label(&r);
        if !label.is_empty() && !picks.contains(&label) {
            picks.push(label);
        }
    }
    picks
}

fn parse_saving_preference(input: &str) -> Option<f64> {
    if input.trim().is_empty() {
        return Some(DEFAULT_SAVING_PREFERENCE);
    }
    input
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|v| (SAVING_RANGE.0..=SAVING_RANGE.1).contains(v))
}

fn ask_purchase() -> Result<Option<PurchaseGoal>> {
    let saving = prompt_until("Saving for a specific purchase? [y/N]", "Please answer y or n", |s| {
        parse_yes_no(s, false)
    })?;
    if !saving {
        return Ok(None);
    }
    let item = prompt_until("What are you saving for?", "Please name the item", |s| {
        (!s.trim().is_empty()).then(|| s.trim().to_string())
    })?;
    let cost = prompt_until("Estimated cost", "Please enter a positive amount", parse_amount)?;
    let deadline = prompt_until("Target date (YYYY-MM-DD)", "Please use the format YYYY-MM-DD", |s| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
    })?;
    Ok(Some(PurchaseGoal::new(item, cost, deadline)))
}

fn step_budget(state: &OnboardState) -> Result<()> {
    let cfg = load_config()?;
    let today = cfg.today()?;
    let income = state.income.unwrap_or_default();
    let name = state.name.clone().unwrap_or_default();
    let user_type = state.user_type.clone().unwrap_or_default();
    let currency = state.currency.as_deref().map(currency_symbol).unwrap_or_else(|| cfg.display.currency_symbol.clone());

    let options = ["Quick Setup (50/30/20 rule)", "Recommendation", "Skip for now"];
    print_options(&options);
    let choice = prompt_until("Choose [1]", "Please pick one of the numbers above", |s| {
        parse_choice(s, options.len(), 0)
    })?;

    let (goal, pref, has_debt, purchase) = if choice == 1 {
        println!();
        let labels: Vec<&str> = FinancialGoal::ALL.iter().map(|g| g.label()).collect();
        print_options(&labels);
        let goal = prompt_until("Primary financial goal [6]", "Please pick one of the numbers above", |s| {
            parse_choice(s, labels.len(), labels.len() - 1)
        })?;
        let pref = prompt_until(
            "Desired savings rate, 5-50% [20]",
            "Please enter a number between 5 and 50",
            parse_saving_preference,
        )?;
        let has_debt = prompt_until("Do you have significant debt to pay off? [y/N]", "Please answer y or n", |s| {
            parse_yes_no(s, false)
        })?;
        (FinancialGoal::ALL[goal], pref, has_debt, ask_purchase()?)
    } else {
        (FinancialGoal::default(), DEFAULT_SAVING_PREFERENCE, false, None)
    };

    let categories = categories_from_labels(&state.categories);
    let user = UserProfile {
        created_at_utc: Some(chrono::Utc::now().to_rfc3339()),
        name,
        user_type: user_type.clone(),
        currency_symbol: currency,
        budget: Profile::new(income, categories, pref, has_debt, goal, user_type),
    };
    write_profile(&user)?;
    println!("\nWrote {}", profile_path()?.display());

    match choice {
        0 => {
            let budget = rule_of_thumb(income, &user.budget.categories);
            write_budget(&budget)?;
            println!();
            render::print_allocations(&budget, &user.currency_symbol);
            render::print_review(&review(income, &budget), &user.currency_symbol);
        }
        1 => {
            let notes = prompt("Anything else the advisor should know? (optional)")?;
            let advice = advise(&cfg, &user, purchase.clone(), notes, false, today)?;
            println!();
            render::print_recommendation(&advice.recommendation, &user.currency_symbol);
            save_recommendation(&advice.recommendation, purchase.as_ref(), &user, today)?;
        }
        _ => println!("Skipped. Set a budget later with: budgetwise budget quick"),
    }
    Ok(())
}

pub fn run_setup() -> Result<()> {
    println!("Budgetwise setup");
    let mut state = OnboardState::default();

    loop {
        let decision = decide_next_step(&state);
        let Some(step) = decision.next_step else {
            println!("\n{}", decision.assistant_message);
            break;
        };
        println!(
            "\n[{}/{}] {}\n{}\n",
            step.number(),
            OnboardStep::ALL.len(),
            step.title(),
            decision.assistant_message
        );

        match step {
            OnboardStep::PersonalInfo => {
                print_options(&USER_TYPES);
                let t = prompt_until("What best describes you? [1]", "Please pick one of the numbers above", |s| {
                    parse_choice(s, USER_TYPES.len(), 0)
                })?;
                state.user_type = Some(USER_TYPES[t].to_string());
                state.name = Some(prompt_until("Your name", "Please enter your name", |s| {
                    (!s.trim().is_empty()).then(|| s.trim().to_string())
                })?);
            }
            OnboardStep::Income => {
                state.income = Some(prompt_until("Monthly income", "Please enter your income", parse_amount)?);
                print_options(&CURRENCIES);
                let c = prompt_until("Currency [1]", "Please pick one of the numbers above", |s| {
                    parse_choice(s, CURRENCIES.len(), 0)
                })?;
                state.currency = Some(CURRENCIES[c].to_string());
            }
            OnboardStep::Categories => {
                let suggestions = suggested_categories();
                print_options(suggestions);
                let input = prompt("Pick numbers or type names, comma separated [1,2,3,4]")?;
                state.categories = parse_category_picks(&input, suggestions);
                if state.categories.is_empty() {
                    println!("Please select at least one category.");
                }
            }
            OnboardStep::Budget => {
                step_budget(&state)?;
                state.budget_chosen = true;
            }
        }
    }

    println!("\nNext:");
    println!("- budgetwise budget show");
    println!("- budgetwise expense add <category> <amount>");
    println!("- budgetwise recommend --item <item> --cost <cost> --deadline <YYYY-MM-DD>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("", 5, 0), Some(0));
        assert_eq!(parse_choice("3", 5, 0), Some(2));
        assert_eq!(parse_choice("6", 5, 0), None);
        assert_eq!(parse_choice("zero", 5, 0), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("85,000"), Some(85000.0));
        assert_eq!(parse_amount(" 1200.5 "), Some(1200.5));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("1e400"), None);
    }

    #[test]
    fn test_currency_symbol() {
        assert_eq!(currency_symbol("₹ INR"), "₹");
        assert_eq!(currency_symbol("£ GBP"), "£");
    }

    #[test]
    fn test_category_picks() {
        let suggestions = ["🏠 Essentials (Rent, Utilities)", "🚌 Transportation", "🍔 Food & Dining", "🎬 Entertainment", "✈️ Travel"];
        assert_eq!(
            parse_category_picks("", &suggestions),
            vec!["Essentials", "Transportation", "Food & Dining", "Entertainment"]
        );
        assert_eq!(parse_category_picks("5, Pet Care, 5", &suggestions), vec!["Travel", "Pet Care"]);
    }

    #[test]
    fn test_saving_preference_range() {
        assert_eq!(parse_saving_preference(""), Some(20.0));
        assert_eq!(parse_saving_preference("35%"), Some(35.0));
        assert_eq!(parse_saving_preference("60"), None);
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(parse_yes_no("", false), Some(false));
        assert_eq!(parse_yes_no("YES", false), Some(true));
        assert_eq!(parse_yes_no("maybe", false), None);
    }
}
