use anyhow::{bail, Result};
use budgetwise_advisor::{recommend, resolve_api_key, Advice, AdvisorRequest, CandidateSource, GeminiClient};
use budgetwise_core::{allocate, BudgetRecommendation, PurchaseGoal, SavingsGoal};
use chrono::NaiveDate;

use crate::config::{load_config, Config};
use crate::render;
use crate::state::{require_profile, write_budget, write_goal, UserProfile};

#[derive(clap::Args, Debug)]
pub struct RecommendArgs {
    /// Skip the generative model and use the heuristic engine only
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Item you are saving for (with --cost and --deadline)
    #[arg(long)]
    pub item: Option<String>,

    #[arg(long)]
    pub cost: Option<f64>,

    /// Purchase deadline, YYYY-MM-DD
    #[arg(long)]
    pub deadline: Option<NaiveDate>,

    /// Extra context passed to the model
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Store the allocations as your budget (and the plan as your goal)
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Print the recommendation as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// The Gemini client, when a key can be found
pub fn advisor_source(cfg: &Config) -> Result<Option<GeminiClient>> {
    let key_file = cfg.api_key_file()?;
    match resolve_api_key(None, key_file.as_deref()) {
        Ok(key) => Ok(Some(GeminiClient::new(key, cfg.gemini()))),
        Err(e) => {
            tracing::info!(error = %e, "advisor disabled");
            Ok(None)
        }
    }
}

fn purchase_from(item: Option<String>, cost: Option<f64>, deadline: Option<NaiveDate>) -> Result<Option<PurchaseGoal>> {
    match (item, cost, deadline) {
        (None, None, None) => Ok(None),
        (Some(item), Some(cost), Some(deadline)) => {
            if !cost.is_finite() || cost <= 0.0 {
                bail!("--cost must be a positive number");
            }
            Ok(Some(PurchaseGoal::new(item, cost, deadline)))
        }
        _ => bail!("--item, --cost and --deadline must be given together"),
    }
}

/// Run the advisor pipeline for a stored profile
pub fn advise(
    cfg: &Config,
    user: &UserProfile,
    purchase: Option<PurchaseGoal>,
    notes: String,
    offline: bool,
    today: NaiveDate,
) -> Result<Advice> {
    let request = AdvisorRequest {
        profile: user.budget.clone(),
        purchase,
        notes,
        currency_symbol: user.currency_symbol.clone(),
    };
    let client = if offline { None } else { advisor_source(cfg)? };
    let source = client.as_ref().map(|c| c as &dyn CandidateSource);
    Ok(recommend(source, &request, today))
}

/// Persist allocations as the budget and the plan, if any, as the goal
pub fn save_recommendation(rec: &BudgetRecommendation, purchase: Option<&PurchaseGoal>, user: &UserProfile, today: NaiveDate) -> Result<()> {
    write_budget(&rec.allocations)?;
    println!("\nSaved budget ({} categories).", rec.allocations.len());

    if let (Some(plan), Some(p)) = (&rec.savings_plan, purchase) {
        let goal = SavingsGoal::from_plan(plan, p.deadline, today);
        write_goal(&goal)?;
        println!(
            "Saved goal: {} ({} per month).",
            goal.item,
            render::money(&user.currency_symbol, goal.monthly_amount)
        );
    }
    Ok(())
}

pub fn run(args: RecommendArgs) -> Result<()> {
    let cfg = load_config()?;
    let user = require_profile()?;
    let today = cfg.today()?;
    let purchase = purchase_from(args.item, args.cost, args.deadline)?;

    let advice = advise(&cfg, &user, purchase.clone(), args.notes, args.offline, today)?;
    let rec = &advice.recommendation;

    if args.json {
        println!("{}", serde_json::to_string_pretty(rec)?);
    } else {
        println!("# Budget recommendation ({})\n", advice.origin);
        render::print_recommendation(rec, &user.currency_symbol);
    }

    if args.save {
        save_recommendation(rec, purchase.as_ref(), &user, today)?;
    }
    Ok(())
}

/// Print the heuristic split for the stored profile
pub fn run_allocate() -> Result<()> {
    let user = require_profile()?;
    let profile = &user.budget;
    let result = allocate(profile.income, &profile.categories, profile);

    println!(
        "# Allocation for {} monthly ({})\n",
        render::money(&user.currency_symbol, profile.income),
        profile.financial_goal
    );
    render::print_allocations(&result.allocations, &user.currency_symbol);

    let w = result.weights;
    println!(
        "\nweights: essentials {:.3}, lifestyle {:.3}, savings {:.3}, debt {:.3}, other {:.3}",
        w.essentials, w.lifestyle, w.savings, w.debt, w.other
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 3, 1).unwrap()
    }

    #[test]
    fn test_purchase_args_all_or_nothing() {
        assert!(purchase_from(None, None, None).unwrap().is_none());
        let p = purchase_from(Some("Laptop".into()), Some(60000.0), Some(d())).unwrap().unwrap();
        assert_eq!(p.cost, 60000.0);
        assert!(purchase_from(Some("Laptop".into()), None, Some(d())).is_err());
        assert!(purchase_from(Some("Laptop".into()), Some(0.0), Some(d())).is_err());
        assert!(purchase_from(Some("Laptop".into()), Some(f64::NAN), Some(d())).is_err());
        assert!(purchase_from(Some("Laptop".into()), Some(f64::INFINITY), Some(d())).is_err());
    }
}
