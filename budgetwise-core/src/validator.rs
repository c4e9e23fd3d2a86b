//! Repair partial or malformed recommendations into the canonical shape.
//!
//! Candidates come either from the heuristic engine or from an external
//! generative model; both pass through [`validate`] so callers always receive
//! a complete [`BudgetRecommendation`].

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::allocation::{total_percentage, Allocation, Allocations};
use crate::money::{round1, round2};
use crate::profile::PurchaseGoal;
use crate::recommendation::BudgetRecommendation;
use crate::savings::{plan_savings, SavingsPlan};

/// Percentage allocated to a category the candidate left out
pub const DEFAULT_CATEGORY_PERCENT: f64 = 5.0;
/// Allowed drift of the percentage total from 100 before rescaling
pub const PERCENT_TOLERANCE: f64 = 5.0;
pub const DEFAULT_SUMMARY: &str = "This budget is designed to balance your needs and financial goals.";

/// A recommendation with any part possibly missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecommendation {
    pub allocations: Option<Allocations>,
    pub explanations: Option<BTreeMap<String, String>>,
    pub tips: Option<BTreeMap<String, Vec<String>>>,
    pub savings_plan: Option<SavingsPlan>,
    pub summary: Option<String>,
}

/// Finite numbers only; "NaN", "inf" and overflowing literals are dropped
fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().replace(',', "").parse().ok(),
        _ => None,
    };
    n.filter(|v: &f64| v.is_finite())
}

fn parse_allocations(v: &Value, income: f64) -> Option<Allocations> {
    let obj = v.as_object()?;
    let mut out = Allocations::new();
    for (label, entry) in obj {
        let amount = entry.get("amount").and_then(as_number);
        let percentage = entry.get("percentage").and_then(as_number).or_else(|| {
            amount
                .filter(|_| income > 0.0)
                .map(|a| round1(a / income * 100.0))
        });
        // bare numbers are read as percentages
        let percentage = percentage.or_else(|| as_number(entry));
        let Some(percentage) = percentage else {
            continue;
        };
        let amount = amount.unwrap_or_else(|| round2(income * percentage / 100.0));
        out.insert(label.clone(), Allocation::new(percentage, amount));
    }
    Some(out)
}

fn parse_explanations(v: &Value) -> Option<BTreeMap<String, String>> {
    let obj = v.as_object()?;
    Some(
        obj.iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
    )
}

fn parse_tips(v: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let obj = v.as_object()?;
    let mut out = BTreeMap::new();
    for (k, v) in obj {
        let tips: Vec<String> = match v {
            Value::Array(items) => items
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect(),
            Value::String(s) => vec![s.clone()],
            _ => continue,
        };
        if !tips.is_empty() {
            out.insert(k.clone(), tips);
        }
    }
    Some(out)
}

fn parse_savings_plan(v: &Value) -> Option<SavingsPlan> {
    let item = v.get("item")?.as_str()?.trim();
    if item.is_empty() {
        return None;
    }
    let num = |key: &str| v.get(key).and_then(as_number).unwrap_or(0.0);
    let percentage_of_income = num("percentage_of_income");
    Some(SavingsPlan {
        item: item.to_string(),
        total_cost: num("total_cost"),
        monthly_amount: num("monthly_amount"),
        timeline_months: num("timeline_months").max(1.0).round() as u32,
        percentage_of_income,
        is_realistic: v
            .get("is_realistic")
            .and_then(Value::as_bool)
            .unwrap_or(percentage_of_income <= crate::savings::REALISTIC_INCOME_SHARE),
        recommendation: v
            .get("recommendation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

impl CandidateRecommendation {
    /// Read whatever is usable out of an arbitrary JSON value. Never fails.
    ///
    /// `income` is used to derive a percentage when only an amount was given.
    pub fn from_json(value: &Value, income: f64) -> Self {
        Self {
            allocations: value.get("allocations").and_then(|v| parse_allocations(v, income)),
            explanations: value.get("explanations").and_then(parse_explanations),
            tips: value.get("tips").and_then(parse_tips),
            savings_plan: value.get("savings_plan").and_then(parse_savings_plan),
            summary: value
                .get("summary")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

impl From<BudgetRecommendation> for CandidateRecommendation {
    fn from(rec: BudgetRecommendation) -> Self {
        Self {
            allocations: Some(rec.allocations),
            explanations: Some(rec.explanations),
            tips: Some(rec.tips),
            savings_plan: rec.savings_plan,
            summary: Some(rec.summary),
        }
    }
}

/// Fill gaps and rescale a candidate so it satisfies the recommendation invariants.
pub fn validate(
    candidate: CandidateRecommendation,
    categories: &[String],
    income: f64,
    purchase: Option<&PurchaseGoal>,
    today: NaiveDate,
) -> BudgetRecommendation {
    let mut allocations = candidate.allocations.unwrap_or_default();
    let mut explanations = candidate.explanations.unwrap_or_default();
    let mut tips = candidate.tips.unwrap_or_default();
    let summary = candidate.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    // non-finite entries are treated as missing
    allocations.retain(|_, a| a.percentage.is_finite() && a.amount.is_finite());

    for category in categories {
        allocations.entry(category.clone()).or_insert_with(|| {
            Allocation::new(DEFAULT_CATEGORY_PERCENT, round2(income * DEFAULT_CATEGORY_PERCENT / 100.0))
        });
        explanations
            .entry(category.clone())
            .or_insert_with(|| format!("This allocation for {category} is based on your financial profile."));
        tips.entry(category.clone()).or_insert_with(|| {
            vec![
                "Track spending in this category".to_string(),
                "Review periodically to ensure it aligns with your priorities".to_string(),
            ]
        });
    }

    let total = total_percentage(&allocations);
    if total.is_finite() && (total - 100.0).abs() > PERCENT_TOLERANCE {
        let factor = if total > 0.0 { 100.0 / total } else { 1.0 };
        for a in allocations.values_mut() {
            let scaled = a.percentage * factor;
            a.percentage = round1(scaled);
            a.amount = round2(income * scaled / 100.0);
        }
    }

    let mut savings_plan = candidate.savings_plan.filter(|p| !p.item.trim().is_empty());
    if let Some(p) = purchase.filter(|p| p.is_declared()) {
        if savings_plan.is_none() {
            savings_plan = Some(plan_savings(income, &p.item, p.cost, p.deadline, today));
        }
    }

    BudgetRecommendation {
        allocations,
        explanations,
        tips,
        savings_plan,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn labels(ls: &[&str]) -> Vec<String> {
        ls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_candidate_is_filled() {
        let cats = labels(&["Essentials", "Travel"]);
        let rec = validate(CandidateRecommendation::default(), &cats, 2000.0, None, today());

        // 2 x 5% is far from 100 and gets scaled up to 50% each
        assert_eq!(rec.allocations["Essentials"], Allocation::new(50.0, 1000.0));
        assert_eq!(rec.summary, DEFAULT_SUMMARY);
        assert_eq!(
            rec.explanations["Travel"],
            "This allocation for Travel is based on your financial profile."
        );
        assert_eq!(rec.tips["Travel"].len(), 2);
        assert!(rec.savings_plan.is_none());
    }

    #[test]
    fn test_within_tolerance_is_untouched() {
        let value = json!({
            "allocations": {
                "Essentials": {"percentage": 60, "amount": 600},
                "Travel": {"percentage": 37, "amount": 370}
            }
        });
        let cand = CandidateRecommendation::from_json(&value, 1000.0);
        let rec = validate(cand, &labels(&["Essentials", "Travel"]), 1000.0, None, today());
        assert_eq!(rec.allocations["Travel"], Allocation::new(37.0, 370.0));
    }

    #[test]
    fn test_from_json_tolerates_garbage() {
        let value = json!({
            "allocations": {
                "Essentials": {"percentage": "45%", "amount": "4,500"},
                "Travel": {"amount": 1000},
                "Broken": {"note": "no numbers"},
                "Health": 12
            },
            "explanations": {"Essentials": "Rent first", "Travel": 3},
            "tips": {"Essentials": ["Cook at home", 7], "Travel": "Book early"},
            "savings_plan": {"item": ""},
            "summary": 42
        });
        let cand = CandidateRecommendation::from_json(&value, 10000.0);
        let allocs = cand.allocations.as_ref().unwrap();
        assert_eq!(allocs["Essentials"], Allocation::new(45.0, 4500.0));
        assert_eq!(allocs["Travel"], Allocation::new(10.0, 1000.0));
        assert_eq!(allocs["Health"], Allocation::new(12.0, 1200.0));
        assert!(!allocs.contains_key("Broken"));
        assert_eq!(cand.explanations.as_ref().unwrap().len(), 1);
        assert_eq!(cand.tips.as_ref().unwrap()["Essentials"], vec!["Cook at home"]);
        assert_eq!(cand.tips.as_ref().unwrap()["Travel"], vec!["Book early"]);
        assert!(cand.savings_plan.is_none());
        assert!(cand.summary.is_none());
    }

    #[test]
    fn test_non_finite_numbers_are_dropped() {
        let value = json!({
            "allocations": {
                "Essentials": {"percentage": "NaN", "amount": 100},
                "Travel": {"percentage": 50, "amount": 500},
                "Health": {"percentage": "inf"},
                "Shopping": {"percentage": "1e400", "amount": "-infinity"}
            }
        });
        let cats = labels(&["Essentials", "Travel", "Health", "Shopping"]);
        let cand = CandidateRecommendation::from_json(&value, 1000.0);
        let allocs = cand.allocations.as_ref().unwrap();
        // percentage recovered from the amount
        assert_eq!(allocs["Essentials"], Allocation::new(10.0, 100.0));
        assert!(!allocs.contains_key("Health"));
        assert!(!allocs.contains_key("Shopping"));

        let rec = validate(cand, &cats, 1000.0, None, today());
        for a in rec.allocations.values() {
            assert!(a.percentage.is_finite() && a.amount.is_finite());
        }
        let total = total_percentage(&rec.allocations);
        assert!((total - 100.0).abs() <= 0.5, "total {total}");

        // the saved budget must read back
        let saved = serde_json::to_string(&rec.allocations).unwrap();
        let back: Allocations = serde_json::from_str(&saved).unwrap();
        assert_eq!(back, rec.allocations);
    }

    #[test]
    fn test_non_finite_allocation_falls_back_to_default() {
        let mut allocations = Allocations::new();
        allocations.insert("Essentials".to_string(), Allocation::new(f64::NAN, 100.0));
        allocations.insert("Travel".to_string(), Allocation::new(95.0, f64::INFINITY));
        let cand = CandidateRecommendation {
            allocations: Some(allocations),
            ..Default::default()
        };
        let rec = validate(cand, &labels(&["Essentials", "Travel"]), 1000.0, None, today());
        // both replaced by 5%, then scaled to 50% each
        assert_eq!(rec.allocations["Essentials"], Allocation::new(50.0, 500.0));
        assert_eq!(rec.allocations["Travel"], Allocation::new(50.0, 500.0));
    }

    #[test]
    fn test_non_object_candidate() {
        let cand = CandidateRecommendation::from_json(&json!(["not", "a", "budget"]), 1000.0);
        assert_eq!(cand, CandidateRecommendation::default());
    }

    #[test]
    fn test_zero_total_keeps_factor_one() {
        let value = json!({"allocations": {"Essentials": {"percentage": 0, "amount": 0}}});
        let cand = CandidateRecommendation::from_json(&value, 1000.0);
        let rec = validate(cand, &labels(&["Essentials"]), 1000.0, None, today());
        assert_eq!(rec.allocations["Essentials"], Allocation::new(0.0, 0.0));
    }

    #[test]
    fn test_missing_plan_is_synthesized() {
        let purchase = PurchaseGoal::new("Laptop", 60000.0, today() + chrono::Duration::days(180));
        let rec = validate(
            CandidateRecommendation::default(),
            &labels(&["Essentials"]),
            40000.0,
            Some(&purchase),
            today(),
        );
        let plan = rec.savings_plan.unwrap();
        assert_eq!(plan.item, "Laptop");
        assert_eq!(plan.monthly_amount, 10000.0);
    }

    #[test]
    fn test_candidate_plan_is_kept() {
        let value = json!({
            "savings_plan": {
                "item": "Laptop",
                "total_cost": 60000,
                "monthly_amount": 12000,
                "timeline_months": 5,
                "percentage_of_income": 30,
                "recommendation": "Stretch it"
            }
        });
        let purchase = PurchaseGoal::new("Laptop", 60000.0, today() + chrono::Duration::days(180));
        let cand = CandidateRecommendation::from_json(&value, 40000.0);
        let rec = validate(cand, &labels(&["Essentials"]), 40000.0, Some(&purchase), today());
        let plan = rec.savings_plan.unwrap();
        assert_eq!(plan.timeline_months, 5);
        assert!(!plan.is_realistic);
        assert_eq!(plan.recommendation, "Stretch it");
    }
}
