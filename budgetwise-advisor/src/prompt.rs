//! Prompt text for the budget request.

use budgetwise_core::format_amount;
use chrono::NaiveDate;

use crate::pipeline::AdvisorRequest;

const RESPONSE_SHAPE: &str = r#"```json
{
    "allocations": {
        "Category1": {"percentage": 10, "amount": 1000},
        "Category2": {"percentage": 20, "amount": 2000}
    },
    "explanations": {
        "Category1": "Explanation text...",
        "Category2": "Explanation text..."
    },
    "tips": {
        "Category1": ["Tip 1", "Tip 2"],
        "Category2": ["Tip 1", "Tip 2"]
    },
    "savings_plan": {
        "item": "Name of item or empty if none",
        "total_cost": 10000,
        "monthly_amount": 500,
        "timeline_months": 20,
        "percentage_of_income": 10,
        "is_realistic": true,
        "recommendation": "Recommendation text if adjustment needed"
    },
    "summary": "Overall budget strategy summary..."
}
```"#;

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

/// Render the request as a prompt asking for the recommendation JSON
pub fn build_budget_prompt(request: &AdvisorRequest, today: NaiveDate) -> String {
    let profile = &request.profile;
    let sym = &request.currency_symbol;
    let purchase = request.purchase.as_ref().filter(|p| p.is_declared());

    let mut prompt = String::new();
    prompt.push_str(
        "As a financial advisor, create a monthly budget allocation for a person with the following profile:\n",
    );
    prompt.push_str(&format!("- Monthly income: {sym} {}\n", format_amount(profile.income)));
    prompt.push_str(&format!("- Primary financial goal: {}\n", profile.financial_goal));
    prompt.push_str(&format!("- Life stage: {}\n", profile.life_stage));
    prompt.push_str(&format!("- Desired savings rate: {}%\n", profile.saving_preference));
    prompt.push_str(&format!("- Has significant debt: {}\n", yes_no(profile.has_debt)));
    prompt.push_str(&format!("- Planning major purchase soon: {}\n", yes_no(purchase.is_some())));

    if let Some(p) = purchase {
        let days = (p.deadline - today).num_days();
        let months = budgetwise_core::months_until(p.deadline, today);
        prompt.push_str(&format!("- Saving for: {}\n", p.item));
        prompt.push_str(&format!("- Estimated cost: {sym} {}\n", format_amount(p.cost)));
        prompt.push_str(&format!(
            "- Target date: {} ({days} days from now)\n",
            p.deadline.format("%Y-%m-%d")
        ));
        prompt.push_str(&format!("- Timeline: Approximately {months} months\n"));
    }

    let notes = request.notes.trim();
    if !notes.is_empty() {
        prompt.push_str(&format!("- Additional context: {notes}\n"));
    }

    prompt.push_str("\nAllocate the monthly income ONLY across these specific user-selected categories:\n");
    prompt.push_str(&profile.category_labels().join(", "));
    prompt.push_str(
        "\n\nFor each category:\n\
         - Provide the recommended allocation as both a percentage and an absolute amount\n\
         - Give a brief explanation of the reasoning based on the user's situation\n\
         - Provide 1-2 tips for optimizing spending in this category\n\n\
         If the user is saving for a specific purchase, create a dedicated savings plan that shows:\n\
         - Monthly amount needed to reach the goal by the deadline\n\
         - Percentage of income this represents\n\
         - Whether this saving goal is realistic given their income and other expenses\n\
         - Suggestions for adjusting the timeline if the goal is not realistic\n\n\
         Return the response ONLY as a valid JSON object with this exact structure:\n",
    );
    prompt.push_str(RESPONSE_SHAPE);
    prompt.push_str(
        "\n\nMake sure all budget allocations correctly add up to 100% of income (or very close to it), \
         and that you include ALL the categories I listed above in your response.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwise_core::taxonomy::categories_from_labels;
    use budgetwise_core::{FinancialGoal, Profile, PurchaseGoal};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn request(purchase: Option<PurchaseGoal>) -> AdvisorRequest {
        let cats = categories_from_labels(&["Food & Dining", "Travel", "Investments"]);
        AdvisorRequest {
            profile: Profile::new(85000.0, cats, 20.0, true, FinancialGoal::MajorPurchase, "Salaried Employee"),
            purchase,
            notes: String::new(),
            currency_symbol: "₹".to_string(),
        }
    }

    #[test]
    fn test_profile_lines() {
        let p = build_budget_prompt(&request(None), today());
        assert!(p.contains("- Monthly income: ₹ 85,000.00\n"));
        assert!(p.contains("- Primary financial goal: Save for major purchase\n"));
        assert!(p.contains("- Desired savings rate: 20%\n"));
        assert!(p.contains("- Has significant debt: Yes\n"));
        assert!(p.contains("- Planning major purchase soon: No\n"));
        assert!(p.contains("Food & Dining, Travel, Investments"));
        assert!(!p.contains("Saving for:"));
        assert!(!p.contains("Additional context"));
    }

    #[test]
    fn test_purchase_block_and_notes() {
        let deadline = today() + chrono::Duration::days(180);
        let mut req = request(Some(PurchaseGoal::new("Laptop", 60000.0, deadline)));
        req.notes = "Rent is fixed at 20k".to_string();
        let p = build_budget_prompt(&req, today());
        assert!(p.contains("- Saving for: Laptop\n"));
        assert!(p.contains("- Estimated cost: ₹ 60,000.00\n"));
        assert!(p.contains("- Target date: 2027-04-17 (180 days from now)\n"));
        assert!(p.contains("- Timeline: Approximately 6 months\n"));
        assert!(p.contains("- Additional context: Rent is fixed at 20k\n"));
        assert!(p.contains("\"savings_plan\": {"));
    }
}
