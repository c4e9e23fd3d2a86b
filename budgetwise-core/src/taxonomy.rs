//! Category taxonomy: the five canonical budget types and the static table
//! mapping user-facing category labels onto them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical budget type every category rolls up into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BudgetType {
    #[serde(rename = "Essentials")]
    Essentials,
    #[serde(rename = "Lifestyle")]
    Lifestyle,
    #[serde(rename = "Savings & Investments")]
    SavingsInvestments,
    #[serde(rename = "Debt & EMIs")]
    DebtEmis,
    #[serde(rename = "Other / Subscriptions")]
    OtherSubscriptions,
}

impl BudgetType {
    pub const ALL: [BudgetType; 5] = [
        BudgetType::Essentials,
        BudgetType::Lifestyle,
        BudgetType::SavingsInvestments,
        BudgetType::DebtEmis,
        BudgetType::OtherSubscriptions,
    ];

    /// Display label, which is also the name of the type's own category
    pub fn label(&self) -> &'static str {
        match self {
            BudgetType::Essentials => "Essentials",
            BudgetType::Lifestyle => "Lifestyle",
            BudgetType::SavingsInvestments => "Savings & Investments",
            BudgetType::DebtEmis => "Debt & EMIs",
            BudgetType::OtherSubscriptions => "Other / Subscriptions",
        }
    }

    /// Labels the static table maps onto this type
    pub fn members(&self) -> &'static [&'static str] {
        match self {
            BudgetType::Essentials => &["Essentials", "Food & Dining", "Transportation", "Health"],
            BudgetType::Lifestyle => &["Lifestyle", "Entertainment", "Shopping", "Travel"],
            BudgetType::SavingsInvestments => &["Savings & Investments", "Investments"],
            BudgetType::DebtEmis => &["Debt & EMIs"],
            BudgetType::OtherSubscriptions => &[
                "Other / Subscriptions",
                "Subscriptions",
                "Gifts & Donations",
                "Education",
            ],
        }
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a category label to its canonical type.
/// Exact, case-sensitive lookup; anything unknown is Other / Subscriptions.
pub fn classify(label: &str) -> BudgetType {
    BudgetType::ALL
        .into_iter()
        .find(|t| t.members().contains(&label))
        .unwrap_or(BudgetType::OtherSubscriptions)
}

/// A user category tagged with its canonical type at selection time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    pub label: String,
    pub budget_type: BudgetType,
}

impl Category {
    /// Create a category, classifying the label once
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let budget_type = classify(&label);
        Self { label, budget_type }
    }

    pub fn is_savings(&self) -> bool {
        self.budget_type == BudgetType::SavingsInvestments
    }

    pub fn is_lifestyle(&self) -> bool {
        self.budget_type == BudgetType::Lifestyle
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::new(label)
    }
}

/// Build tagged categories from plain labels
pub fn categories_from_labels<S: AsRef<str>>(labels: &[S]) -> Vec<Category> {
    labels.iter().map(|l| Category::new(l.as_ref())).collect()
}

/// Fallback set used when a profile declares no categories
pub fn default_categories() -> Vec<Category> {
    BudgetType::ALL.iter().map(|t| Category::new(t.label())).collect()
}

/// Onboarding pick-list, as presented to the user
pub fn suggested_categories() -> &'static [&'static str] {
    &[
        "🏠 Essentials (Rent, Utilities)",
        "🚌 Transportation",
        "🍔 Food & Dining",
        "🎬 Entertainment",
        "🛍️ Shopping",
        "💊 Health",
        "📚 Education",
        "📱 Subscriptions",
        "💸 Investments",
        "🎁 Gifts & Donations",
        "✈️ Travel",
    ]
}

/// Strip a leading emoji token and a trailing "(...)" hint from a pick-list label.
pub fn clean_label(raw: &str) -> String {
    let mut s = raw.trim();

    if let Some((first, rest)) = s.split_once(char::is_whitespace) {
        if !first.chars().any(char::is_alphanumeric) {
            s = rest.trim_start();
        }
    }

    if s.ends_with(')') {
        if let Some(open) = s.rfind('(') {
            let head = s[..open].trim_end();
            if !head.is_empty() {
                s = head;
            }
        }
    }

    s.to_string()
}

/// Short description of what a category covers
pub fn description(label: &str) -> &'static str {
    match label {
        "Essentials" => "Rent/mortgage, utilities, groceries, transportation",
        "Food & Dining" => "Groceries, restaurants, food delivery",
        "Transportation" => "Public transport, fuel, vehicle maintenance",
        "Entertainment" => "Movies, events, hobbies",
        "Shopping" => "Clothing, electronics, personal items",
        "Health" => "Medical expenses, insurance, fitness",
        "Education" => "Courses, books, tuition",
        "Subscriptions" => "Streaming services, memberships, apps",
        "Investments" => "Stocks, mutual funds, retirement",
        "Gifts & Donations" => "Presents, charitable donations",
        "Travel" => "Vacations, trips, accommodations",
        "Lifestyle" => "Dining out, entertainment, shopping, hobbies",
        "Savings & Investments" => "Emergency fund, retirement, investments",
        "Debt & EMIs" => "Loan payments, credit card debt, EMIs",
        "Other / Subscriptions" => "Streaming services, memberships, miscellaneous",
        _ => "Miscellaneous expenses",
    }
}

/// Reasoning shown next to a heuristic allocation
pub fn explanation(label: &str, life_stage: &str, saving_preference: f64) -> String {
    match label {
        "Essentials" => format!(
            "This allocation covers your basic needs based on your {life_stage} life stage."
        ),
        "Food & Dining" => "This covers groceries and occasional dining out.".to_string(),
        "Transportation" => "Covers your regular transport costs with some flexibility.".to_string(),
        "Health" => "Health is essential for stability.".to_string(),
        "Lifestyle" => "Lets you enjoy life within limits.".to_string(),
        "Entertainment" => "Entertainment to recharge yourself.".to_string(),
        "Shopping" => "Encourages smart spending habits.".to_string(),
        "Travel" => "Allows budget-conscious exploration.".to_string(),
        "Savings & Investments" => format!(
            "This {saving_preference}% savings rate helps build your financial future."
        ),
        "Investments" => "Helps grow your wealth.".to_string(),
        "Debt & EMIs" => "Reducing debt enhances future flexibility.".to_string(),
        "Other / Subscriptions" => "Covers various miscellaneous expenses.".to_string(),
        "Subscriptions" => "Manage your recurring digital expenses.".to_string(),
        "Gifts & Donations" => "For giving back, wisely.".to_string(),
        "Education" => "Boosts your career and learning.".to_string(),
        _ => format!("This allocation is suited to your {life_stage} life stage."),
    }
}

/// Two practical tips per category
pub fn tips(label: &str) -> Vec<String> {
    let pair: [&str; 2] = match label {
        "Essentials" => ["Bundle services to cut utility costs", "Buy groceries in bulk"],
        "Food & Dining" => ["Limit eating out", "Meal prep to save money"],
        "Transportation" => ["Use public transport", "Maintain your vehicle"],
        "Health" => ["Use preventive care", "Check employer health benefits"],
        "Lifestyle" => ["Set a 'fun budget'", "Look for free events"],
        "Savings & Investments" => ["Automate savings", "Use tax-saving accounts"],
        "Debt & EMIs" => ["Pay high-interest debt first", "Consider refinancing"],
        "Other / Subscriptions" => ["Audit quarterly", "Cancel unused ones"],
        "Education" => ["Use free resources", "Check for online course discounts"],
        _ => [
            "Track this category monthly",
            "Look for ways to reduce recurring costs",
        ],
    };
    pair.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_labels() {
        assert_eq!(classify("Food & Dining"), BudgetType::Essentials);
        assert_eq!(classify("Travel"), BudgetType::Lifestyle);
        assert_eq!(classify("Investments"), BudgetType::SavingsInvestments);
        assert_eq!(classify("Debt & EMIs"), BudgetType::DebtEmis);
        assert_eq!(classify("Education"), BudgetType::OtherSubscriptions);
    }

    #[test]
    fn test_classify_is_total() {
        assert_eq!(classify("Pet Care"), BudgetType::OtherSubscriptions);
        assert_eq!(classify(""), BudgetType::OtherSubscriptions);
        // case-sensitive
        assert_eq!(classify("travel"), BudgetType::OtherSubscriptions);
    }

    #[test]
    fn test_every_type_owns_its_label() {
        for t in BudgetType::ALL {
            assert_eq!(classify(t.label()), t);
        }
    }

    #[test]
    fn test_clean_label() {
        assert_eq!(clean_label("🏠 Essentials (Rent, Utilities)"), "Essentials");
        assert_eq!(clean_label("🍔 Food & Dining"), "Food & Dining");
        assert_eq!(clean_label("✈️ Travel"), "Travel");
        assert_eq!(clean_label("Food & Dining"), "Food & Dining");
        assert_eq!(clean_label("  Health "), "Health");
    }

    #[test]
    fn test_suggested_categories_classify_after_cleaning() {
        for raw in suggested_categories() {
            let label = clean_label(raw);
            assert_ne!(description(&label), "Miscellaneous expenses", "{label}");
        }
    }

    #[test]
    fn test_default_categories() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 5);
        assert!(defaults.iter().any(Category::is_savings));
        assert_eq!(defaults[3].budget_type, BudgetType::DebtEmis);
    }

    #[test]
    fn test_tips_fallback() {
        assert_eq!(tips("Pet Care")[0], "Track this category monthly");
        assert_eq!(tips("Health").len(), 2);
    }
}
