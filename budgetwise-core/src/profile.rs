//! Financial profile supplied per request.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::taxonomy::{default_categories, Category};

/// Primary financial goal picked during onboarding
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FinancialGoal {
    #[serde(rename = "Save for emergency fund")]
    EmergencyFund,
    #[serde(rename = "Pay off debt")]
    PayOffDebt,
    #[serde(rename = "Save for major purchase")]
    MajorPurchase,
    #[serde(rename = "Build long-term wealth")]
    LongTermWealth,
    #[serde(rename = "Enjoy life now")]
    EnjoyLifeNow,
    #[serde(rename = "Balance savings and lifestyle")]
    #[default]
    Balance,
}

impl FinancialGoal {
    pub const ALL: [FinancialGoal; 6] = [
        FinancialGoal::EmergencyFund,
        FinancialGoal::PayOffDebt,
        FinancialGoal::MajorPurchase,
        FinancialGoal::LongTermWealth,
        FinancialGoal::EnjoyLifeNow,
        FinancialGoal::Balance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FinancialGoal::EmergencyFund => "Save for emergency fund",
            FinancialGoal::PayOffDebt => "Pay off debt",
            FinancialGoal::MajorPurchase => "Save for major purchase",
            FinancialGoal::LongTermWealth => "Build long-term wealth",
            FinancialGoal::EnjoyLifeNow => "Enjoy life now",
            FinancialGoal::Balance => "Balance savings and lifestyle",
        }
    }

    /// Short alias accepted on the command line
    pub fn alias(&self) -> &'static str {
        match self {
            FinancialGoal::EmergencyFund => "emergency-fund",
            FinancialGoal::PayOffDebt => "pay-off-debt",
            FinancialGoal::MajorPurchase => "major-purchase",
            FinancialGoal::LongTermWealth => "long-term-wealth",
            FinancialGoal::EnjoyLifeNow => "enjoy-life-now",
            FinancialGoal::Balance => "balance",
        }
    }
}

impl fmt::Display for FinancialGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FinancialGoal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        for goal in FinancialGoal::ALL {
            if goal.label().eq_ignore_ascii_case(needle) || goal.alias().eq_ignore_ascii_case(needle) {
                return Ok(goal);
            }
        }
        bail!(
            "unknown financial goal '{}' (expected one of: {})",
            needle,
            FinancialGoal::ALL.map(|g| g.alias()).join(", ")
        )
    }
}

/// Everything the allocation engine needs to know about the user.
///
/// Assembled by the caller and never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Monthly income
    pub income: f64,
    /// Ordered, unique categories
    pub categories: Vec<Category>,
    /// Desired savings rate, 0-100
    pub saving_preference: f64,
    pub has_debt: bool,
    pub financial_goal: FinancialGoal,
    /// Only used in explanation text
    pub life_stage: String,
}

impl Profile {
    /// Create a profile, substituting the default category set when none are given
    pub fn new(
        income: f64,
        categories: Vec<Category>,
        saving_preference: f64,
        has_debt: bool,
        financial_goal: FinancialGoal,
        life_stage: impl Into<String>,
    ) -> Self {
        let mut unique: Vec<Category> = Vec::with_capacity(categories.len());
        for c in categories {
            if !unique.iter().any(|u| u.label == c.label) {
                unique.push(c);
            }
        }
        if unique.is_empty() {
            unique = default_categories();
        }

        Self {
            income,
            categories: unique,
            saving_preference: saving_preference.clamp(0.0, 100.0),
            has_debt,
            financial_goal,
            life_stage: life_stage.into(),
        }
    }

    pub fn category_labels(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.label.clone()).collect()
    }
}

/// A purchase the user is saving towards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseGoal {
    pub item: String,
    pub cost: f64,
    pub deadline: NaiveDate,
}

impl PurchaseGoal {
    pub fn new(item: impl Into<String>, cost: f64, deadline: NaiveDate) -> Self {
        Self {
            item: item.into(),
            cost,
            deadline,
        }
    }

    /// A savings plan is only produced for a named item with a positive cost
    pub fn is_declared(&self) -> bool {
        !self.item.trim().is_empty() && self.cost > 0.0
    }
}
