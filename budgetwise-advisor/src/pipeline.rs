//! Generated-first recommendation with a heuristic fallback.
//!
//! Whatever the source returns goes through the validator; if the source is
//! absent or fails, the heuristic engine's output goes through it instead.

use budgetwise_core::{heuristic, validate, BudgetRecommendation, CandidateRecommendation, Profile, PurchaseGoal};
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;

use crate::error::AdvisorError;

/// What the advisor is asked to budget for
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorRequest {
    pub profile: Profile,
    pub purchase: Option<PurchaseGoal>,
    /// Free-form context passed through to the model
    pub notes: String,
    pub currency_symbol: String,
}

/// Anything that can produce a candidate recommendation as raw JSON
pub trait CandidateSource {
    fn fetch(&self, request: &AdvisorRequest, today: NaiveDate) -> Result<Value, AdvisorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Generated,
    Heuristic,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Origin::Generated => "generated",
            Origin::Heuristic => "heuristic",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub recommendation: BudgetRecommendation,
    pub origin: Origin,
}

/// Produce a validated recommendation. Never fails.
pub fn recommend(source: Option<&dyn CandidateSource>, request: &AdvisorRequest, today: NaiveDate) -> Advice {
    let profile = &request.profile;
    let labels = profile.category_labels();
    let purchase = request.purchase.as_ref().filter(|p| p.is_declared());

    if let Some(source) = source {
        match source.fetch(request, today) {
            Ok(value) if value.is_object() => {
                let candidate = CandidateRecommendation::from_json(&value, profile.income);
                return Advice {
                    recommendation: validate(candidate, &labels, profile.income, purchase, today),
                    origin: Origin::Generated,
                };
            }
            Ok(_) => tracing::warn!("model returned a non-object value; using heuristic budget"),
            Err(e) => tracing::warn!(error = %e, "generated recommendation unavailable; using heuristic budget"),
        }
    }

    let rec = heuristic(profile, purchase, today);
    Advice {
        recommendation: validate(rec.into(), &labels, profile.income, purchase, today),
        origin: Origin::Heuristic,
    }
}
