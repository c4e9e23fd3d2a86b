use serde::{Deserialize, Serialize};

/// The four onboarding screens, in order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OnboardStep {
    PersonalInfo,
    Income,
    Categories,
    Budget,
}

impl OnboardStep {
    pub const ALL: [OnboardStep; 4] = [
        OnboardStep::PersonalInfo,
        OnboardStep::Income,
        OnboardStep::Categories,
        OnboardStep::Budget,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            OnboardStep::PersonalInfo => "Personal Info",
            OnboardStep::Income => "Income",
            OnboardStep::Categories => "Categories",
            OnboardStep::Budget => "Budget",
        }
    }

    /// 1-based position
    pub fn number(&self) -> usize {
        OnboardStep::ALL.iter().position(|s| s == self).map_or(0, |i| i + 1)
    }
}

/// Onboarding sufficiency check: ask for the first missing piece until the
/// profile can be saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnboardDecision {
    /// None once everything has been collected
    pub next_step: Option<OnboardStep>,
    pub assistant_message: String,
}

#[derive(Debug, Clone, Default)]
pub struct OnboardState {
    pub name: Option<String>,
    pub user_type: Option<String>,
    pub income: Option<f64>,
    pub currency: Option<String>,
    pub categories: Vec<String>,
    pub budget_chosen: bool,
}

fn ask(step: OnboardStep, message: &str) -> OnboardDecision {
    OnboardDecision {
        next_step: Some(step),
        assistant_message: message.to_string(),
    }
}

pub fn decide_next_step(state: &OnboardState) -> OnboardDecision {
    let blank = |s: &Option<String>| s.as_deref().unwrap_or("").trim().is_empty();

    if blank(&state.name) || blank(&state.user_type) {
        return ask(OnboardStep::PersonalInfo, "Tell us about yourself: your name and what best describes you.");
    }

    if !state.income.is_some_and(|i| i > 0.0) || blank(&state.currency) {
        return ask(OnboardStep::Income, "What is your monthly income, and in which currency?");
    }

    if state.categories.is_empty() {
        return ask(OnboardStep::Categories, "Select the spending categories relevant to your lifestyle.");
    }

    if !state.budget_chosen {
        return ask(
            OnboardStep::Budget,
            "How would you like to set up your budget? Quick setup (50/30/20), a recommendation, or skip for now.",
        );
    }

    OnboardDecision {
        next_step: None,
        assistant_message: "You're all set. Your profile and budget are saved.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> OnboardState {
        OnboardState {
            name: Some("Ravi".to_string()),
            user_type: Some("Freelancer".to_string()),
            income: Some(60000.0),
            currency: Some("₹ INR".to_string()),
            categories: vec!["Food & Dining".to_string()],
            budget_chosen: true,
        }
    }

    #[test]
    fn test_steps_in_order() {
        let mut state = OnboardState::default();
        assert_eq!(decide_next_step(&state).next_step, Some(OnboardStep::PersonalInfo));

        state.name = Some("Ravi".to_string());
        state.user_type = Some("Freelancer".to_string());
        assert_eq!(decide_next_step(&state).next_step, Some(OnboardStep::Income));

        state.income = Some(60000.0);
        state.currency = Some("₹ INR".to_string());
        assert_eq!(decide_next_step(&state).next_step, Some(OnboardStep::Categories));

        state.categories.push("Travel".to_string());
        assert_eq!(decide_next_step(&state).next_step, Some(OnboardStep::Budget));

        state.budget_chosen = true;
        assert_eq!(decide_next_step(&state).next_step, None);
    }

    #[test]
    fn test_blank_name_and_zero_income_are_missing() {
        let mut state = complete();
        state.name = Some("   ".to_string());
        assert_eq!(decide_next_step(&state).next_step, Some(OnboardStep::PersonalInfo));

        let mut state = complete();
        state.income = Some(0.0);
        assert_eq!(decide_next_step(&state).next_step, Some(OnboardStep::Income));
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(OnboardStep::PersonalInfo.number(), 1);
        assert_eq!(OnboardStep::Budget.number(), 4);
        assert_eq!(OnboardStep::Categories.title(), "Categories");
    }
}
