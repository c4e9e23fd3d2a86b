//! budgetwise-core: budget allocation engine, savings planner and
//! recommendation validator. Pure functions, no I/O.

pub mod allocation;
pub mod money;
pub mod profile;
pub mod recommendation;
pub mod savings;
pub mod taxonomy;
pub mod validator;

pub use allocation::{
    allocate, review, rule_of_thumb, total_percentage, Allocation, AllocationBalance,
    AllocationResult, AllocationReview, AllocationWarning, Allocations, TypeWeights,
};
pub use money::{format_amount, round_to};
pub use profile::{FinancialGoal, Profile, PurchaseGoal};
pub use recommendation::{heuristic, BudgetRecommendation};
pub use savings::{
    months_until, plan_savings, progress, reallocate_for_savings, GoalProgress, SavingsGoal,
    SavingsPlan, ScheduleStatus,
};
pub use taxonomy::{classify, clean_label, default_categories, BudgetType, Category};
pub use validator::{validate, CandidateRecommendation};
