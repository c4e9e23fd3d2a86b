//! budgetwise-ledger: expense log, budget vs. spending report, savings goal
//! contributions and tracking achievements

pub mod achievements;
pub mod expenses;
pub mod report;

pub use achievements::{Achievement, ActivityLog};
pub use expenses::{
    append_expense, by_category, month_bounds, parse_expenses_csv, parse_expenses_reader, recent, sort_expenses,
    Expense, ExpenseFilter, Period, SortOrder,
};
pub use report::{
    budget_amounts, month_progress, record_savings_contribution, BudgetReport, CategoryUsage, HealthBand,
};
