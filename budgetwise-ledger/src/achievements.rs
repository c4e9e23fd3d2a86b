//! Daily logging streak and badges for expense tracking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Achievement {
    #[serde(rename = "7-Day Streak")]
    WeekStreak,
    #[serde(rename = "30-Day Streak")]
    MonthStreak,
    #[serde(rename = "Expense Tracker")]
    ExpenseTracker,
    #[serde(rename = "Budget Pro")]
    BudgetPro,
    #[serde(rename = "Finance Master")]
    FinanceMaster,
}

impl Achievement {
    pub fn title(&self) -> &'static str {
        match self {
            Achievement::WeekStreak => "7-Day Streak",
            Achievement::MonthStreak => "30-Day Streak",
            Achievement::ExpenseTracker => "Expense Tracker",
            Achievement::BudgetPro => "Budget Pro",
            Achievement::FinanceMaster => "Finance Master",
        }
    }

    fn earned(&self, streak: u32, total_expenses: u32) -> bool {
        match self {
            Achievement::WeekStreak => streak >= 7,
            Achievement::MonthStreak => streak >= 30,
            Achievement::ExpenseTracker => total_expenses >= 5,
            Achievement::BudgetPro => total_expenses >= 20,
            Achievement::FinanceMaster => total_expenses >= 50,
        }
    }
}

const ALL: [Achievement; 5] = [
    Achievement::WeekStreak,
    Achievement::MonthStreak,
    Achievement::ExpenseTracker,
    Achievement::BudgetPro,
    Achievement::FinanceMaster,
];

/// Persisted activity counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    pub streak: u32,
    pub last_active: Option<NaiveDate>,
    pub achievements: Vec<Achievement>,
    pub total_expenses: u32,
}

impl ActivityLog {
    /// Count one expense logged on `today`; returns badges earned by it.
    ///
    /// The streak follows the day an entry is logged, not the expense's own
    /// date, so backdated entries count towards today. A `today` earlier than
    /// the last active day (clock change) is treated as the same day.
    pub fn record_expense(&mut self, today: NaiveDate) -> Vec<Achievement> {
        self.total_expenses += 1;

        self.streak = match self.last_active {
            Some(last) => match (today - last).num_days() {
                ..=0 => self.streak.max(1),
                1 => self.streak + 1,
                _ => 1,
            },
            None => 1,
        };
        self.last_active = Some(self.last_active.map_or(today, |last| last.max(today)));

        let mut new = Vec::new();
        for a in ALL {
            if a.earned(self.streak, self.total_expenses) && !self.achievements.contains(&a) {
                self.achievements.push(a);
                new.push(a);
            }
        }
        new
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let mut log = ActivityLog::default();
        for i in 0..6 {
            assert!(log.record_expense(start() + Duration::days(i)).iter().all(|a| *a != Achievement::WeekStreak));
        }
        let earned = log.record_expense(start() + Duration::days(6));
        assert_eq!(log.streak, 7);
        assert!(earned.contains(&Achievement::WeekStreak));
    }

    #[test]
    fn test_same_day_keeps_streak_and_gap_resets() {
        let mut log = ActivityLog::default();
        log.record_expense(start());
        log.record_expense(start() + Duration::days(1));
        log.record_expense(start() + Duration::days(1));
        assert_eq!(log.streak, 2);

        log.record_expense(start() + Duration::days(5));
        assert_eq!(log.streak, 1);
    }

    #[test]
    fn test_earlier_day_does_not_rewind_streak() {
        let mut log = ActivityLog::default();
        log.record_expense(start());
        log.record_expense(start() + Duration::days(1));
        log.record_expense(start() - Duration::days(3));
        assert_eq!(log.streak, 2);
        assert_eq!(log.last_active, Some(start() + Duration::days(1)));

        log.record_expense(start() + Duration::days(2));
        assert_eq!(log.streak, 3);
    }

    #[test]
    fn test_badges_awarded_once() {
        let mut log = ActivityLog::default();
        let mut earned = Vec::new();
        for _ in 0..20 {
            earned.extend(log.record_expense(start()));
        }
        assert_eq!(earned, vec![Achievement::ExpenseTracker, Achievement::BudgetPro]);
        assert_eq!(log.total_expenses, 20);
    }
}
