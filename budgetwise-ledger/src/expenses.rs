//! Expense log stored as CSV.
//!
//! Columns: Date,Category,Amount,Notes (dates are YYYY-MM-DD).

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Notes"];

/// A single logged expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub notes: String,
}

impl Expense {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: f64, notes: impl Into<String>) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            notes: notes.into(),
        }
    }
}

/// Parse an expense log file. A missing file is an empty log.
pub fn parse_expenses_csv(path: impl AsRef<Path>) -> Result<Vec<Expense>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_expenses_reader(file).with_context(|| format!("parsing {}", path.display()))
}

/// Parse expenses from any reader, skipping blank and unparseable rows.
pub fn parse_expenses_reader(reader: impl Read) -> Result<Vec<Expense>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut expenses = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let date_str = record.get(0).unwrap_or("");
        if date_str.is_empty() || date_str == HEADER[0] {
            continue;
        }

        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            tracing::debug!(line = line + 1, date = date_str, "skipping row with bad date");
            continue;
        };
        let Ok(amount) = record.get(2).unwrap_or("").parse::<f64>() else {
            tracing::debug!(line = line + 1, "skipping row with bad amount");
            continue;
        };

        expenses.push(Expense {
            date,
            category: record.get(1).unwrap_or("Other").to_string(),
            amount,
            notes: record.get(3).unwrap_or("").to_string(),
        });
    }

    Ok(expenses)
}

/// Append one expense, writing the header first when the file is new.
pub fn append_expense(path: impl AsRef<Path>, expense: &Expense) -> Result<()> {
    let path = path.as_ref();
    let is_new = !path.exists() || std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);

    if is_new {
        wtr.write_record(HEADER)?;
    }
    wtr.write_record([
        expense.date.format("%Y-%m-%d").to_string(),
        expense.category.clone(),
        format!("{:.2}", expense.amount),
        expense.notes.clone(),
    ])?;
    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Expenses dated within the last `days` days, newest first
pub fn recent(expenses: &[Expense], today: NaiveDate, days: i64) -> Vec<Expense> {
    let since = today - Duration::days(days);
    let mut out: Vec<Expense> = expenses
        .iter()
        .filter(|e| e.date >= since && e.date <= today)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

/// First day of `date`'s month and first day of the following month
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    (first, next.unwrap_or(first + Duration::days(31)))
}

/// History period filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    Last30Days,
    Last90Days,
    ThisMonth,
    LastMonth,
    ThisYear,
    AllTime,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::Last30Days,
        Period::Last90Days,
        Period::ThisMonth,
        Period::LastMonth,
        Period::ThisYear,
        Period::AllTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Last30Days => "Last 30 Days",
            Period::Last90Days => "Last 90 Days",
            Period::ThisMonth => "This Month",
            Period::LastMonth => "Last Month",
            Period::ThisYear => "This Year",
            Period::AllTime => "All Time",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Period::Last30Days => "last-30-days",
            Period::Last90Days => "last-90-days",
            Period::ThisMonth => "this-month",
            Period::LastMonth => "last-month",
            Period::ThisYear => "this-year",
            Period::AllTime => "all-time",
        }
    }

    /// Open-ended periods have no upper bound, so future-dated rows stay visible
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::Last30Days => date >= today - Duration::days(30),
            Period::Last90Days => date >= today - Duration::days(90),
            Period::ThisMonth => date >= month_bounds(today).0,
            Period::LastMonth => {
                let (this_month, _) = month_bounds(today);
                let (last_month, _) = month_bounds(this_month - Duration::days(1));
                date >= last_month && date < this_month
            }
            Period::ThisYear => date.year() >= today.year(),
            Period::AllTime => true,
        }
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        for p in Period::ALL {
            if p.alias().eq_ignore_ascii_case(needle) || p.label().eq_ignore_ascii_case(needle) {
                return Ok(p);
            }
        }
        bail!(
            "unknown period '{}' (expected one of: {})",
            needle,
            Period::ALL.map(|p| p.alias()).join(", ")
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "highest" => Ok(SortOrder::Highest),
            "lowest" => Ok(SortOrder::Lowest),
            other => bail!("unknown sort order '{other}' (expected newest, oldest, highest or lowest)"),
        }
    }
}

/// Transaction history query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Exact category label; None keeps all
    pub category: Option<String>,
    pub period: Period,
    pub sort: SortOrder,
}

impl ExpenseFilter {
    pub fn apply(&self, expenses: &[Expense], today: NaiveDate) -> Vec<Expense> {
        let mut out: Vec<Expense> = expenses
            .iter()
            .filter(|e| self.category.as_deref().is_none_or(|c| e.category == c))
            .filter(|e| self.period.contains(e.date, today))
            .cloned()
            .collect();
        sort_expenses(&mut out, self.sort);
        out
    }
}

/// Stable sort, so equal keys keep log order
pub fn sort_expenses(expenses: &mut [Expense], order: SortOrder) {
    match order {
        SortOrder::Newest => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => expenses.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::Highest => expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        SortOrder::Lowest => expenses.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
    }
}

/// Total spent per category
pub fn by_category(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for e in expenses {
        *totals.entry(e.category.clone()).or_insert(0.0) += e.amount;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Category,Amount,Notes
2026-10-01,Food & Dining,42.50,Groceries
2026-10-03,Travel,300,Train tickets

not-a-date,Travel,10,
2026-10-05,Health,abc,Pharmacy
2026-10-07,Food & Dining,17.5
";

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn test_parse_skips_bad_rows() {
        let expenses = parse_expenses_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0], Expense::new(d(1), "Food & Dining", 42.5, "Groceries"));
        assert_eq!(expenses[2].notes, "");
    }

    #[test]
    fn test_by_category() {
        let expenses = parse_expenses_reader(SAMPLE.as_bytes()).unwrap();
        let totals = by_category(&expenses);
        assert_eq!(totals["Food & Dining"], 60.0);
        assert_eq!(totals["Travel"], 300.0);
    }

    fn history() -> Vec<Expense> {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        vec![
            Expense::new(day(2025, 12, 1), "Travel", 900.0, "flight"),
            Expense::new(day(2026, 1, 15), "Food & Dining", 40.0, ""),
            Expense::new(day(2026, 2, 1), "Food & Dining", 25.0, ""),
            Expense::new(day(2026, 2, 28), "Health", 60.0, ""),
            Expense::new(day(2026, 3, 3), "Food & Dining", 15.0, ""),
        ]
    }

    fn today_in_march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn filtered(period: Period) -> Vec<NaiveDate> {
        let f = ExpenseFilter {
            period,
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        f.apply(&history(), today_in_march()).iter().map(|e| e.date).collect()
    }

    #[test]
    fn test_periods() {
        assert_eq!(filtered(Period::Last30Days).len(), 2);
        assert_eq!(filtered(Period::Last90Days).len(), 4);
        assert_eq!(filtered(Period::ThisMonth), vec![NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()]);
        assert_eq!(filtered(Period::LastMonth).len(), 2);
        assert_eq!(filtered(Period::ThisYear).len(), 4);
        assert_eq!(filtered(Period::AllTime).len(), 5);
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let f = ExpenseFilter {
            period: Period::LastMonth,
            ..Default::default()
        };
        let rows = f.apply(&history(), jan);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Travel");
    }

    #[test]
    fn test_category_and_sort_orders() {
        let mut f = ExpenseFilter {
            category: Some("Food & Dining".to_string()),
            period: Period::AllTime,
            sort: SortOrder::Highest,
        };
        let amounts = |f: &ExpenseFilter| -> Vec<f64> {
            f.apply(&history(), today_in_march()).iter().map(|e| e.amount).collect()
        };
        assert_eq!(amounts(&f), vec![40.0, 25.0, 15.0]);
        f.sort = SortOrder::Lowest;
        assert_eq!(amounts(&f), vec![15.0, 25.0, 40.0]);
        f.sort = SortOrder::Newest;
        assert_eq!(amounts(&f), vec![15.0, 25.0, 40.0]);
        f.sort = SortOrder::Oldest;
        assert_eq!(amounts(&f), vec![40.0, 25.0, 15.0]);
    }

    #[test]
    fn test_parse_period_and_sort() {
        assert_eq!("last-month".parse::<Period>().unwrap(), Period::LastMonth);
        assert_eq!("All Time".parse::<Period>().unwrap(), Period::AllTime);
        assert!("fortnight".parse::<Period>().is_err());
        assert_eq!("Highest".parse::<SortOrder>().unwrap(), SortOrder::Highest);
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_month_bounds() {
        let (first, next) = month_bounds(NaiveDate::from_ymd_opt(2026, 12, 17).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn test_recent_window_sorted_newest_first() {
        let expenses = parse_expenses_reader(SAMPLE.as_bytes()).unwrap();
        let window = recent(&expenses, d(8), 5);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].date, d(7));
        assert_eq!(window[1].date, d(3));
    }
}
