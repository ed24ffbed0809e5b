//! Date-range statistics over expenses.
//!
//! A [`DateRange`] is a named window ("today", "yesterday", "this week",
//! "this month") that resolves to an inclusive [`Period`] relative to a given
//! day. [`category_totals`] buckets expenses per category name.

use crate::{money, Category, Expense, TallyError};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Error message returned for an unknown range token.
pub const INVALID_RANGE_MESSAGE: &str =
    "Invalid range. Use 'today', 'yesterday', 'this week' or 'this month'";

/// A named statistics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
}

/// An inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Creates a period; `start` must not be after `end`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if `date` falls inside the period, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl DateRange {
    /// Resolves the window relative to `today`.
    ///
    /// Weeks start on Monday. Every window except "yesterday" ends on `today`.
    #[must_use]
    pub fn period(self, today: NaiveDate) -> Period {
        match self {
            Self::Today => Period::new(today, today),
            Self::Yesterday => {
                let yesterday = today.pred_opt().unwrap_or(today);
                Period::new(yesterday, yesterday)
            }
            Self::ThisWeek => {
                let back = u64::from(today.weekday().num_days_from_monday());
                let monday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
                Period::new(monday, today)
            }
            Self::ThisMonth => Period::new(today.with_day(1).unwrap_or(today), today),
        }
    }

    /// Returns the canonical token for this range.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this week",
            Self::ThisMonth => "this month",
        }
    }

    /// Parses an optional query value; a missing or blank value means "all time".
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, TallyError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(token) => token.parse().map(Some),
        }
    }
}

impl FromStr for DateRange {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "this week" => Ok(Self::ThisWeek),
            "this month" => Ok(Self::ThisMonth),
            _ => Err(TallyError::validation(INVALID_RANGE_MESSAGE)),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sums expense amounts per category name.
///
/// Every category appears in the result, with zero when nothing matched.
/// Expenses outside `period` (when given) or of unknown categories are skipped.
#[must_use]
pub fn category_totals(
    categories: &[Category],
    expenses: &[Expense],
    period: Option<Period>,
) -> BTreeMap<String, Decimal> {
    let names: HashMap<_, _> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut totals: BTreeMap<String, Decimal> = categories
        .iter()
        .map(|c| (c.name.clone(), Decimal::ZERO))
        .collect();

    for expense in expenses {
        if period.is_some_and(|p| !p.contains(expense.date)) {
            continue;
        }
        if let Some(name) = names.get(&expense.category_id) {
            if let Some(total) = totals.get_mut(*name) {
                *total += expense.amount;
            }
        }
    }

    totals
}

/// Sums the amounts of the given expenses.
#[must_use]
pub fn total_of(expenses: &[Expense]) -> Decimal {
    money::sum(expenses.iter().map(|e| e.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_tokens_case_insensitively() {
        assert_eq!("today".parse::<DateRange>().unwrap(), DateRange::Today);
        assert_eq!("YESTERDAY".parse::<DateRange>().unwrap(), DateRange::Yesterday);
        assert_eq!("This Week".parse::<DateRange>().unwrap(), DateRange::ThisWeek);
        assert_eq!(" this  month ".parse::<DateRange>().unwrap(), DateRange::ThisMonth);
        assert_eq!("this_week".parse::<DateRange>().unwrap(), DateRange::ThisWeek);
        assert_eq!("this-month".parse::<DateRange>().unwrap(), DateRange::ThisMonth);
    }

    #[test]
    fn test_parse_invalid_token() {
        let err = "last year".parse::<DateRange>().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), INVALID_RANGE_MESSAGE);
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(DateRange::parse_optional(None).unwrap(), None);
        assert_eq!(DateRange::parse_optional(Some("  ")).unwrap(), None);
        assert_eq!(DateRange::parse_optional(Some("today")).unwrap(), Some(DateRange::Today));
        assert!(DateRange::parse_optional(Some("tomorrow")).is_err());
    }

    #[test]
    fn test_today_and_yesterday() {
        let today = date(2024, 3, 1);
        assert_eq!(DateRange::Today.period(today), Period::new(today, today));
        let yesterday = date(2024, 2, 29);
        assert_eq!(DateRange::Yesterday.period(today), Period::new(yesterday, yesterday));
    }

    #[test]
    fn test_this_week_starts_on_monday() {
        // 2024-05-16 is a Thursday.
        let period = DateRange::ThisWeek.period(date(2024, 5, 16));
        assert_eq!(period, Period::new(date(2024, 5, 13), date(2024, 5, 16)));

        let monday = date(2024, 5, 13);
        assert_eq!(DateRange::ThisWeek.period(monday), Period::new(monday, monday));
    }

    #[test]
    fn test_this_week_crosses_month_boundary() {
        // 2024-10-02 is a Wednesday; its week began on 2024-09-30.
        let period = DateRange::ThisWeek.period(date(2024, 10, 2));
        assert_eq!(period.start, date(2024, 9, 30));
    }

    #[test]
    fn test_this_month() {
        let period = DateRange::ThisMonth.period(date(2024, 5, 16));
        assert_eq!(period, Period::new(date(2024, 5, 1), date(2024, 5, 16)));
    }

    #[test]
    fn test_period_contains_bounds() {
        let period = Period::new(date(2024, 5, 1), date(2024, 5, 16));
        assert!(period.contains(date(2024, 5, 1)));
        assert!(period.contains(date(2024, 5, 16)));
        assert!(!period.contains(date(2024, 4, 30)));
        assert!(!period.contains(date(2024, 5, 17)));
    }

    #[test]
    fn test_category_totals_within_period() {
        let owner = UserId::new();
        let food = Category::new(owner, "Food".into(), "food".into(), None);
        let rent = Category::new(owner, "Rent".into(), "rent".into(), None);
        let fun = Category::new(owner, "Fun".into(), "fun".into(), None);
        let expenses = vec![
            Expense::new(owner, food.id, dec!(10.50), "lunch".into(), date(2024, 5, 15)),
            Expense::new(owner, food.id, dec!(4.25), "coffee".into(), date(2024, 5, 16)),
            Expense::new(owner, food.id, dec!(99.00), "old dinner".into(), date(2024, 4, 2)),
            Expense::new(owner, rent.id, dec!(800.00), "may rent".into(), date(2024, 5, 1)),
        ];

        let period = DateRange::ThisMonth.period(date(2024, 5, 16));
        let totals = category_totals(&[food, rent, fun], &expenses, Some(period));

        assert_eq!(totals["Food"], dec!(14.75));
        assert_eq!(totals["Rent"], dec!(800.00));
        assert_eq!(totals["Fun"], Decimal::ZERO);
    }

    #[test]
    fn test_category_totals_all_time() {
        let owner = UserId::new();
        let food = Category::new(owner, "Food".into(), "food".into(), None);
        let expenses = vec![
            Expense::new(owner, food.id, dec!(1.00), "a".into(), date(2020, 1, 1)),
            Expense::new(owner, food.id, dec!(2.00), "b".into(), date(2024, 1, 1)),
        ];

        let totals = category_totals(&[food], &expenses, None);
        assert_eq!(totals["Food"], dec!(3.00));
        assert_eq!(total_of(&expenses), dec!(3.00));
    }
}
