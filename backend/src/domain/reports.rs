//! Filter/aggregate engine.
//!
//! Pure functions that derive display-ready subsets and summary statistics
//! from in-memory record lists. One generic engine serves expenses, income,
//! and anything else carrying an amount, a category key, and a date, instead
//! of near-identical per-page copies of the same logic.

use chrono::{Datelike, Duration, NaiveDate};
use shared::{
    category_color, category_label, parse_record_date, CategoryDef, CategoryTotal, Expense,
    FinancialTotals, Income, MonthlyBucket,
};

/// Sentinel category filter value meaning "no filtering"
pub const CATEGORY_ALL: &str = "all";

/// A record the engine can filter and aggregate
pub trait ReportRecord {
    fn amount(&self) -> f64;
    fn category_key(&self) -> &str;
    fn date_str(&self) -> &str;

    /// Normalized record date; None when missing or unparseable
    fn record_date(&self) -> Option<NaiveDate> {
        parse_record_date(self.date_str())
    }
}

impl ReportRecord for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
    fn category_key(&self) -> &str {
        &self.category
    }
    fn date_str(&self) -> &str {
        &self.date
    }
}

impl ReportRecord for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
    fn category_key(&self) -> &str {
        &self.source
    }
    fn date_str(&self) -> &str {
        &self.date
    }
}

/// A date window for filtering. Named ranges resolve against an explicit
/// `today` so callers (and tests) control what "now" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// Calendar-month bounds of `today`
    ThisMonth,
    /// Rolling window: the 30 days up to and including `today`
    Last30Days,
    /// Rolling window: the 90 days up to and including `today`
    Last90Days,
    /// No filtering at all; records with bad dates are kept too
    AllTime,
    /// Explicit inclusive bounds
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Parse a range from query-style parameters. A missing kind means all
    /// time; a custom range requires both parseable bounds.
    pub fn from_params(
        kind: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, String> {
        match kind.unwrap_or("all_time") {
            "this_month" => Ok(DateRange::ThisMonth),
            "last_30_days" => Ok(DateRange::Last30Days),
            "last_90_days" => Ok(DateRange::Last90Days),
            "all_time" => Ok(DateRange::AllTime),
            "custom" => {
                let start = start
                    .and_then(parse_record_date)
                    .ok_or_else(|| "Custom range requires a valid start date".to_string())?;
                let end = end
                    .and_then(parse_record_date)
                    .ok_or_else(|| "Custom range requires a valid end date".to_string())?;
                Ok(DateRange::Custom { start, end })
            }
            other => Err(format!("Unknown date range: {}", other)),
        }
    }

    /// Inclusive bounds for this range, or None when no filtering applies
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            DateRange::ThisMonth => {
                let start = today.with_day(1)?;
                let end = last_day_of_month(today);
                Some((start, end))
            }
            DateRange::Last30Days => Some((today - Duration::days(30), today)),
            DateRange::Last90Days => Some((today - Duration::days(90), today)),
            DateRange::AllTime => None,
            DateRange::Custom { start, end } => Some((*start, *end)),
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // First of the following month always exists
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|d| d - Duration::days(1))
        .unwrap_or(date)
}

/// Non-finite amounts contribute zero to every sum, never an error
fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Keep records whose category key equals `category`; the sentinel "all"
/// returns the input unchanged.
pub fn filter_by_category<T: ReportRecord + Clone>(records: &[T], category: &str) -> Vec<T> {
    if category == CATEGORY_ALL {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.category_key() == category)
        .cloned()
        .collect()
}

/// Keep records whose date falls inside the range (bounds inclusive).
/// Records with a missing or unparseable date are excluded rather than
/// erroring, except under `AllTime` which performs no filtering.
pub fn filter_by_date_range<T: ReportRecord + Clone>(
    records: &[T],
    range: DateRange,
    today: NaiveDate,
) -> Vec<T> {
    let Some((start, end)) = range.bounds(today) else {
        return records.to_vec();
    };
    records
        .iter()
        .filter(|r| match r.record_date() {
            Some(date) => date >= start && date <= end,
            None => false,
        })
        .cloned()
        .collect()
}

/// Stable newest-first ordering; ties keep original order and undated
/// records sort last.
pub fn sort_by_date_descending<T: ReportRecord + Clone>(records: &[T]) -> Vec<T> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| match (a.record_date(), b.record_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    sorted
}

/// Sum and count records per category. Known categories come first in
/// definition order; unknown keys are preserved afterwards in first-seen
/// order with fallback labels. Zero-total buckets are dropped unless
/// `include_zero`.
pub fn aggregate_by_category<T: ReportRecord>(
    records: &[T],
    known: &[CategoryDef],
    include_zero: bool,
) -> Vec<CategoryTotal> {
    let mut keys: Vec<&str> = known.iter().map(|d| d.key).collect();
    for record in records {
        let key = record.category_key();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.into_iter()
        .map(|key| {
            let mut total = 0.0;
            let mut count = 0;
            for record in records.iter().filter(|r| r.category_key() == key) {
                total += sanitize_amount(record.amount());
                count += 1;
            }
            CategoryTotal {
                key: key.to_string(),
                label: category_label(known, key),
                color: category_color(known, key).to_string(),
                total,
                count,
            }
        })
        .filter(|bucket| include_zero || bucket.total != 0.0)
        .collect()
}

/// Overall totals for a period. Profit margin is net profit as a percentage
/// of income, defined as 0.0 when total income is 0 rather than NaN.
pub fn compute_totals<I: ReportRecord, E: ReportRecord>(
    income: &[I],
    expenses: &[E],
) -> FinancialTotals {
    let total_income: f64 = income.iter().map(|r| sanitize_amount(r.amount())).sum();
    let total_expenses: f64 = expenses.iter().map(|r| sanitize_amount(r.amount())).sum();
    let net_profit = total_income - total_expenses;
    let profit_margin = if total_income == 0.0 {
        0.0
    } else {
        net_profit / total_income * 100.0
    };
    FinancialTotals {
        total_income,
        total_expenses,
        net_profit,
        profit_margin,
    }
}

/// Group records into the 12 calendar-month buckets of `year`, summing
/// amounts per bucket. Records outside the year or without a valid date are
/// ignored.
pub fn bucket_by_month<T: ReportRecord>(records: &[T], year: i32) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = (1..=12)
        .map(|month| MonthlyBucket {
            month,
            total: 0.0,
            count: 0,
        })
        .collect();

    for record in records {
        if let Some(date) = record.record_date() {
            if date.year() == year {
                let bucket = &mut buckets[date.month0() as usize];
                bucket.total += sanitize_amount(record.amount());
                bucket.count += 1;
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EXPENSE_CATEGORIES;

    fn expense(id: u64, category: &str, amount: f64, date: &str) -> Expense {
        Expense {
            id: Expense::generate_id(id),
            farm_id: "farm::1".to_string(),
            category: category.to_string(),
            amount,
            date: date.to_string(),
            description: "test".to_string(),
        }
    }

    fn income_record(id: u64, amount: f64, date: &str) -> Income {
        Income {
            id: Income::generate_id(id),
            description: "test".to_string(),
            amount,
            date: date.to_string(),
            source: "crop_sales".to_string(),
            crop_id: None,
            farm_id: None,
            notes: String::new(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_by_category_matches_only_that_category() {
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "2024-03-15"),
            expense(3, "seeds", 25.0, "2024-04-01"),
        ];

        let seeds = filter_by_category(&records, "seeds");
        assert_eq!(seeds.len(), 2);
        assert!(seeds.iter().all(|e| e.category == "seeds"));

        // "all" returns the list unchanged
        let all = filter_by_category(&records, CATEGORY_ALL);
        assert_eq!(all, records);
    }

    #[test]
    fn test_filter_this_month_uses_calendar_bounds() {
        let today = day(2024, 3, 20);
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "2024-03-31"),
            expense(3, "labor", 75.0, "2024-02-29"),
            expense(4, "fuel", 10.0, "2024-04-01"),
        ];

        let filtered = filter_by_date_range(&records, DateRange::ThisMonth, today);
        assert_eq!(filtered.len(), 2);
        // Bound checks are inclusive: the 1st and the 31st both survive
        assert_eq!(filtered[0].date, "2024-03-01");
        assert_eq!(filtered[1].date, "2024-03-31");
    }

    #[test]
    fn test_filter_rolling_windows_are_inclusive() {
        let today = day(2024, 3, 31);
        let records = vec![
            expense(1, "seeds", 1.0, "2024-03-01"), // exactly 30 days before
            expense(2, "seeds", 1.0, "2024-02-29"), // 31 days before
            expense(3, "seeds", 1.0, "2024-03-31"), // today
        ];

        let filtered = filter_by_date_range(&records, DateRange::Last30Days, today);
        assert_eq!(filtered.len(), 2);

        let filtered = filter_by_date_range(&records, DateRange::Last90Days, today);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filter_excludes_invalid_dates_except_all_time() {
        let today = day(2024, 3, 20);
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "not a date"),
            expense(3, "labor", 75.0, ""),
        ];

        let filtered = filter_by_date_range(&records, DateRange::ThisMonth, today);
        assert_eq!(filtered.len(), 1);

        // all_time performs no filtering at all
        let all = filter_by_date_range(&records, DateRange::AllTime, today);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_date_filter_is_idempotent() {
        let today = day(2024, 3, 20);
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "2024-02-01"),
            expense(3, "labor", 75.0, "2024-03-19"),
        ];

        let once = filter_by_date_range(&records, DateRange::ThisMonth, today);
        let twice = filter_by_date_range(&once, DateRange::ThisMonth, today);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_range_bounds_inclusive() {
        let today = day(2024, 6, 1);
        let range = DateRange::Custom {
            start: day(2024, 3, 1),
            end: day(2024, 3, 15),
        };
        let records = vec![
            expense(1, "seeds", 1.0, "2024-03-01"),
            expense(2, "seeds", 1.0, "2024-03-15"),
            expense(3, "seeds", 1.0, "2024-03-16"),
        ];
        let filtered = filter_by_date_range(&records, range, today);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_date_range_from_params() {
        assert_eq!(
            DateRange::from_params(Some("this_month"), None, None),
            Ok(DateRange::ThisMonth)
        );
        assert_eq!(
            DateRange::from_params(None, None, None),
            Ok(DateRange::AllTime)
        );
        assert_eq!(
            DateRange::from_params(Some("custom"), Some("2024-03-01"), Some("2024-03-15")),
            Ok(DateRange::Custom {
                start: day(2024, 3, 1),
                end: day(2024, 3, 15),
            })
        );
        assert!(DateRange::from_params(Some("custom"), Some("2024-03-01"), None).is_err());
        assert!(DateRange::from_params(Some("last_week"), None, None).is_err());
    }

    #[test]
    fn test_sort_by_date_descending_is_stable() {
        let records = vec![
            expense(1, "seeds", 1.0, "2024-03-01"),
            expense(2, "fuel", 2.0, "2024-03-15"),
            expense(3, "labor", 3.0, "2024-03-01"), // tie with first
            expense(4, "other", 4.0, "bad date"),
        ];

        let sorted = sort_by_date_descending(&records);
        assert_eq!(sorted[0].date, "2024-03-15");
        // Tied dates keep original relative order
        assert_eq!(sorted[1].amount, 1.0);
        assert_eq!(sorted[2].amount, 3.0);
        // Undated records sort last
        assert_eq!(sorted[3].date, "bad date");
    }

    #[test]
    fn test_aggregate_by_category_conservation() {
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "2024-03-15"),
            expense(3, "seeds", 25.0, "2024-03-20"),
            expense(4, "drone_rental", 10.0, "2024-03-21"), // unknown category
        ];

        let buckets = aggregate_by_category(&records, EXPENSE_CATEGORIES, false);

        let bucket_sum: f64 = buckets.iter().map(|b| b.total).sum();
        let record_sum: f64 = records.iter().map(|r| r.amount).sum();
        assert_eq!(bucket_sum, record_sum);

        let seeds = buckets.iter().find(|b| b.key == "seeds").unwrap();
        assert_eq!(seeds.total, 125.0);
        assert_eq!(seeds.count, 2);

        // Unknown categories are preserved with fallback label and color
        let unknown = buckets.iter().find(|b| b.key == "drone_rental").unwrap();
        assert_eq!(unknown.label, "Drone Rental");
        assert_eq!(unknown.color, shared::FALLBACK_COLOR);

        // Zero-total categories are excluded by default
        assert!(buckets.iter().all(|b| b.total != 0.0));
    }

    #[test]
    fn test_aggregate_include_zero_lists_all_known_categories() {
        let records = vec![expense(1, "seeds", 100.0, "2024-03-01")];
        let buckets = aggregate_by_category(&records, EXPENSE_CATEGORIES, true);
        assert_eq!(buckets.len(), EXPENSE_CATEGORIES.len());
        // Known categories keep definition order
        assert_eq!(buckets[0].key, "seeds");
    }

    #[test]
    fn test_compute_totals_empty_lists() {
        let totals = compute_totals::<Income, Expense>(&[], &[]);
        assert_eq!(totals.total_income, 0.0);
        assert_eq!(totals.total_expenses, 0.0);
        assert_eq!(totals.net_profit, 0.0);
        // Division by zero is 0%, never NaN
        assert_eq!(totals.profit_margin, 0.0);
    }

    #[test]
    fn test_compute_totals_margin() {
        let income = vec![income_record(1, 500.0, "2024-03-01")];
        let expenses = vec![expense(1, "seeds", 200.0, "2024-03-02")];

        let totals = compute_totals(&income, &expenses);
        assert_eq!(totals.total_income, 500.0);
        assert_eq!(totals.total_expenses, 200.0);
        assert_eq!(totals.net_profit, 300.0);
        assert_eq!(totals.profit_margin, 60.0);
    }

    #[test]
    fn test_non_finite_amounts_count_as_zero() {
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "seeds", f64::NAN, "2024-03-02"),
            expense(3, "seeds", f64::INFINITY, "2024-03-03"),
        ];
        let totals = compute_totals::<Income, Expense>(&[], &records);
        assert_eq!(totals.total_expenses, 100.0);

        let buckets = aggregate_by_category(&records, EXPENSE_CATEGORIES, false);
        let seeds = buckets.iter().find(|b| b.key == "seeds").unwrap();
        assert_eq!(seeds.total, 100.0);
        assert_eq!(seeds.count, 3);
    }

    #[test]
    fn test_march_expense_summary_scenario() {
        // Expenses 100/seeds + 50/fuel, filter all categories, this month,
        // "now" pinned to 2024-03-20 -> total 150, buckets seeds=100 fuel=50
        let today = day(2024, 3, 20);
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "2024-03-15"),
        ];

        let filtered = filter_by_category(&records, CATEGORY_ALL);
        let filtered = filter_by_date_range(&filtered, DateRange::ThisMonth, today);
        let totals = compute_totals::<Income, Expense>(&[], &filtered);
        assert_eq!(totals.total_expenses, 150.0);

        let buckets = aggregate_by_category(&filtered, EXPENSE_CATEGORIES, false);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "seeds");
        assert_eq!(buckets[0].total, 100.0);
        assert_eq!(buckets[1].key, "fuel");
        assert_eq!(buckets[1].total, 50.0);
    }

    #[test]
    fn test_bucket_by_month() {
        let records = vec![
            expense(1, "seeds", 100.0, "2024-03-01"),
            expense(2, "fuel", 50.0, "2024-03-15"),
            expense(3, "labor", 75.0, "2024-07-01"),
            expense(4, "labor", 20.0, "2023-07-01"), // other year ignored
            expense(5, "labor", 20.0, "bad date"),   // invalid date ignored
        ];

        let buckets = bucket_by_month(&records, 2024);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[2].month, 3);
        assert_eq!(buckets[2].total, 150.0);
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets[6].total, 75.0);
        assert_eq!(buckets[0].total, 0.0);
    }

    #[test]
    fn test_last_day_of_month_handles_december_and_leap() {
        assert_eq!(last_day_of_month(day(2024, 12, 5)), day(2024, 12, 31));
        assert_eq!(last_day_of_month(day(2024, 2, 10)), day(2024, 2, 29));
        assert_eq!(last_day_of_month(day(2023, 2, 10)), day(2023, 2, 28));
    }
}
