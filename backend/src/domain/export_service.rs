//! CSV and printable-HTML export of financial records.
//!
//! Formatting is pure string building; PDF output is the browser's print
//! dialog, the server only ever produces HTML.

use crate::db::DbConnection;
use crate::error::AppResult;
use chrono::NaiveDate;
use shared::{category_label, title_case, Expense, Income, EXPENSE_CATEGORIES, INCOME_SOURCES};
use tracing::info;

/// A generated CSV document plus the filename clients should save it under
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ExportService {
    db: DbConnection,
}

impl ExportService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Field values are written exactly as stored (raw category keys, full
    /// amount precision) so the file parses back to the same values; the
    /// print view below is the place for display labels.
    pub async fn expenses_csv(&self, today: NaiveDate) -> AppResult<CsvExport> {
        let expenses = self.chronological_expenses().await?;
        info!("Exporting {} expenses as CSV", expenses.len());

        let rows: Vec<Vec<String>> = expenses
            .iter()
            .map(|e| {
                vec![
                    e.date.clone(),
                    e.category.clone(),
                    e.description.clone(),
                    e.amount.to_string(),
                ]
            })
            .collect();

        Ok(CsvExport {
            filename: export_filename("expenses", today),
            content: build_csv(&["date", "category", "description", "amount"], &rows),
        })
    }

    pub async fn income_csv(&self, today: NaiveDate) -> AppResult<CsvExport> {
        let income = self.chronological_income().await?;
        info!("Exporting {} income records as CSV", income.len());

        let rows: Vec<Vec<String>> = income
            .iter()
            .map(|i| {
                vec![
                    i.date.clone(),
                    i.source.clone(),
                    i.description.clone(),
                    i.amount.to_string(),
                    i.notes.clone(),
                ]
            })
            .collect();

        Ok(CsvExport {
            filename: export_filename("income", today),
            content: build_csv(&["date", "source", "description", "amount", "notes"], &rows),
        })
    }

    pub async fn expenses_print_html(&self, today: NaiveDate) -> AppResult<String> {
        let expenses = self.chronological_expenses().await?;
        let total: f64 = expenses.iter().map(|e| sane(e.amount)).sum();

        let rows: Vec<Vec<String>> = expenses
            .iter()
            .map(|e| {
                vec![
                    e.date.clone(),
                    category_label(EXPENSE_CATEGORIES, &e.category),
                    e.description.clone(),
                    format_amount(e.amount),
                ]
            })
            .collect();

        Ok(build_print_document(
            "Expense Report",
            today,
            expenses.len(),
            total,
            &["date", "category", "description", "amount"],
            &rows,
        ))
    }

    pub async fn income_print_html(&self, today: NaiveDate) -> AppResult<String> {
        let income = self.chronological_income().await?;
        let total: f64 = income.iter().map(|i| sane(i.amount)).sum();

        let rows: Vec<Vec<String>> = income
            .iter()
            .map(|i| {
                vec![
                    i.date.clone(),
                    category_label(INCOME_SOURCES, &i.source),
                    i.description.clone(),
                    format_amount(i.amount),
                    i.notes.clone(),
                ]
            })
            .collect();

        Ok(build_print_document(
            "Income Report",
            today,
            income.len(),
            total,
            &["date", "source", "description", "amount", "notes"],
            &rows,
        ))
    }

    async fn chronological_expenses(&self) -> AppResult<Vec<Expense>> {
        let mut expenses = self.db.list_expenses().await?;
        expenses.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(expenses)
    }

    async fn chronological_income(&self) -> AppResult<Vec<Income>> {
        let mut income = self.db.list_income().await?;
        income.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(income)
    }
}

fn export_filename(entity: &str, today: NaiveDate) -> String {
    format!("{}_export_{}.csv", entity, today.format("%Y%m%d"))
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", sane(amount))
}

fn sane(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Quote a CSV field when it contains a delimiter, quote, newline, or
/// leading/trailing whitespace; embedded quotes are doubled
fn csv_escape(field: &str) -> String {
    let needs_quoting = field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
        || field != field.trim();
    if needs_quoting {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header keys are title-cased for display ("direct_sales" -> "Direct Sales")
fn build_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    let header_row: Vec<String> = headers.iter().map(|h| csv_escape(&title_case(h))).collect();
    out.push_str(&header_row.join(","));
    out.push_str("\r\n");
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&escaped.join(","));
        out.push_str("\r\n");
    }
    out
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Self-contained printable page: summary block plus the full record table.
fn build_print_document(
    title: &str,
    today: NaiveDate,
    record_count: usize,
    total: f64,
    headers: &[&str],
    rows: &[Vec<String>],
) -> String {
    let mut table = String::new();
    table.push_str("<tr>");
    for header in headers {
        table.push_str(&format!("<th>{}</th>", html_escape(&title_case(header))));
    }
    table.push_str("</tr>\n");
    for row in rows {
        table.push_str("<tr>");
        for field in row {
            table.push_str(&format!("<td>{}</td>", html_escape(field)));
        }
        table.push_str("</tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; color: #222; }}
h1 {{ font-size: 1.4rem; }}
.summary {{ margin: 1rem 0; padding: 0.75rem 1rem; background: #f4f4f4; border-radius: 4px; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
th {{ background: #e8e8e8; }}
@media print {{ body {{ margin: 0; }} }}
</style>
</head>
<body>
<h1>{title}</h1>
<div class="summary">
<p>Generated: {date}</p>
<p>Records: {count}</p>
<p>Total: {total:.2}</p>
</div>
<table>
{table}</table>
</body>
</html>
"#,
        title = html_escape(title),
        date = today.format("%Y-%m-%d"),
        count = record_count,
        total = total,
        table = table,
    )
}
