use crate::pipeline::{JoinedRow, PipelineOutput};
use askama::Template;
use chrono::NaiveDate;

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

struct HeadlineRow<'a> {
    date: String,
    link: &'a str,
}

/// The headlines view: one `date` / `link` row per headline.
#[derive(Template)]
#[template(path = "headlines.html")]
struct HeadlinesTable<'a> {
    rows: Vec<HeadlineRow<'a>>,
}

/// Renders the headlines view as an HTML table.
///
/// Links were escaped when the pipeline built them, so they are embedded
/// as-is; dates go through the template's own escaping.
///
/// # Errors
/// Returns an error if the template fails to render
pub fn headlines_html(output: &PipelineOutput) -> askama::Result<String> {
    let rows = output
        .joined
        .iter()
        .map(|row| HeadlineRow {
            date: date_cell(row.date),
            link: &row.link,
        })
        .collect();

    HeadlinesTable { rows }.render()
}

/// Prints the headlines view.
pub fn print_headlines(output: &PipelineOutput) {
    println!("\nHeadlines:");
    for row in &output.joined {
        println!(
            "{}  {}",
            date_cell(row.date),
            row.title.as_deref().unwrap_or("(untitled)")
        );
    }
}

/// Prints headlines next to their day's prices.
///
/// # Arguments
/// * `output`: The pipeline result
/// * `priced_only`: Only show rows that matched a day with price data
///
/// # Summary Displayed
/// - Covered date range
/// - Number of rows with a price change
pub fn print_joined(output: &PipelineOutput, priced_only: bool) {
    println!("\nNews + Daily Price:");
    println!(
        "{:<10}  {:>10}  {:>10}  {:>10}  title",
        "date", "open", "close", "change"
    );

    let rows: Vec<&JoinedRow> = if priced_only {
        output.with_price_data().collect()
    } else {
        output.joined.iter().collect()
    };

    for row in rows {
        println!(
            "{:<10}  {:>10}  {:>10}  {:>10}  {}",
            date_cell(row.date),
            cell(row.open),
            cell(row.close),
            cell(row.price_change),
            row.title.as_deref().unwrap_or("")
        );
    }

    match output.date_range() {
        Some((min, max)) => println!("Date range: {} to {}", min, max),
        None => println!("Date range: (no dated headlines)"),
    }
    println!("Rows with price change: {}", output.price_change_count());
}

/// Prints the full daily price history, independent of the headlines.
pub fn print_price_history(output: &PipelineOutput) {
    println!("\nDaily Price History:");
    println!("{:<10}  {:>10}  {:>10}", "date", "open", "close");
    for day in &output.daily_prices {
        println!(
            "{:<10}  {:>10}  {:>10}",
            day.date,
            cell(day.open),
            cell(day.close)
        );
    }
}
