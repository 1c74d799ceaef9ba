use chrono::{Datelike, Local};
use std::path::PathBuf;

fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Default chart path: output/{kind}-{country}-{YYMMDD}.png
pub fn generate_default_plot_filename(kind: &str, country: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year

    let filename = format!(
        "{}-{}-{:02}{:02}{:02}.png",
        slug(kind),
        slug(country),
        year,
        now.month(),
        now.day()
    );
    PathBuf::from("output").join(filename)
}
