//! Plain-text rendering of snapshots for the terminal.

use std::fmt::Write;

use stockwatch_core::{ChangeClass, DetailSnapshot, NewsStoryView, WatchlistSnapshot};
use stockwatch_market_data::SearchResult;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const NAME_WIDTH: usize = 24;

fn marker(class: ChangeClass) -> &'static str {
    match class {
        ChangeClass::Up => "▲",
        ChangeClass::Down => "▼",
        ChangeClass::Neutral => "·",
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Scale `points` onto block characters, oldest on the left.
pub fn sparkline(points: &[f64]) -> String {
    let finite: Vec<f64> = points.iter().copied().filter(|p| p.is_finite()).collect();
    let (min, max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });
    let span = max - min;

    finite
        .iter()
        .map(|&p| {
            if span <= 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((p - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

pub fn watchlist(snapshot: &WatchlistSnapshot) -> String {
    if snapshot.is_empty() {
        return "Watchlist is empty\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<width$} {:>12} {:>10}  TREND",
        "SYMBOL",
        "NAME",
        "PRICE",
        "CHANGE",
        width = NAME_WIDTH
    );
    for entry in &snapshot.entries {
        let _ = writeln!(
            out,
            "{:<8} {:<width$} {:>12} {:>10} {} {}",
            entry.symbol,
            truncate(&entry.display_name, NAME_WIDTH),
            entry.display_price,
            entry.display_change,
            marker(entry.change_class),
            sparkline(&entry.chart_points),
            width = NAME_WIDTH
        );
    }
    out
}

pub fn detail(snapshot: &DetailSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", snapshot.symbol, snapshot.company_name);
    let _ = writeln!(
        out,
        "{}  {} {}",
        snapshot.display_price,
        snapshot.display_change,
        marker(snapshot.chart.change_class)
    );
    if snapshot.is_watched {
        let _ = writeln!(out, "(on watchlist)");
    }

    if !snapshot.chart.points.is_empty() {
        let _ = writeln!(out, "\n{}", sparkline(&snapshot.chart.points));
    }

    if !snapshot.metric_rows.is_empty() {
        let _ = writeln!(out);
        for row in &snapshot.metric_rows {
            let _ = writeln!(out, "{:<12} {:>14}", row.label, row.value);
        }
    }

    if !snapshot.news.is_empty() {
        let _ = writeln!(out, "\nNews");
        for item in &snapshot.news {
            let _ = writeln!(out, "- {} ({})", item.headline, item.source);
        }
    }
    out
}

pub fn search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No matches\n".to_string();
    }

    let mut out = String::new();
    for result in results {
        let _ = writeln!(
            out,
            "{:<10} {:<40} {}",
            result.display_symbol,
            truncate(&result.description, 40),
            result.security_type
        );
    }
    out
}

pub fn news(title: &str, stories: &[NewsStoryView]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    if stories.is_empty() {
        let _ = writeln!(out, "No stories");
        return out;
    }
    for story in stories {
        let _ = writeln!(out, "\n{} · {}", story.source, story.date);
        let _ = writeln!(out, "{}", story.headline);
        let _ = writeln!(out, "{}", story.url);
    }
    out
}
