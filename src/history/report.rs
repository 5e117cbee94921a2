// ABOUTME: Stats page rendering: builds the HTML history table shown in the stats panel.
// ABOUTME: The page carries a refresh meta tag so a browser keeps it current too.

use chrono::{DateTime, Local, Utc};

use super::{HistoryRecord, format_minutes};

/// A rendered stats page plus the rows it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPage {
    pub html: String,
    pub records: Vec<HistoryRecord>,
}

impl StatsPage {
    /// Render a page for `records`, refreshing every `refresh_seconds` when set.
    pub fn build(records: Vec<HistoryRecord>, refresh_seconds: Option<u64>) -> Self {
        let html = render_stats_html(&records, refresh_seconds);
        Self { html, records }
    }
}

/// Sum of the durations of `records`, in minutes.
pub fn total_minutes(records: &[HistoryRecord]) -> f64 {
    records.iter().map(HistoryRecord::duration_minutes).sum()
}

/// Format a timestamp in local time for display.
pub fn display_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Render the full stats page.
pub fn render_stats_html(records: &[HistoryRecord], refresh_seconds: Option<u64>) -> String {
    let refresh = refresh_seconds
        .map(|secs| format!("    <meta http-equiv=\"refresh\" content=\"{}\">\n", secs))
        .unwrap_or_default();

    let rows: String = records
        .iter()
        .map(|record| {
            format!(
                "        <tr>\n          <td>{}</td>\n          <td>{}</td>\n          <td>{}</td>\n          <td>{}</td>\n        </tr>\n",
                escape_html(record.workspace_name()),
                format_minutes(record.duration_minutes()),
                display_time(record.start_time()),
                display_time(record.end_time()),
            )
        })
        .collect();

    format!(
        r#"<html>
  <head>
    <meta charset="utf-8">
{refresh}    <title>Pomodoro Stats</title>
    <style>
      table, th, td {{
        border-style: solid;
        border-collapse: collapse;
      }}
      th, td {{
        padding: 5px;
      }}
    </style>
  </head>
  <body>
    <h1>Pomodoro stats</h1>
    <ul>
      <li>Total number of sessions: {count}</li>
      <li>Total focused time: {minutes} min</li>
    </ul>
    <table>
      <thead>
        <tr>
          <th>Workspace</th>
          <th>Duration (mins)</th>
          <th>Start date</th>
          <th>End date</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </body>
</html>
"#,
        count = records.len(),
        minutes = format_minutes(total_minutes(records)),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
