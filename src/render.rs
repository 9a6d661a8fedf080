//! Plain-text views for the terminal.
use chrono::{Datelike, Weekday};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::calendar::{preview, MonthGrid};
use crate::model::{
    ClientSummary, Deliverable, PublishingStats, PublishingTask, RecordId, Submission,
};

const CELL_WIDTH: usize = 16;
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Cut `text` to at most `width` characters, marking the cut with `~`.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", clip(text, width), width = width)
}

/// Seven-column month grid. Each day shows at most `max_per_day` entries and
/// a "+N more" line for the rest.
pub fn month_grid(
    grid: &MonthGrid,
    buckets: &BTreeMap<String, Vec<Submission>>,
    max_per_day: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.first_day().format("%B %Y"));
    let header: Vec<String> = WEEKDAYS
        .iter()
        .map(|day| pad(&day.to_string(), CELL_WIDTH))
        .collect();
    let _ = writeln!(out, "{}", header.join("|").trim_end());

    // One cell per slot: padding cells are empty.
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(grid.weeks() * 7);
    cells.resize(grid.padding(), Vec::new());
    for (day, key) in grid.days().iter().zip(grid.day_keys()) {
        let mut lines = vec![format!("{:>2}", day.day())];
        let bucket = buckets
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let (shown, more) = preview(bucket, max_per_day);
        lines.extend(shown.iter().map(|s| format!("#{} {}", s.id, s.episode_title)));
        if more > 0 {
            lines.push(format!("+{} more", more));
        }
        cells.push(lines);
    }

    cells.resize(grid.weeks() * 7, Vec::new());

    let separator = vec!["-".repeat(CELL_WIDTH); 7].join("+");
    for week in cells.chunks(7) {
        let _ = writeln!(out, "{}", separator);
        let height = week.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for line in 0..height {
            let row: Vec<String> = (0..7)
                .map(|col| {
                    let text = week
                        .get(col)
                        .and_then(|cell| cell.get(line))
                        .map(String::as_str)
                        .unwrap_or("");
                    pad(text, CELL_WIDTH)
                })
                .collect();
            let _ = writeln!(out, "{}", row.join("|").trim_end());
        }
    }
    let _ = writeln!(out, "{}", separator);
    out
}

/// Left-aligned table with column widths fitted to the content.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let render_row = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", render_row(headers.to_vec()));
    for row in rows {
        let _ = writeln!(out, "{}", render_row(row.iter().map(String::as_str).collect()));
    }
    out
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

pub fn deliverables(records: &[Deliverable]) -> String {
    if records.is_empty() {
        return "No deliverables found.\n".to_string();
    }
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                d.deliverable_type.to_string(),
                d.status.to_string(),
                or_dash(d.episode_title.as_deref()),
                or_dash(d.client_name.as_deref()),
                or_dash(d.due_date.as_deref()),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "TYPE", "STATUS", "EPISODE", "CLIENT", "DUE"],
        &rows,
    )
}

pub fn publishing(tasks: &[PublishingTask], stats: &PublishingStats) -> String {
    let mut out = format!(
        "total {}  pending {}  scheduled {}  published {}  failed {}\n",
        stats.total, stats.pending, stats.scheduled, stats.published, stats.failed
    );
    if tasks.is_empty() {
        out.push_str("No publishing tasks found.\n");
        return out;
    }
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.episode_title.clone(),
                t.platform.to_string(),
                t.status.to_string(),
                or_dash(t.client_name.as_deref()),
                or_dash(t.scheduled_date.as_deref()),
            ]
        })
        .collect();
    out.push_str(&table(
        &["ID", "EPISODE", "PLATFORM", "STATUS", "CLIENT", "SCHEDULED"],
        &rows,
    ));
    out
}

pub fn clients(clients: &[ClientSummary]) -> String {
    let rows: Vec<Vec<String>> = clients
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone()])
        .collect();
    table(&["ID", "CLIENT"], &rows)
}

pub fn submission(s: &Submission) -> String {
    format!(
        "#{} {} [{} / {}] release {}\n",
        s.id,
        s.episode_title,
        s.content_type,
        s.status,
        s.release_date.as_deref().unwrap_or("unscheduled")
    )
}

/// Confirmation line after a successful update. Without a local summary the
/// record was not in the loaded view, so only the backend copy changed.
pub fn updated(kind: &str, id: RecordId, summary: Option<&str>) -> String {
    match summary {
        Some(summary) => format!("Updated {}", summary),
        None => format!(
            "Updated {} #{} on the backend; it is not in the loaded view, so no local copy is shown.\n",
            kind, id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::group_by_day;
    use crate::model::{
        AssetStatus, ContentType, DeliverableType, Platform, SubmissionStatus, TaskStatus,
    };

    fn sub(id: i64, date: &str) -> Submission {
        Submission {
            id,
            episode_title: format!("Ep {id}"),
            client_name: None,
            client_id: None,
            content_type: ContentType::Audio,
            status: SubmissionStatus::Review,
            platform: None,
            release_date: Some(date.into()),
        }
    }

    #[test]
    fn month_grid_truncates_busy_days() {
        let grid = MonthGrid::new(2024, 3).unwrap();
        let records: Vec<_> = (1..=5).map(|id| sub(id, "2024-03-08")).collect();
        let buckets = group_by_day(&records, grid.days());
        let text = month_grid(&grid, &buckets, 3);
        assert!(text.starts_with("March 2024\n"));
        assert!(text.contains("#3 Ep 3"));
        assert!(!text.contains("#4 Ep 4"));
        assert!(text.contains("+2 more"));
        let separators = text.lines().filter(|line| line.starts_with("---")).count();
        assert_eq!(separators, grid.weeks() + 1);
        // Day 1 sits in the sixth column after five padding cells.
        let first_row = text
            .lines()
            .find(|line| line.contains(" 1"))
            .unwrap();
        assert_eq!(first_row.find(" 1"), Some(5 * (CELL_WIDTH + 1)));
    }

    #[test]
    fn clip_marks_long_text() {
        assert_eq!(clip("short", 8), "short");
        assert_eq!(clip("a very long title", 8), "a very ~");
    }

    #[test]
    fn deliverables_table_has_header_and_rows() {
        let text = deliverables(&[Deliverable {
            id: 12,
            name: "Master audio".into(),
            deliverable_type: DeliverableType::Audio,
            status: AssetStatus::Approved,
            content_type: None,
            episode_title: Some("Pilot".into()),
            client_name: None,
            due_date: None,
            url: None,
        }]);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("ID  NAME"));
        let row = lines.next().unwrap();
        assert!(row.contains("Master audio"));
        assert!(row.contains("APPROVED"));
        assert!(row.ends_with('-'));
        assert_eq!(deliverables(&[]), "No deliverables found.\n");
    }

    #[test]
    fn publishing_prints_stats_line() {
        let stats = PublishingStats {
            total: 2,
            pending: 1,
            published: 1,
            ..Default::default()
        };
        let task = PublishingTask {
            id: 1,
            episode_title: "Pilot".into(),
            platform: Platform::Spotify,
            status: TaskStatus::Published,
            client_id: None,
            client_name: Some("Acme".into()),
            scheduled_date: Some("2024-03-08".into()),
            published_url: None,
        };
        let text = publishing(&[task], &stats);
        assert!(text.starts_with("total 2  pending 1  scheduled 0  published 1  failed 0\n"));
        assert!(text.contains("SPOTIFY"));
        assert!(publishing(&[], &stats).ends_with("No publishing tasks found.\n"));
    }

    #[test]
    fn update_without_local_copy_names_the_record() {
        let summary = submission(&sub(4, "2024-05-02"));
        assert_eq!(
            updated("submission", 4, Some(&summary)),
            "Updated #4 Ep 4 [AUDIO / REVIEW] release 2024-05-02\n"
        );
        let text = updated("submission", 9, None);
        assert!(text.starts_with("Updated submission #9 on the backend"));
        assert!(text.contains("not in the loaded view"));
    }
}
