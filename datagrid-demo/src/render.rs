//! Plain-text rendering of a grid snapshot.

use std::fmt::Write;

use datagrid::{ColumnKind, GridRecord, GridView, Notification, SortOrder};

const MAX_CELL_WIDTH: usize = 28;

/// Render `view` as a text table with a pagination footer.
pub fn render<T: GridRecord>(title: &str, view: &GridView<T>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", title);

    let mut header: Vec<String> = vec![String::new(), String::new()];
    header.extend(view.columns.iter().map(|c| {
        let arrow = match c.sort_order {
            Some(SortOrder::Ascend) => " ^",
            Some(SortOrder::Descend) => " v",
            None => "",
        };
        format!("{}{}", c.title, arrow)
    }));

    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let mut line = vec![
                if row.dragging { "=" } else { " " }.to_string(),
                match (view.selection_mode.is_some(), row.selected) {
                    (false, _) => String::new(),
                    (true, true) => "[x]".to_string(),
                    (true, false) => "[ ]".to_string(),
                },
            ];
            for (column, cell) in view.columns.iter().zip(row.cells(&view.columns)) {
                line.push(match column.kind {
                    ColumnKind::Data => cell.unwrap_or_default(),
                    ColumnKind::Actions => row
                        .actions
                        .iter()
                        .map(|a| {
                            if a.is_interactive() {
                                format!("[{}]", a.label)
                            } else {
                                format!("({})", a.label)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" "),
                });
            }
            line
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    push_line(&mut out, &header, &widths);
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().map(|w| w + 1).sum()));
    for (line, row) in rows.iter().zip(&view.rows) {
        push_line(&mut out, line, &widths);
        if let Some(content) = &row.expanded_content {
            let _ = writeln!(out, "      {}", content);
        }
    }

    let summary = match view.item_range {
        Some((first, last)) => format!("{}-{} of {}", first, last, view.pagination.total),
        None => "no records".to_string(),
    };
    let _ = writeln!(
        out,
        "page {}/{} | {} | size {} {:?}{}{}",
        view.pagination.current_page,
        view.page_count.max(1),
        summary,
        view.pagination.page_size,
        view.page_size_options,
        if view.loading { " | loading" } else { "" },
        if view.disabled { " | disabled" } else { "" },
    );
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", truncate(cell, *width), width = width))
        .collect();
    let _ = writeln!(out, "{}", line.join(" ").trim_end());
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(width.saturating_sub(1)).collect();
    short.push('~');
    short
}

/// One line per notification.
pub fn render_notification(notification: &Notification) -> String {
    format!(
        "[{:?}] {} ({}s)",
        notification.level,
        notification.message,
        notification.duration.as_secs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long cell", 6), "a ver~");
    }
}
