//! Plain-text rendering of the list view-model.

use crate::controller::{ListView, RowView};

const DONE: &str = "[x]";
const OPEN: &str = "[ ]";

pub const EMPTY_PLACEHOLDER: &str = "No tasks";

/// Render the list, one row per line.
///
/// Example output:
/// ```text
/// [ ]   1  Buy milk
/// [x]   2  Walk the dog  (pending)
/// [ ]  14> Call mum  (editing)
/// ```
pub fn render_list(view: &ListView) -> String {
    let rows = match view {
        ListView::Empty => return format!("{}\n", EMPTY_PLACEHOLDER),
        ListView::Rows(rows) => rows,
    };

    let width = rows
        .iter()
        .map(|r| r.task.id.to_string().len())
        .max()
        .unwrap_or(1)
        .max(3);

    let mut output = String::new();
    for row in rows {
        render_row(&mut output, row, width);
    }
    output
}

fn render_row(output: &mut String, row: &RowView, width: usize) {
    let checkbox = if row.task.done { DONE } else { OPEN };
    let cursor = if row.state.editing { '>' } else { ' ' };

    output.push_str(&format!(
        "{} {:>width$}{} {}",
        checkbox,
        row.task.id,
        cursor,
        row.task.name,
        width = width
    ));

    let markers: Vec<&str> = [
        (row.state.editing, "editing"),
        (row.state.pending, "pending"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect();
    if !markers.is_empty() {
        output.push_str(&format!("  ({})", markers.join(", ")));
    }
    output.push('\n');
}
