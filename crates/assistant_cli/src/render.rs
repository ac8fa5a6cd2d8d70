//! Plain-text table rendering for terminal output.

use crate::commands::CommandSpec;
use assistant_core::{ContactRecord, NoteRecord, UpcomingBirthday};
use colored::Colorize;

const COLUMN_GAP: &str = "  ";

/// Renders contacts with every field in its own column.
pub fn contacts_table(caption: &str, records: &[&ContactRecord]) -> String {
    let rows = records
        .iter()
        .map(|record| {
            vec![
                record.name().to_string(),
                record.phones().to_string(),
                record.emails().to_string(),
                record.birthday_text(),
                record.address_text().to_string(),
            ]
        })
        .collect();
    table(
        caption,
        &["Name", "Phones", "Emails", "Birthday", "Address"],
        rows,
    )
}

/// Renders upcoming birthdays with the date to congratulate on.
pub fn birthdays_table(caption: &str, entries: &[UpcomingBirthday<'_>]) -> String {
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.record.name().to_string(),
                entry.record.birthday_text(),
                entry.congratulation_date.format("%d.%m.%Y").to_string(),
                entry.record.phones().to_string(),
            ]
        })
        .collect();
    table(
        caption,
        &["Name", "Birthday", "Congratulate on", "Phones"],
        rows,
    )
}

/// Renders notes; text is collapsed to one line.
pub fn notes_table(caption: &str, notes: &[&NoteRecord]) -> String {
    let rows = notes
        .iter()
        .map(|note| {
            vec![
                note.id().to_string(),
                note.title().to_string(),
                note.text().split_whitespace().collect::<Vec<_>>().join(" "),
                note.tags().iter().cloned().collect::<Vec<_>>().join(", "),
            ]
        })
        .collect();
    table(caption, &["Id", "Title", "Text", "Tags"], rows)
}

/// Renders a command table as usage/description pairs.
pub fn help_table<H>(caption: &str, commands: &[CommandSpec<H>]) -> String {
    let rows = commands
        .iter()
        .map(|command| {
            vec![
                command.names.join(", "),
                command.usage.to_string(),
                command.description.to_string(),
            ]
        })
        .collect();
    table(caption, &["Command", "Arguments", "Description"], rows)
}

fn table(caption: &str, headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![caption.bold().to_string()];
    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(header, *width).cyan().bold().to_string())
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    lines.push(header_line.trim_end().to_string());
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.chars().count());
    format!("{value}{}", " ".repeat(fill))
}
