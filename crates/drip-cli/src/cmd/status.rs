use crate::output::print_json;
use anyhow::Context;
use drip_core::{
    config::Config, cursor::CursorStore, library::Library, paths, sequence::Sequence,
};
use std::path::Path;

pub fn run(root: &Path, library_override: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    let order_path = paths::order_path(root);
    if !order_path.exists() {
        if json {
            return print_json(&serde_json::json!({ "tour_length": 0, "recipients": [] }));
        }
        println!("No tour order yet — it is created on the first 'drip send' (or 'drip reshuffle').");
        return Ok(());
    }

    let sequence = Sequence::load(&order_path).context("failed to load tour order")?;
    let cursors =
        CursorStore::open(&paths::cursors_path(root)).context("failed to open cursor file")?;

    // The library is optional here: positions are meaningful without it.
    let library = Library::load(&config.library_path(root, library_override)).ok();

    #[derive(serde::Serialize)]
    struct RecipientStatus<'a> {
        recipient: &'a str,
        position: usize,
        remaining: usize,
        next: Option<&'a str>,
    }

    let recipients: Vec<RecipientStatus> = config
        .recipients
        .iter()
        .map(|r| {
            let position = cursors.get(r);
            RecipientStatus {
                recipient: r,
                position,
                remaining: sequence.len().saturating_sub(position),
                next: sequence.get(position),
            }
        })
        .collect();

    if json {
        #[derive(serde::Serialize)]
        struct StatusOutput<'a> {
            tour_length: usize,
            tour_created_at: &'a chrono::DateTime<chrono::Utc>,
            library_items: Option<usize>,
            recipients: Vec<RecipientStatus<'a>>,
        }

        let output = StatusOutput {
            tour_length: sequence.len(),
            tour_created_at: &sequence.created_at,
            library_items: library.as_ref().map(Library::len),
            recipients,
        };
        return print_json(&output);
    }

    println!(
        "Tour: {} items, shuffled {}",
        sequence.len(),
        sequence.created_at.format("%Y-%m-%d")
    );
    if let Some(lib) = &library {
        if lib.len() != sequence.len() {
            println!(
                "note: library now has {} items; the frozen order covers {}",
                lib.len(),
                sequence.len()
            );
        }
    }

    if recipients.is_empty() {
        println!("\nNo recipients configured.");
        return Ok(());
    }

    let rows: Vec<[String; 4]> = recipients
        .iter()
        .map(|s| {
            [
                s.recipient.to_string(),
                s.position.to_string(),
                s.remaining.to_string(),
                s.next.unwrap_or("(exhausted)").to_string(),
            ]
        })
        .collect();
    println!();
    print_status_table(&rows);

    Ok(())
}

/// The recipient table: four fixed columns, widened to the longest cell.
fn print_status_table(rows: &[[String; 4]]) {
    const HEADERS: [&str; 4] = ["RECIPIENT", "POSITION", "REMAINING", "NEXT"];

    let mut widths: [usize; 4] = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let pad = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", pad(HEADERS));
    println!("{}", widths.map(|w| "-".repeat(w)).join("  "));
    for row in rows {
        println!(
            "{}",
            pad([&row[0], &row[1], &row[2], &row[3]].map(String::as_str))
        );
    }
}
