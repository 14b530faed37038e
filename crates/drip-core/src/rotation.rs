use crate::cursor::CursorStore;
use crate::error::{DripError, Result};
use crate::gateway::Gateway;
use crate::library::{Item, Library};
use crate::sequence::Sequence;
use serde::Serialize;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Delivered {
    pub recipient: String,
    pub item: String,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failed {
    pub recipient: String,
    pub reason: String,
}

/// Outcome of one batch run. Cursors advanced only for entries in
/// `delivered`; `failed` and `exhausted` recipients keep their position.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub delivered: Vec<Delivered>,
    pub failed: Vec<Failed>,
    pub exhausted: Vec<String>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Resolve the item a recipient would receive next, without delivering.
///
/// `TourExhausted` when the cursor has walked past the end of the order;
/// `MissingItem` when the order names an id the library no longer has (the
/// order is frozen at creation time, the library is reloaded every run, and
/// the two are allowed to drift).
pub fn next_item<'a>(
    recipient: &str,
    sequence: &'a Sequence,
    library: &'a Library,
    cursors: &CursorStore,
) -> Result<(usize, &'a str, &'a Item)> {
    let position = cursors.get(recipient);
    let id = sequence
        .get(position)
        .ok_or_else(|| DripError::TourExhausted(recipient.to_string()))?;
    let item = library
        .get(id)
        .ok_or_else(|| DripError::MissingItem(id.to_string()))?;
    Ok((position, id, item))
}

/// Walk the recipient list once, in order, delivering each recipient's next
/// item and advancing its cursor only on confirmed success.
///
/// A recipient past the end of the tour is reported as exhausted and skipped
/// — the order is never wrapped or rebuilt here; restarting the tour is an
/// operator decision. Any failure is recorded and the batch continues.
/// Duplicate entries in `recipients` are processed once: a recipient receives
/// at most one item per run.
///
/// The cursor store is only mutated in memory. Persisting it afterwards is
/// the caller's job, exactly once per run.
pub fn run<G: Gateway>(
    recipients: &[String],
    sequence: &Sequence,
    library: &Library,
    cursors: &mut CursorStore,
    gateway: &G,
) -> RunReport {
    let mut report = RunReport::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for recipient in recipients {
        if !seen.insert(recipient.as_str()) {
            continue;
        }

        let (position, id, item) = match next_item(recipient, sequence, library, cursors) {
            Ok(next) => next,
            Err(DripError::TourExhausted(_)) => {
                report.exhausted.push(recipient.clone());
                continue;
            }
            Err(e) => {
                report.failed.push(Failed {
                    recipient: recipient.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match gateway.deliver(recipient, item) {
            Ok(()) => {
                cursors.advance(recipient);
                report.delivered.push(Delivered {
                    recipient: recipient.clone(),
                    item: id.to_string(),
                    position,
                });
            }
            Err(e) => report.failed.push(Failed {
                recipient: recipient.clone(),
                reason: e.to_string(),
            }),
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
