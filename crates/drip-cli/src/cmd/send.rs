use crate::output::print_json;
use crate::twilio::TwilioGateway;
use anyhow::Context;
use drip_core::{
    config::{Config, WarnLevel},
    cursor::CursorStore,
    gateway::Gateway,
    library::{Item, Library},
    paths,
    rotation::{self, RunReport},
    sequence::Sequence,
};
use std::path::Path;
use tracing::{error, info};

pub fn run(
    root: &Path,
    library_override: Option<&Path>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    // A broken config must abort before anything is sent. Dry runs get a
    // pass so the batch can be previewed before credentials are filled in.
    if !dry_run {
        let problems: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message)
            .collect();
        anyhow::ensure!(
            problems.is_empty(),
            "config is not usable: {} (see 'drip check')",
            problems.join("; ")
        );
    }

    let library_path = config.library_path(root, library_override);
    let library = Library::load(&library_path).context("failed to load content library")?;
    anyhow::ensure!(
        !library.is_empty(),
        "content library {} has no items",
        library_path.display()
    );

    // First ever run shuffles and freezes the order; every later run replays it.
    let sequence = Sequence::get_or_create(library.ids(), &paths::order_path(root))
        .context("failed to load tour order")?;
    let mut cursors =
        CursorStore::open(&paths::cursors_path(root)).context("failed to open cursor file")?;

    let report = if dry_run {
        // Nothing is saved: the cursors advanced here die with this process.
        rotation::run(
            &config.recipients,
            &sequence,
            &library,
            &mut cursors,
            &PreviewGateway { quiet: json },
        )
    } else {
        let gateway = Logged(TwilioGateway::new(&config.twilio));
        let report = rotation::run(&config.recipients, &sequence, &library, &mut cursors, &gateway);
        if let Err(e) = cursors.save() {
            // Deliveries already happened; the bookkeeping for this run is
            // lost and the next run re-sends the same items.
            error!("failed to save cursors — this run's progress will be re-sent next time: {e}");
        }
        report
    };

    if json {
        return print_json(&report);
    }
    print_report(&report, dry_run);
    Ok(())
}

// ---------------------------------------------------------------------------
// Gateways
// ---------------------------------------------------------------------------

/// Resolves everything but transmits nothing. Backs `--dry-run`.
/// Quiet under `--json` so stdout stays parseable.
struct PreviewGateway {
    quiet: bool,
}

impl Gateway for PreviewGateway {
    fn deliver(&self, recipient: &str, item: &Item) -> drip_core::Result<()> {
        if !self.quiet {
            println!("would send to {recipient}: {}", preview(&item.text));
        }
        Ok(())
    }
}

/// Logs each attempt before handing it to the real gateway.
struct Logged<G>(G);

impl<G: Gateway> Gateway for Logged<G> {
    fn deliver(&self, recipient: &str, item: &Item) -> drip_core::Result<()> {
        info!("sending to {recipient}: {}", preview(&item.text));
        self.0.deliver(recipient, item)
    }
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 60;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}

// ---------------------------------------------------------------------------
// Report output
// ---------------------------------------------------------------------------

fn print_report(report: &RunReport, dry_run: bool) {
    let verb = if dry_run { "Would deliver" } else { "Delivered" };
    println!("{verb}: {}", report.delivered.len());
    for d in &report.delivered {
        println!("  {} -> {} (position {})", d.recipient, d.item, d.position);
    }

    if !report.exhausted.is_empty() {
        println!(
            "Exhausted ({} — 'drip reshuffle' starts a new tour):",
            report.exhausted.len()
        );
        for r in &report.exhausted {
            println!("  {r}");
        }
    }

    if !report.failed.is_empty() {
        println!("Failed: {}", report.failed.len());
        for f in &report.failed {
            println!("  {}: {}", f.recipient, f.reason);
        }
    }
}
