use anyhow::Context;
use drip_core::{config::Config, cursor::CursorStore, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing drip in: {}", root.display());

    let dir = paths::drip_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::starter()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    // Establishing the cursor file now means every later run loads it instead
    // of special-casing a first run.
    let cursors_path = paths::cursors_path(root);
    let existed = cursors_path.exists();
    CursorStore::open(&cursors_path).context("failed to establish cursor file")?;
    if existed {
        println!("  exists:  {}", paths::CURSORS_FILE);
    } else {
        println!("  created: {}", paths::CURSORS_FILE);
    }

    println!("\nNext steps:");
    println!("  1. Fill in twilio credentials and recipients in {}", paths::CONFIG_FILE);
    println!(
        "  2. Drop a content snapshot at {} (or point 'library:' in the config at one)",
        paths::LIBRARY_FILE
    );
    println!("  3. Run: drip send --dry-run");

    Ok(())
}
