use anyhow::Context;
use drip_core::{config::Config, cursor::CursorStore, library::Library, paths, sequence::Sequence};
use std::path::Path;

pub fn run(root: &Path, library_override: Option<&Path>, reset: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    let library_path = config.library_path(root, library_override);
    let library = Library::load(&library_path).context("failed to load content library")?;
    anyhow::ensure!(
        !library.is_empty(),
        "content library {} has no items",
        library_path.display()
    );

    // Deleting the persisted order is the one sanctioned way to spend
    // randomness again.
    let order_path = paths::order_path(root);
    if order_path.exists() {
        std::fs::remove_file(&order_path)
            .with_context(|| format!("failed to remove {}", order_path.display()))?;
    }
    let sequence = Sequence::get_or_create(library.ids(), &order_path)
        .context("failed to build tour order")?;
    println!("Shuffled a new tour order over {} items.", sequence.len());

    if reset {
        let mut cursors =
            CursorStore::open(&paths::cursors_path(root)).context("failed to open cursor file")?;
        cursors.reset();
        cursors.save().context("failed to save cursor file")?;
        println!("Cleared every saved position; all recipients restart at the top.");
    } else {
        println!("Saved positions were kept and now index into the new order.");
    }

    Ok(())
}
