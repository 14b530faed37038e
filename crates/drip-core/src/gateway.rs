use crate::error::Result;
use crate::library::Item;

/// The delivery seam: one call transmits one item to one recipient over
/// whatever channel the implementation speaks.
///
/// One call is one attempt from the engine's accounting perspective. An
/// implementation must not hide retries behind a single `deliver` — a
/// recipient whose delivery fails keeps its cursor and is re-attempted on the
/// next run instead.
pub trait Gateway {
    fn deliver(&self, recipient: &str, item: &Item) -> Result<()>;
}
