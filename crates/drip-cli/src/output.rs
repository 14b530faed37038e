use serde::Serialize;

/// Pretty-printed JSON on stdout, for every `--json` code path.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
