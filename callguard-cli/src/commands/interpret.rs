//! Interpret Command

use anyhow::Result;
use callguard_core::verdict;

use crate::display;

/// Runs one frame through the verdict interpreter.
pub fn run(frame: &str, json: bool) -> Result<()> {
    let verdict = verdict::interpret(frame);

    if json {
        println!("{}", serde_json::to_string(&verdict)?);
        return Ok(());
    }

    match verdict {
        Some(verdict) => display::alert(&verdict),
        None => display::info("No alert"),
    }
    Ok(())
}
