//! Phone Number Commands

use anyhow::{Context, Result};
use callguard_core::PhoneNumberStore;

use crate::config::CliConfig;
use crate::display;

fn phone_store(config: &CliConfig) -> Result<PhoneNumberStore> {
    Ok(PhoneNumberStore::new(config.open_store()?))
}

/// Validates and saves the phone number.
pub fn set(config: &CliConfig, number: &str) -> Result<()> {
    let stored = phone_store(config)?
        .save(number)
        .context("Phone number rejected")?;
    display::success(&format!(
        "Phone number saved: {}",
        display::mask_phone(&stored)
    ));
    Ok(())
}

pub fn show(config: &CliConfig) -> Result<()> {
    match phone_store(config)?.load()? {
        Some(number) => println!("{}", number),
        None => {
            display::warning("No phone number stored. Set one with: callguard phone set <number>")
        }
    }
    Ok(())
}

pub fn clear(config: &CliConfig) -> Result<()> {
    phone_store(config)?.clear()?;
    display::success("Phone number cleared");
    Ok(())
}
