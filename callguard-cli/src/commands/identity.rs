//! Identity Command
//!
//! Prints the per-install user id, creating it on first use.

use anyhow::Result;
use callguard_core::{IdentityResolver, PhoneNumberStore, SystemClock};
use std::sync::Arc;

use crate::config::CliConfig;
use crate::display;

pub fn run(config: &CliConfig) -> Result<()> {
    let store = config.open_store()?;
    let resolver = IdentityResolver::new(store.clone(), Arc::new(SystemClock));

    if resolver.stored_user_id()?.is_none() {
        display::info("No user id yet, creating one");
    }

    let phone = PhoneNumberStore::new(store).load()?;
    let user_id = resolver.get_or_create_user_id(phone.as_deref());
    println!("{}", user_id);
    Ok(())
}
