//! `durin passwd` — change the store's unlock password.
//!
//! Unlocks with the current password, then rewraps the master keyset
//! under a KEK derived from the new one.  Records are not re-encrypted.
//! The current settings' Argon2 params are applied to the new wrap.

use crate::cli::output;
use crate::cli::{open_store, Cli, PromptPassword};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    output::info("Enter your current store password.");
    let mut store = open_store(cli)?;

    let settings = Settings::load(store.dir())?;
    output::info("Choose your new store password.");
    let mut new_password = PromptPassword::new("New store password", settings.min_password_len);
    store.change_password(&mut new_password, Some(settings.argon2_params()))?;

    output::success(&format!(
        "Password changed for {} ({} records kept)",
        store.dir().display(),
        store.len()
    ));

    Ok(())
}
