//! `durin delete` — remove a record from the store.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::{DurinError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let mut store = open_store(cli)?;

    if !store.contains(name) {
        return Err(DurinError::RecordNotFound(name.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete record '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| DurinError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            return Err(DurinError::UserCancelled);
        }
    }

    store.delete(name)?;
    output::success(&format!(
        "Deleted record '{name}' ({} remaining)",
        store.len()
    ));

    Ok(())
}
