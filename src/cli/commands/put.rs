//! `durin put` — add or replace a record.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::{DurinError, Result};
use crate::vault::Record;

/// Execute the `put` command.
pub fn execute(cli: &Cli, name: &str, username: &str, notes: &str) -> Result<()> {
    // Unlock before asking for the record's password.
    let mut store = open_store(cli)?;

    let password = read_record_password(name)?;
    let record = Record::new(username, password.as_str(), notes);

    let existed = store.contains(name);
    store.put(name, &record)?;

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!(
        "Record '{name}' {verb} ({} total)",
        store.len()
    ));

    Ok(())
}

/// Read the record's password from stdin when piped, otherwise prompt.
fn read_record_password(name: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| DurinError::CommandFailed(format!("reading stdin: {e}")))?;
        let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {name}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| DurinError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
