//! `durin get` — decrypt and show a single record.

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str, show: bool) -> Result<()> {
    let store = open_store(cli)?;
    let record = store.get(name)?;
    output::print_record(name, &record, show);
    Ok(())
}
