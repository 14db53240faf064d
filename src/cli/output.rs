//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Data and success lines go
//! to stdout; warnings, hints and errors go to stderr.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Record;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print record names, one per line.
pub fn print_names(names: &[String]) {
    if names.is_empty() {
        info("No records in this store yet.");
        tip("Run `durin put <NAME>` to add your first record.");
        return;
    }
    for name in names {
        println!("{name}");
    }
}

/// Print a single record as a two-column table.
///
/// The password is masked unless `show_password` is set, in which case it
/// is written on its own line below the table, straight from the record.
pub fn print_record(name: &str, record: &Record, show_password: bool) {
    println!("{}", record_table(name, record, show_password));
    if show_password {
        println!("{} {}", style("password:").bold(), record.password);
    }
}

/// Table of the record's fields.  It never holds the plaintext password,
/// since its cells are owned strings that are not wiped on drop.
fn record_table(name: &str, record: &Record, show_password: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["name", name]);
    table.add_row(vec!["username", record.username.as_str()]);
    if !show_password {
        table.add_row(vec!["password", MASK]);
    }
    table.add_row(vec!["notes", record.notes.as_str()]);
    table
}

const MASK: &str = "********";
