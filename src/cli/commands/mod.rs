//! One module per subcommand, each exposing `execute`.

pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod passwd;
pub mod put;
