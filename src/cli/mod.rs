//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{resolve_store_dir, Settings};
use crate::crypto::kdf::{EnvPassword, PasswordSource};
use crate::errors::{DurinError, Result};
use crate::vault::SecretStore;

/// Durin CLI: local encrypted password store.
#[derive(Parser)]
#[command(name = "durin", about = "Local encrypted password store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (default: $DURIN_DIR or ~/.durin)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List all record names
    List,

    /// Show a record
    Get {
        /// Record name (e.g. github)
        name: String,
        /// Print the password instead of masking it
        #[arg(long)]
        show: bool,
    },

    /// Add or replace a record (password read from prompt or stdin)
    Put {
        /// Record name (e.g. github)
        name: String,
        /// Username for the record
        #[arg(short, long, default_value = "")]
        username: String,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Delete a record
    Delete {
        /// Record name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the store's unlock password
    Passwd,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Password sources used by the binary
// ---------------------------------------------------------------------------

/// Interactive terminal prompt.
///
/// When the store is being created the password is asked twice and must
/// meet the minimum length from `Settings`.
pub struct PromptPassword {
    prompt: String,
    min_len: usize,
}

impl PromptPassword {
    pub fn new(prompt: impl Into<String>, min_len: usize) -> Self {
        Self {
            prompt: prompt.into(),
            min_len,
        }
    }
}

impl PasswordSource for PromptPassword {
    fn read_password(&mut self, creating: bool) -> Result<Zeroizing<String>> {
        if !creating {
            let pw = dialoguer::Password::new()
                .with_prompt(&self.prompt)
                .interact()
                .map_err(|e| DurinError::KeyDerivationFailed(format!("password prompt: {e}")))?;
            return Ok(Zeroizing::new(pw));
        }

        loop {
            let pw = dialoguer::Password::new()
                .with_prompt(&self.prompt)
                .with_confirmation("Confirm password", "Passwords do not match, try again")
                .interact()
                .map_err(|e| DurinError::KeyDerivationFailed(format!("password prompt: {e}")))?;

            if pw.len() < self.min_len {
                output::warning(&format!(
                    "Password must be at least {} characters. Try again.",
                    self.min_len
                ));
                continue;
            }
            return Ok(Zeroizing::new(pw));
        }
    }
}

/// `$DURIN_PASSWORD` when set, otherwise an interactive prompt.
///
/// A new password taken from the environment is still held to the
/// minimum length.
pub struct CliPassword {
    env: EnvPassword,
    prompt: PromptPassword,
}

impl CliPassword {
    pub fn new(prompt: &str, settings: &Settings) -> Self {
        Self {
            env: EnvPassword::new(EnvPassword::DEFAULT_VAR),
            prompt: PromptPassword::new(prompt, settings.min_password_len),
        }
    }
}

impl PasswordSource for CliPassword {
    fn read_password(&mut self, creating: bool) -> Result<Zeroizing<String>> {
        if !self.env.is_available() {
            return self.prompt.read_password(creating);
        }
        let pw = self.env.read_password(creating)?;
        if creating && pw.len() < self.prompt.min_len {
            return Err(DurinError::KeyDerivationFailed(format!(
                "password must be at least {} characters",
                self.prompt.min_len
            )));
        }
        Ok(pw)
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the store directory from the CLI arguments.
pub fn store_dir(cli: &Cli) -> Result<PathBuf> {
    resolve_store_dir(cli.dir.as_deref())
}

/// Resolve, lock and unlock the store.
pub fn open_store(cli: &Cli) -> Result<SecretStore> {
    let dir = store_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let mut password = CliPassword::new("Enter store password", &settings);
    SecretStore::open_with_settings(&dir, &settings, &mut password)
}
