use clap::Parser;
use durin::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr; quiet unless DURIN_LOG says otherwise.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DURIN_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => durin::cli::commands::list::execute(&cli),
        Commands::Get { ref name, show } => durin::cli::commands::get::execute(&cli, name, show),
        Commands::Put {
            ref name,
            ref username,
            ref notes,
        } => durin::cli::commands::put::execute(&cli, name, username, notes),
        Commands::Delete { ref name, force } => {
            durin::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::Passwd => durin::cli::commands::passwd::execute(&cli),
        Commands::Completions { shell } => durin::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        durin::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
