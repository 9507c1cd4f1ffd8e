use clap::Parser;
use shardvault::cli::{Cli, Commands};
use shardvault::cli::commands;

fn main() {
    let cli = Cli::parse();
    shardvault::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Store {
            ref service,
            ref secret,
        } => commands::store::execute(&cli, service, secret.as_deref()),
        Commands::Get { ref key_id } => commands::get::execute(&cli, key_id),
        Commands::Verify { ref key_id } => commands::verify::execute(&cli, key_id),
        Commands::Delete { ref key_id, force } => commands::delete::execute(&cli, key_id, force),
        Commands::Rotate {
            ref key_id,
            ref service,
            ref secret,
        } => commands::rotate::execute(&cli, key_id, service, secret.as_deref()),
        Commands::List => commands::list::execute(&cli),
        Commands::Compare {
            ref a,
            ref b,
            format,
        } => commands::compare::execute(a, b, format),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        shardvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
