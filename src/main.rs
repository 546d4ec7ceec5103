use clap::Parser;
use lineupsmith::adapter::inbound::cli::command::{CheckCommand, Cli, ColorChoice, Commands};
use lineupsmith::adapter::inbound::cli::output::{self, OutputConfig};
use lineupsmith::adapter::inbound::cli::{check, optimize};
use lineupsmith::infrastructure::config::LoggingConfig;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let result = match &cli.command {
        Commands::Optimize(args) => optimize::execute(args).await,
        Commands::Check(command) => {
            LoggingConfig {
                level: "warn".into(),
                format: if cli.json { "json" } else { "pretty" }.into(),
            }
            .init();
            match command {
                CheckCommand::Config(arg) => check::execute_config(&arg.config),
                CheckCommand::Pool(args) => check::execute_pool(args),
            }
        }
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
