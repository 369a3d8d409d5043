use carousel::cli::{
    apply, backends, handle_completions, handle_config_init, status, suggest, BackendsCommands,
    Cli, Commands, ConfigCommands,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => carousel::cli::run::run_rotation(args).await,
        Commands::Apply(args) => print_output(apply::handle_apply(&args).await),
        Commands::Backends(cmd) => match cmd {
            BackendsCommands::Probe(args) => print_output(backends::handle_probe(&args).await),
        },
        Commands::Suggest(args) => print_output(suggest::handle_suggest(&args).await),
        Commands::Status(args) => print_output(status::handle_status(&args).await),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_output(result: anyhow::Result<String>) -> anyhow::Result<()> {
    let output = result?;
    println!("{}", output);
    Ok(())
}
