mod commands;
mod terminal;

use commands::{CommandLine, Commands, check, refresh, serve};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.quiet);

    match commands.command {
        Commands::Serve(args) => {
            print::header("starting server", cfg.quiet);
            serve::serve(cfg, args.server_config()).await
        }
        Commands::Check { addresses } => {
            print::header("loading range lists", cfg.quiet);
            check::check(&addresses, &cfg).await
        }
        Commands::Refresh => {
            print::header("loading range lists", cfg.quiet);
            refresh::refresh(&cfg).await
        }
    }
}
