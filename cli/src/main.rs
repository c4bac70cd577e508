mod commands;
mod terminal;

use commands::{CommandLine, discover};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.to_config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.quiet);

    discover::discover(commands.targets_file.as_deref(), &cfg).await
}
