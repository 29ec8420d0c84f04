use clap::Parser;
use hinglish_cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    hinglish_cli::init_logging(cli.verbose);

    hinglish_cli::run(&cli)
}
