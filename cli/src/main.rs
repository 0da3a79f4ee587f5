mod commands;
mod terminal;

use commands::{CommandLine, Commands, build, import, resolve};
use terminal::{print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    spinner::init_logging(commands.verbose, commands.quiet);

    let cfg = commands.config();

    match commands.command() {
        Commands::Resolve => {
            print::header("resolving hosts");
            resolve::resolve(&cfg).await
        }
        Commands::Build => {
            print::header("building hosts file");
            build::build(&cfg).await
        }
        Commands::Import => {
            print::header("importing hosts");
            import::import(&cfg)
        }
    }
}
