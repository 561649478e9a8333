mod commands;
mod terminal;

use commands::{CommandLine, download, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    if commands.varnish {
        print::header("fetching varnish ranges", commands.quiet);
        download::download_varnish_list(commands.no_proxy).await?;
    }

    print::header("starting scanner", commands.quiet);
    scan::scan(commands.scan_config(), commands.quiet).await
}
