use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "testview", version, about = "Browse load-test runs as a sortable table")]
pub struct Cli {
    /// JSON file with the test run list (`-` reads stdin)
    #[arg(short, long, default_value = "-")]
    pub data: PathBuf,

    /// Sort menu item to click once the table is ready (start, workers, id)
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Print the summary URL instead of opening a browser
    #[arg(long)]
    pub no_open: bool,

    /// Write debug logs to the state directory
    #[arg(short, long)]
    pub verbose: bool,
}
