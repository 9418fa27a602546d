use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "client_portal",
    version,
    about = "Generate a client's portal index.html from its reports.json"
)]
pub struct Cli {
    /// Client folder containing reports.json (relative paths resolve against --root)
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub client_folder: Option<PathBuf>,

    /// Generate portals for every client folder under --root
    #[arg(long)]
    pub all: bool,

    /// Directory holding the client folders
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Render as if today were this date (YYYY-MM-DD) instead of the system clock
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// HTML-escape config text instead of inserting it verbatim
    #[arg(long)]
    pub escape_html: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn resolve_folder(&self, folder: &std::path::Path) -> PathBuf {
        if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            self.root.join(folder)
        }
    }
}
