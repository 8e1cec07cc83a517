use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inspect and maintain a Community Applications catalog",
    arg_required_else_help = true
)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use a config file other than the default
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    #[clap(name = "defconfig")]
    DefConfig,

    /// Print an XML template as JSON
    #[clap(name = "show")]
    Show {
        /// Template file
        file: String,

        /// Do not add the template path and derived sort keys
        #[arg(long)]
        generic: bool,
    },

    /// Print the XML for a JSON template
    #[clap(name = "make-xml")]
    MakeXml {
        /// JSON (or PHP serialized) template file
        file: String,
    },

    /// Search, sort and page through the cached catalog
    #[clap(name = "search")]
    Search {
        /// Words to look for; omit to list everything
        query: Option<String>,

        /// Match any word instead of all of them
        #[arg(long)]
        any: bool,

        /// Template key to sort on
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort direction: up or down
        #[arg(long)]
        sort_dir: Option<String>,

        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Entries per page; defaults to the plugin's setting
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Recompute the list of duplicate plugins
    #[clap(name = "dupes")]
    Dupes,

    /// Delete the plugin attribute cache
    #[clap(name = "drop-cache")]
    DropCache,

    /// Print the effective plugin settings
    #[clap(name = "settings")]
    Settings {
        /// Write the settings back to the settings file
        #[arg(long)]
        write: bool,
    },
}
