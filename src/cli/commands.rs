//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Local mirror of the Hypixel public API
#[derive(Parser, Debug)]
#[command(name = "api-mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the snapshot over HTTP
    Server {
        /// Port to listen on (default 80)
        port: Option<u16>,
    },

    /// Refresh every endpoint listed in the constants file
    Update {
        /// API key
        key: Option<String>,
    },

    /// Refresh only the given endpoints
    #[command(name = "updatesome")]
    UpdateSome {
        /// API key
        key: String,

        /// Endpoint names, e.g. `player` or `skyblock/auctions`
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Refresh the list of endpoint names
    #[command(name = "updateconstant")]
    UpdateConstant {
        /// Documentation page embedding the API specification
        doc_url: Option<String>,

        /// Read names from the documentation repository instead
        #[arg(long)]
        from_tree: bool,

        /// Documentation repository URL
        #[arg(long, requires = "from_tree")]
        repo: Option<String>,

        /// Branch of the documentation repository
        #[arg(long, requires = "from_tree")]
        branch: Option<String>,

        /// Folder holding the endpoint documents
        #[arg(long, requires = "from_tree")]
        prefix: Option<String>,
    },

    /// Purge the snapshot, refresh the endpoint names and update everything
    Reinstall {
        /// API key
        key: Option<String>,

        /// Documentation page embedding the API specification
        doc_url: Option<String>,
    },

    /// Delete every cached endpoint
    Purge,
}

impl Cli {
    /// Parse arguments, accepting subcommand names in any case
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// Lower-case the subcommand name, leaving every other argument alone
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut skip_value = false;

    for arg in args.iter_mut().skip(1) {
        if skip_value {
            skip_value = false;
            continue;
        }
        let Some(text) = arg.to_str() else {
            break;
        };
        if text == "-c" || text == "--config" {
            skip_value = true;
            continue;
        }
        if text.starts_with('-') {
            continue;
        }
        *arg = OsString::from(text.to_lowercase());
        break;
    }

    args
}
