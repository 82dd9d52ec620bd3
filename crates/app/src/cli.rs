//! Command-line arguments.

use std::path::PathBuf;

use boefjes_infrastructure::StoreBackend;
use clap::{Parser, Subcommand, ValueEnum};

/// Client for the Bytes artifact store
#[derive(Debug, Parser)]
#[command(name = "boefjes-bytes")]
#[command(about = "Store and fetch boefje artifacts in Bytes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file, overlaid by BYTES_* environment variables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store backend, overrides BYTES_BACKEND.
    ///
    /// `memory` starts empty on every run and is discarded on exit, so only
    /// saves that need no earlier state (metas) succeed; reads report not
    /// found and raw saves report a missing boefje meta.
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    #[command(subcommand)]
    pub command: Command,
}

/// Store backend selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// The Bytes API over HTTP
    Remote,
    /// Process-local storage, empty at start and discarded on exit
    Memory,
}

impl From<BackendArg> for StoreBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Remote => Self::Remote,
            BackendArg::Memory => Self::Memory,
        }
    }
}

/// Artifact store operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Exchange the configured credentials for a token
    Login,

    /// Store a boefje meta read from a JSON file
    SaveBoefjeMeta {
        /// JSON file holding the boefje meta
        file: PathBuf,
    },

    /// Print a stored boefje meta
    GetBoefjeMeta {
        /// Boefje meta id
        id: String,
    },

    /// Store a normalizer meta read from a JSON file
    SaveNormalizerMeta {
        /// JSON file holding the normalizer meta
        file: PathBuf,
    },

    /// Print a stored normalizer meta
    GetNormalizerMeta {
        /// Normalizer meta id
        id: String,
    },

    /// Store the contents of a file as raw output of a boefje job
    SaveRaw {
        /// Id of the owning boefje meta
        id: String,

        /// File holding the raw payload
        file: PathBuf,

        /// Mime type label, may be repeated
        #[arg(long = "mime-type")]
        mime_types: Vec<String>,

        /// Add the mime type guessed from the file extension
        #[arg(long)]
        guess_mime_type: bool,
    },

    /// Fetch the raw output of a boefje job
    GetRaw {
        /// Id of the owning boefje meta
        id: String,

        /// Write the payload here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
