use std::path::PathBuf;

use clap::{Args, Subcommand};
use msgrelay_codec::DEFAULT_MAX_PAYLOAD;
use msgrelay_relay::DEFAULT_OUTPUT_PREFIX;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod inspect;
pub mod send;
pub mod serve;
pub mod version;

/// Default socket name, in the abstract namespace.
pub const DEFAULT_LISTEN_NAME: &str = "sock1";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Relay messages from a local socket into the output file.
    Serve(ServeArgs),
    /// Send one message to a running relay.
    Send(SendArgs),
    /// Decode and print a persisted output file.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Send(args) => send::run(args),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket name to listen on. Abstract namespace unless it contains '/'.
    #[arg(long, env = "MSGRELAY_LISTEN", default_value = DEFAULT_LISTEN_NAME)]
    pub listen_to: String,
    /// Directory to create the output file in.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
    /// Output file name prefix.
    #[arg(long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub prefix: String,
    /// Largest accepted payload in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
    /// Per-connection read timeout: 500ms, 5s or 2m (bare numbers are seconds).
    /// Default: wait forever.
    #[arg(long)]
    pub read_timeout: Option<String>,
    /// fsync the output file after every message.
    #[arg(long)]
    pub sync: bool,
    /// Exit after N connections.
    #[arg(long)]
    pub count: Option<usize>,
    /// Do not echo relayed payloads to stdout.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket name to connect to.
    #[arg(long, env = "MSGRELAY_LISTEN", default_value = DEFAULT_LISTEN_NAME)]
    pub listen_to: String,
    /// JSON payload.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub json: Option<String>,
    /// Raw string payload, sent unvalidated.
    #[arg(long, conflicts_with_all = ["json", "file"])]
    pub data: Option<String>,
    /// Read payload from file. Without any payload flag, stdin is sent.
    #[arg(long, conflicts_with_all = ["json", "data"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Output file written by `serve`.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
