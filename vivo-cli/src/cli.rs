use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vivo_parser::ProbePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "vivo",
    author,
    version,
    about = "Download videos from vivo.sx / vivo.st",
    long_about = None
)]
pub struct Args {
    /// Page URLs to process, in order
    #[arg(value_name = "URL", required_unless_present = "show_config")]
    pub urls: Vec<String>,

    /// Print information about a video without downloading it
    #[arg(short, long)]
    pub info: bool,

    /// Print the source URL of the video file without downloading it
    #[arg(short, long)]
    pub source: bool,

    /// Destination of the file. A directory means `<dir>/<title>`
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Proxy URL (http://, https:// or socks5://)
    #[arg(short, long, env = "VIVO_PROXY")]
    pub proxy: Option<String>,

    /// Proxy username
    #[arg(long, requires = "proxy_password")]
    pub proxy_username: Option<String>,

    /// Proxy password
    #[arg(long, requires = "proxy_username")]
    pub proxy_password: Option<String>,

    /// Clean output: no colors and no separator between multiple URLs
    #[arg(short, long)]
    pub clean: bool,

    /// Disable all output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print stream information as JSON (implies --info)
    #[arg(long)]
    pub json: bool,

    /// What to do when the size/type probe of the media URL fails
    #[arg(long, value_enum)]
    pub probe_policy: Option<ProbePolicyArg>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbePolicyArg {
    /// Keep going with unknown size and type
    Tolerate,
    /// Treat the failure as a resolution error
    Fatal,
}

impl From<ProbePolicyArg> for ProbePolicy {
    fn from(value: ProbePolicyArg) -> Self {
        match value {
            ProbePolicyArg::Tolerate => ProbePolicy::Tolerate,
            ProbePolicyArg::Fatal => ProbePolicy::Fatal,
        }
    }
}
