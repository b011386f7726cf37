//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Sort YAML mapping keys alphabetically (or in Kubernetes root order), recursively
#[derive(Parser, Debug)]
#[command(name = "yaml-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML file to sort
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Sort file in place, replacing the original (not with -o)
    #[arg(short, long)]
    pub inplace: bool,

    /// Write sorted output to this file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Kubernetes manifest mode: root keys in fixed order (apiVersion, kind, metadata, spec, ...), rest alphabetical
    #[arg(short, long)]
    pub k8s: bool,

    /// Rules file defining list sort keys (default: ./.yaml-sort.yaml)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Print a rules file template and exit
    #[arg(long, exclusive = true)]
    pub init_config: bool,

    /// Print the effective rules (after merging all config layers) and exit
    #[arg(long, conflicts_with_all = ["inplace", "output"])]
    pub show_config: bool,

    /// Generate shell completions
    #[arg(long, value_enum, exclusive = true)]
    pub completions: Option<clap_complete::Shell>,
}
