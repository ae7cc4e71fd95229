use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pit", about = "Pit: a minimal content-addressed version control store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub root: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty repository (safe to run again)
    Init,
    /// Show the staging index
    Status,
    /// Stage files for the next commit
    Add(AddArgs),
    /// Record the staging index as a new commit
    Commit(CommitArgs),
    /// Show commit history
    Log(LogArgs),
    /// Show a commit, or HEAD by default
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub commit: Option<String>,
}
