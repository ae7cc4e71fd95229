use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use pit_sdk::{Commit, Pit, SdkError};
use pit_types::ObjectId;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = cli.root.as_path();
    match cli.command {
        Command::Init => cmd_init(root),
        Command::Status => cmd_status(root),
        Command::Add(args) => cmd_add(root, args),
        Command::Commit(args) => cmd_commit(root, args),
        Command::Log(args) => cmd_log(root, args),
        Command::Show(args) => cmd_show(root, args),
    }
}

fn open(root: &Path) -> anyhow::Result<Pit> {
    Pit::open(root).with_context(|| format!("cannot open repository at {}", root.display()))
}

fn cmd_init(root: &Path) -> anyhow::Result<()> {
    let pit = Pit::new(root)?;
    let created = pit.init_repo()?;
    let vcs = pit.layout().vcs_dir.display().to_string();
    if created {
        println!("{} Initialized empty Pit repository in {}", "✓".green().bold(), vcs.bold());
    } else {
        println!("Reinitialized existing Pit repository in {}", vcs.bold());
    }
    Ok(())
}

fn cmd_status(root: &Path) -> anyhow::Result<()> {
    let pit = open(root)?;
    match pit.head()? {
        Some(id) => println!("HEAD {}", id.to_hex().yellow()),
        None => println!("No commits yet"),
    }

    let index = pit.status()?;
    if index.is_empty() {
        println!("\nNothing staged.");
        return Ok(());
    }
    println!("\nStaged files:");
    for (path, entry) in &index {
        println!("  {}  {}", entry.hash.short_hex().dimmed(), path.green());
    }
    Ok(())
}

fn cmd_add(root: &Path, args: AddArgs) -> anyhow::Result<()> {
    let pit = open(root)?;
    let mut failed = 0usize;
    for path in &args.paths {
        match pit.stage(path) {
            Ok(id) => println!("  {} {} {}", "staged:".green(), path.display(), id.short_hex().dimmed()),
            Err(e) => {
                failed += 1;
                eprintln!("  {} {}", "error:".red().bold(), e);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} path(s) could not be staged", args.paths.len());
    }
    Ok(())
}

fn cmd_commit(root: &Path, args: CommitArgs) -> anyhow::Result<()> {
    let pit = open(root)?;
    match pit.commit(&args.message) {
        Ok(id) => {
            let commit = pit.show(&id)?;
            println!("{} Committed {}", "✓".green().bold(), id.to_hex().yellow());
            println!("  {} file(s)", commit.files.len());
            Ok(())
        }
        Err(SdkError::NothingToCommit) => {
            eprintln!("{} nothing to commit", "error:".red().bold());
            anyhow::bail!("nothing to commit")
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_log(root: &Path, args: LogArgs) -> anyhow::Result<()> {
    let pit = open(root)?;
    let log = pit.log(args.limit)?;
    if log.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    for summary in &log {
        if args.oneline {
            println!("{} {}", summary.id.short_hex().yellow(), summary.subject());
        } else {
            println!("{} {}", "commit".yellow(), summary.id.to_hex().yellow());
            println!("Date:  {}", summary.timestamp);
            println!("Files: {}", summary.file_count);
            println!("\n    {}\n", summary.message);
        }
    }
    Ok(())
}

fn cmd_show(root: &Path, args: ShowArgs) -> anyhow::Result<()> {
    let pit = open(root)?;
    let id = match args.commit.as_deref() {
        None | Some("HEAD") => pit.head()?.context("no commits yet")?,
        Some(text) => resolve(&pit, text)?,
    };
    let commit = pit.show(&id)?;
    print_commit(&id, &commit);
    Ok(())
}

/// Accept a full ID or an unambiguous prefix of a known commit.
fn resolve(pit: &Pit, text: &str) -> anyhow::Result<ObjectId> {
    if let Ok(id) = text.parse::<ObjectId>() {
        return Ok(id);
    }
    let prefix = text.trim().to_ascii_lowercase();
    let matches: Vec<ObjectId> = pit
        .chain()
        .ids()?
        .into_iter()
        .filter(|id| id.to_hex().starts_with(&prefix))
        .collect();
    debug!(prefix = %prefix, candidates = matches.len(), "resolving commit prefix");
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => anyhow::bail!("unknown commit: {text}"),
        _ => anyhow::bail!("ambiguous commit prefix: {text}"),
    }
}

fn print_commit(id: &ObjectId, commit: &Commit) {
    println!("{} {}", "commit".yellow().bold(), id.to_hex().yellow());
    match &commit.parent {
        Some(parent) => println!("Parent: {}", parent.to_hex()),
        None => println!("Parent: {}", "(root)".dimmed()),
    }
    println!("Date:   {}", commit.timestamp);
    println!("\n    {}\n", commit.message);
    for (path, entry) in &commit.files {
        println!("  {}  {}", entry.hash.short_hex().dimmed(), path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(root: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["pit", "-C", root.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn commit_with_empty_index_fails() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["init"]).unwrap();

        let err = run(dir.path(), &["commit", "-m", "empty"]).unwrap_err();
        assert_eq!(err.to_string(), "nothing to commit");
    }

    #[test]
    fn add_then_commit_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["init"]).unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        run(dir.path(), &["add", "a.txt"]).unwrap();
        run(dir.path(), &["commit", "-m", "add a"]).unwrap();
        assert!(Pit::open(dir.path()).unwrap().head().unwrap().is_some());
    }

    #[test]
    fn add_reports_failure_after_staging_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["init"]).unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        assert!(run(dir.path(), &["add", "missing.txt", "a.txt"]).is_err());
        let status = Pit::open(dir.path()).unwrap().status().unwrap();
        assert!(status.contains_key("a.txt"));
    }
}
