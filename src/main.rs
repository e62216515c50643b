use anyhow::Result;
use gitlite::areas::repository::Repository;
use gitlite::artifacts::core::PagerWriter;
use gitlite::commands::porcelain::merge::MergeOutcome;
use gitlite::errors::RepoError;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const LOG_ENV: &str = "GITLITE_LOG";
const NO_PAGER_ENV: &str = "NO_PAGER";

#[derive(Parser)]
#[command(
    name = "gitlite",
    version = "0.1.0",
    about = "A local, single-user version-control system",
    long_about = "gitlite keeps full snapshots of your files as commits, \
    with branches, a staging area and three-way merges, all stored under .gitlite.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository",
        long_about = "This command creates a repository in the current directory or at the specified path, \
        with a single initial commit on branch master."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or delete a tracked file and stage its removal"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit on the current branch from the head snapshot \
        and the staged additions and removals."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of the commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "With a branch name, this command replaces the working tree with the tip of that branch. \
        With --file, it restores a single file from the head commit, or from the commit given by --commit \
        (which may be abbreviated)."
    )]
    Checkout {
        #[arg(index = 1, required_unless_present = "file", conflicts_with = "file")]
        branch: Option<String>,
        #[arg(short, long, help = "The file to restore")]
        file: Option<String>,
        #[arg(short, long, requires = "file", help = "The commit to restore the file from")]
        commit: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the head commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Move the current branch to a commit and check out its files"
    )]
    Reset {
        #[arg(index = 1, help = "The full commit id")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match RepoError::kind_of(&error) {
            Some(repo_error) => {
                eprintln!("{}", repo_error);
                ExitCode::from(1)
            }
            None => {
                eprintln!("fatal: {:#}", error);
                ExitCode::from(2)
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(command: &Commands) -> Result<()> {
    let pwd = std::env::current_dir()?;
    let colorize = std::io::stdout().is_terminal();

    match command {
        Commands::Init { path } => {
            let root = path.clone().unwrap_or(pwd);
            Repository::init(&root, Box::new(std::io::stdout()))?;
        }
        Commands::Add { file } => open(&pwd)?.add(file)?,
        Commands::Rm { file } => open(&pwd)?.rm(file)?,
        Commands::Commit { message } => {
            open(&pwd)?.commit(message)?;
        }
        Commands::Log => with_pager(&pwd, |repository| repository.log())?,
        Commands::GlobalLog => with_pager(&pwd, |repository| repository.global_log())?,
        Commands::Find { message } => open(&pwd)?.find(message)?,
        Commands::Status => {
            open(&pwd)?.with_color(colorize).status()?;
        }
        Commands::Checkout {
            branch,
            file,
            commit,
        } => {
            let mut repository = open(&pwd)?;
            match (branch, file, commit) {
                (_, Some(file), Some(commit)) => {
                    repository.checkout_file_in_commit(commit, file)?
                }
                (_, Some(file), None) => repository.checkout_file(file)?,
                (Some(branch), None, _) => repository.checkout_branch(branch)?,
                (None, None, _) => anyhow::bail!("checkout needs a branch or --file"),
            }
        }
        Commands::Branch { name } => open(&pwd)?.branch(name)?,
        Commands::RmBranch { name } => open(&pwd)?.rm_branch(name)?,
        Commands::Reset { commit } => open(&pwd)?.reset(commit)?,
        Commands::Merge { branch } => {
            let mut repository = open(&pwd)?;
            let outcome = repository.merge(branch)?;
            report_merge(&repository, &outcome)?;
        }
    }

    Ok(())
}

fn open(root: &std::path::Path) -> Result<Repository> {
    Repository::open(root, Box::new(std::io::stdout()))
}

/// Run a command with long output through the pager when stdout is a terminal
fn with_pager(
    root: &std::path::Path,
    command: impl FnOnce(&Repository) -> Result<()>,
) -> Result<()> {
    if !std::io::stdout().is_terminal() || std::env::var_os(NO_PAGER_ENV).is_some() {
        return command(&open(root)?);
    }

    let writer = PagerWriter::new(minus::Pager::new());
    let pager = writer.pager().clone();

    command(&Repository::open(root, Box::new(writer))?)?;
    minus::page_all(pager)?;

    Ok(())
}

fn report_merge(repository: &Repository, outcome: &MergeOutcome) -> Result<()> {
    match outcome {
        MergeOutcome::FastForwarded => {
            writeln!(repository.writer(), "Current branch fast-forwarded.")?
        }
        MergeOutcome::AlreadyUpToDate => writeln!(
            repository.writer(),
            "Given branch is an ancestor of the current branch."
        )?,
        MergeOutcome::Merged {
            conflicted: true, ..
        } => writeln!(repository.writer(), "Encountered a merge conflict.")?,
        MergeOutcome::Merged { .. } => {}
    }

    Ok(())
}
