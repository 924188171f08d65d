use anyhow::{Context, Result};
use clap::Parser;
use code_browser::{BrowserAction, BrowserOptions, CodeBrowserState};
use code_browser_config::AppConfig;
use code_browser_git::GitCli;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

mod command;
mod logger;
mod session;

use session::Session;

/// Browse a git repository at live and historical revisions, one command per line.
#[derive(Parser, Debug)]
#[command(name = "code-browser", version, about)]
struct Cli {
    /// Repository (or any directory inside it) to browse
    #[arg(short, long)]
    repo: Option<String>,

    /// Config file to use instead of the default lookup
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_file = logger::init();

    log::info!("Starting code-browser");
    log::info!("Logging to {}", log_file.display());

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    let git = GitCli::new(config.git_binary.clone());
    log::debug!("Using git binary {}", git.git_binary());
    let start = cli
        .repo
        .or_else(|| config.repo_root.clone())
        .unwrap_or_else(|| ".".to_string());
    let repo_root = git
        .repo_root_of(&start)
        .await
        .with_context(|| format!("{} is not inside a git repository", start))?;
    log::info!("Browsing {}", repo_root);

    let options = BrowserOptions {
        unavailable_placeholder: config.unavailable_placeholder.clone(),
        load_parent_baseline: config.load_parent_baseline,
    };
    let state = CodeBrowserState::with_options(repo_root.as_str(), options);
    let mut session = Session::new(state, git, config.quick_open_limit);

    print_lines(&session.dispatch(BrowserAction::Refresh).await);
    println!("code-browser: {} (type 'help' for commands)", repo_root);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match session.execute(command).await {
            Ok(Some(output)) => print_lines(&output),
            Ok(None) => break,
            Err(e) => {
                log::warn!("Command failed: {:#}", e);
                eprintln!("error: {:#}", e);
            }
        }
    }

    log::info!("Exiting code-browser");
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
