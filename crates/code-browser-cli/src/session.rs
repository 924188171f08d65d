//! Wires the browser state to the git providers and prints results.

use crate::command::{Command, HELP};
use anyhow::{Context, Result};
use code_browser::{
    BaselineSource, BrowserAction, BrowserEvent, CodeBrowserState, ContentProvider, Loader,
    PanelBaseline, Revision, TimeTravelState,
};
use code_browser_git::{CachedProvider, GitCli};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::Arc;

pub struct Session {
    state: CodeBrowserState,
    loader: Loader,
    git: GitCli,
    content: Arc<CachedProvider<GitCli>>,
    quick_open_limit: usize,
}

impl Session {
    pub fn new(state: CodeBrowserState, git: GitCli, quick_open_limit: usize) -> Self {
        let provider = Arc::new(CachedProvider::new(git.clone()));
        let loader = Loader::new(provider.clone(), provider.clone(), provider.clone());
        Self {
            state,
            loader,
            git,
            content: provider,
            quick_open_limit,
        }
    }

    /// Run an action and everything it triggers.
    ///
    /// Plays the timeline collaborator too: a return-to-live request is
    /// answered by syncing the live state.
    pub async fn dispatch(&mut self, action: BrowserAction) -> Vec<String> {
        let mut output = Vec::new();
        let mut queue = VecDeque::from([action]);

        while let Some(action) = queue.pop_front() {
            log::debug!("Dispatching {:?}", action);
            let events = self.state.handle_action(action);
            for event in self.loader.run(&mut self.state, events).await {
                match event {
                    BrowserEvent::ReturnToLive => {
                        queue.push_back(BrowserAction::SyncTimeTravel(TimeTravelState::live()));
                    }
                    BrowserEvent::ActiveTabChanged { tab_id: Some(id) } => {
                        output.push(format!("active: {}", id));
                    }
                    BrowserEvent::ActiveTabChanged { tab_id: None } => {
                        output.push("no open tabs".to_string());
                    }
                    BrowserEvent::TabClosed(id) => output.push(format!("closed: {}", id)),
                    BrowserEvent::DirectoryToggled { path, expanded } => {
                        let verb = if expanded { "expanded" } else { "collapsed" };
                        output.push(format!("{} {}/", verb, path));
                    }
                    BrowserEvent::RestoreViewState {
                        tab_id,
                        state: Some(view),
                    } => output.push(format!("restore {}: {}", tab_id, view.as_value())),
                    _ => {}
                }
            }
        }
        output
    }

    /// Execute one command. Returns `None` when the session should end.
    pub async fn execute(&mut self, command: Command) -> Result<Option<Vec<String>>> {
        let output = match command {
            Command::Action(action) => self.dispatch(action).await,
            Command::Travel(rev) => self.travel(&rev).await?,
            Command::Baseline(path) => self.baseline(&path).await?,
            Command::ExitSnapshot(id) => {
                let id = match id {
                    Some(id) => id,
                    None => self.active_id().context("no active tab")?,
                };
                self.dispatch(BrowserAction::ExitSnapshot(id)).await
            }
            Command::Repo(dir) => {
                let root = self
                    .git
                    .repo_root_of(&dir)
                    .await
                    .with_context(|| format!("{} is not inside a git repository", dir))?;
                self.dispatch(BrowserAction::SetRepoRoot(root)).await
            }
            Command::View(state) => {
                let tab_id = self.active_id().context("no active tab")?;
                self.dispatch(BrowserAction::ViewStateChanged { tab_id, state }).await
            }
            Command::QuickOpen(query) => self
                .state
                .quick_open_matches(&query, self.quick_open_limit)
                .into_iter()
                .map(str::to_string)
                .collect(),
            Command::Tabs => self.tabs(),
            Command::Show => vec![self.show()],
            Command::Tree => self
                .state
                .flat_tree()
                .iter()
                .map(|entry| format!("{}{}{}", entry.indent(), entry.icon(), entry.name))
                .collect(),
            Command::Siblings => self
                .state
                .siblings()
                .into_iter()
                .map(|s| if s.is_directory { format!("{}/", s.name) } else { s.name })
                .collect(),
            Command::Help => HELP.lines().map(str::to_string).collect(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }

    fn active_id(&self) -> Option<String> {
        self.state.active_tab().map(|tab| tab.id.to_string())
    }

    async fn travel(&mut self, rev: &str) -> Result<Vec<String>> {
        let info = self.git.commit_info(self.state.repo_root(), rev).await?;
        let mut output = vec![format!(
            "travelling to {} {}",
            &info.hash[..info.hash.len().min(Revision::SHORT_LEN)],
            info.subject
        )];
        let state = TimeTravelState::historical(info.hash, info.timestamp, Some(info.subject));
        output.extend(self.dispatch(BrowserAction::SyncTimeTravel(state)).await);
        Ok(output)
    }

    async fn baseline(&mut self, path: &str) -> Result<Vec<String>> {
        let head = self.git.commit_info(self.state.repo_root(), "HEAD").await?;
        let rev = Revision::parse(&head.hash).context("HEAD is not a commit hash")?;
        let previous = self
            .content
            .read_at_revision(self.state.repo_root(), path, Some(&rev))
            .await
            .with_context(|| format!("Could not read {} at HEAD", path))?;
        let output = self
            .dispatch(BrowserAction::SetPanelBaseline(PanelBaseline::new(path, previous)))
            .await;
        Ok(output)
    }

    fn tabs(&self) -> Vec<String> {
        let active = self.state.registry().active_id();
        self.state
            .tabs()
            .iter()
            .map(|tab| {
                let marker = if Some(&tab.id) == active { "*" } else { " " };
                let mut flags = String::new();
                if tab.is_preview {
                    flags.push_str(" (preview)");
                }
                if tab.is_snapshot {
                    flags.push_str(" (snapshot)");
                }
                format!("{} {:<40} {}{}", marker, tab.id, tab.title(), flags)
            })
            .collect()
    }

    fn show(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.state.snapshot_banner() {
            let _ = writeln!(
                out,
                "[snapshot {}] {}",
                banner.short_hash,
                banner.commit_message.as_deref().unwrap_or_default()
            );
        }

        let (Some(tab), Some(props)) = (self.state.active_tab(), self.state.editor_props()) else {
            out.push_str("no active tab");
            return out;
        };

        let crumbs: Vec<String> = self
            .state
            .breadcrumbs()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        // Content is read at the tab's own revision; the panel may browse another one.
        let shown = tab.revision.as_ref().map_or("live", |rev| rev.short());
        let context = self.state.revision_context();
        let browsing = context.query_revision().map_or("live", |rev| rev.short());
        let _ = write!(out, "{} @ {}", crumbs.join(" / "), shown);
        if browsing != shown {
            let _ = write!(out, " (browsing {})", browsing);
        }
        match self.state.diff_baseline() {
            Some(baseline) if baseline.has_diff_data => out.push_str(match baseline.source {
                BaselineSource::Tab => " (modified vs previous)",
                _ => " (modified vs baseline)",
            }),
            _ => {}
        }
        out.push('\n');
        out.push_str(props.content.unwrap_or("(loading)"));
        out
    }
}
