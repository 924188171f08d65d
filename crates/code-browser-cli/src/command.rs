//! Parsing of the line commands read from stdin.

use anyhow::{bail, Context, Result};
use code_browser::{BrowserAction, ViewState};

pub const HELP: &str = "\
Navigation:
  click <path>          preview-open at the current revision
  open <path>           pinned-open at the current revision
  quick <query>         list quick-open matches
  pick <path>           quick-open selection
  crumb <path>          breadcrumb: toggle a directory or open a file
Tabs:
  tabs                  list open tabs
  activate <id> | next | prev
  close <id> | close-all | close-others <id> | close-right <id>
  exit-snapshot [id]    show the live file in a pinned tab
Time travel:
  travel <rev>          browse the repository at <rev>
  live                  return to live
Editor:
  show                  print the active tab
  view <json>           store the editor view state of the active tab
  baseline <path>       compare <path> against HEAD
Panel:
  tree | siblings | refresh | repo <path> | help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forwarded to the browser state as is.
    Action(BrowserAction),
    /// Resolve a revision, then sync the timeline.
    Travel(String),
    /// Load `path` at HEAD and use it as the panel baseline.
    Baseline(String),
    ExitSnapshot(Option<String>),
    /// Resolve the repository containing a directory, then switch to it.
    Repo(String),
    /// Store a view state for the active tab.
    View(ViewState),
    QuickOpen(String),
    Tabs,
    Show,
    Tree,
    Siblings,
    Help,
    Quit,
}

/// Parse one line. Returns `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = |name: &str| -> Result<String> {
        if rest.is_empty() {
            bail!("usage: {} <{}>", word, name);
        }
        Ok(rest.to_string())
    };

    let command = match word {
        "click" => Command::Action(BrowserAction::FileClick(arg("path")?)),
        "open" => Command::Action(BrowserAction::FileDoubleClick(arg("path")?)),
        "pick" => Command::Action(BrowserAction::QuickOpenSelect(arg("path")?)),
        "crumb" => Command::Action(BrowserAction::BreadcrumbNavigate(arg("path")?)),
        "quick" => Command::QuickOpen(rest.to_string()),

        "activate" => Command::Action(BrowserAction::ActivateTab(arg("id")?)),
        "next" => Command::Action(BrowserAction::NextTab),
        "prev" => Command::Action(BrowserAction::PrevTab),
        "close" => Command::Action(BrowserAction::CloseTab(arg("id")?)),
        "close-all" => Command::Action(BrowserAction::CloseAllTabs),
        "close-others" => Command::Action(BrowserAction::CloseOtherTabs(arg("id")?)),
        "close-right" => Command::Action(BrowserAction::CloseTabsToRight(arg("id")?)),
        "exit-snapshot" => Command::ExitSnapshot((!rest.is_empty()).then(|| rest.to_string())),

        "travel" => Command::Travel(arg("rev")?),
        "live" => Command::Action(BrowserAction::ReturnToLive),

        "view" => {
            let value = serde_json::from_str(&arg("json")?).context("view state must be JSON")?;
            Command::View(ViewState::new(value))
        }
        "baseline" => Command::Baseline(arg("path")?),

        "repo" => Command::Repo(arg("path")?),
        "refresh" => Command::Action(BrowserAction::Refresh),
        "tabs" => Command::Tabs,
        "show" => Command::Show,
        "tree" => Command::Tree,
        "siblings" => Command::Siblings,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{}', try 'help'", other),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(
            parse("click src/main.rs").unwrap(),
            Some(Command::Action(BrowserAction::FileClick("src/main.rs".into())))
        );
        assert_eq!(
            parse("  open   docs/read me.md ").unwrap(),
            Some(Command::Action(BrowserAction::FileDoubleClick(
                "docs/read me.md".into()
            )))
        );
        assert_eq!(
            parse("quick").unwrap(),
            Some(Command::QuickOpen(String::new()))
        );
    }

    #[test]
    fn test_parse_optional_and_json_arguments() {
        assert_eq!(parse("exit-snapshot").unwrap(), Some(Command::ExitSnapshot(None)));
        assert_eq!(
            parse("exit-snapshot abc1234:a.rs").unwrap(),
            Some(Command::ExitSnapshot(Some("abc1234:a.rs".into())))
        );
        assert_eq!(
            parse(r#"view {"line": 3}"#).unwrap(),
            Some(Command::View(ViewState::new(json!({ "line": 3 }))))
        );
    }

    #[test]
    fn test_parse_blank_and_errors() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("# comment").unwrap(), None);
        assert!(parse("open").is_err());
        assert!(parse("view not-json").is_err());
        assert!(parse("frobnicate").is_err());
    }
}
