use once_cell::sync::Lazy;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as RustylineConfig, Context, EditMode, Editor, Helper, Result};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;

pub type ResearchEditor = Editor<ReplHelper, FileHistory>;

static HISTORY_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home_dir).join(".gse_terminal.history")
});

const COMMANDS: [(&str, &str); 4] = [
    ("/export", "Save the current financial tables as CSV (optional path)"),
    ("/clear", "Clear the current result"),
    ("/help", "Show this help"),
    ("quit", "Exit the terminal"),
];

/// A line entered at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Export(Option<PathBuf>),
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Command::Quit;
        }
        if !line.starts_with('/') {
            return Command::Search(line.to_string());
        }

        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match cmd {
            "/export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "/clear" => Command::Clear,
            "/help" => Command::Help,
            "/quit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub fn help() -> String {
    let mut out = String::from("Type a company or question to research it. Commands:\n");
    for (cmd, description) in COMMANDS {
        out.push_str(&format!("  {:<10} {}\n", cmd, description));
    }
    out
}

pub struct ReplHelper;

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if !prefix.starts_with('/') || prefix.contains(char::is_whitespace) {
            return Ok((pos, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(prefix))
            .map(|(cmd, description)| Pair {
                display: format!("{} - {}", cmd, description),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') || line.len() < 2 {
            return None;
        }
        COMMANDS
            .iter()
            .find(|(cmd, _)| cmd.starts_with(line) && *cmd != line)
            .map(|(cmd, _)| cmd[line.len()..].to_string())
    }
}

impl Highlighter for ReplHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}

pub fn create_editor() -> Result<ResearchEditor> {
    log::debug!("Creating rustyline editor configuration");
    let rustyline_config = RustylineConfig::builder()
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .auto_add_history(true)
        .build();

    let mut rl = ResearchEditor::with_config(rustyline_config)?;
    if rl.load_history(&*HISTORY_PATH).is_err() {
        log::debug!("No previous history file found");
    } else {
        log::debug!("History loaded successfully");
    }
    rl.set_helper(Some(ReplHelper));
    Ok(rl)
}

pub fn save_history(rl: &mut ResearchEditor) -> Result<()> {
    rl.save_history(&*HISTORY_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_searches() {
        assert_eq!(
            Command::parse("  MTN Ghana financials "),
            Command::Search("MTN Ghana financials".to_string())
        );
        assert_eq!(Command::parse("QUIT"), Command::Quit);
        assert_eq!(Command::parse("/export"), Command::Export(None));
        assert_eq!(
            Command::parse("/export out/mtn.csv"),
            Command::Export(Some(PathBuf::from("out/mtn.csv")))
        );
        assert_eq!(Command::parse("/clear"), Command::Clear);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/nope"), Command::Unknown("/nope".to_string()));
    }

    #[test]
    fn blank_line_is_a_blank_search() {
        assert_eq!(Command::parse("   "), Command::Search(String::new()));
    }

    #[test]
    fn help_mentions_every_command() {
        let text = help();
        for (cmd, _) in COMMANDS {
            assert!(text.contains(cmd));
        }
    }
}
