// expert_cli/src/repl.rs

use expert_core::QueryRequest;
use orchestrator::submission;
use orchestrator::{Outcome, PersonaRegistry};

pub const HELP: &str = "\
/list              専門家の一覧を表示
/persona <名前|番号> 専門家を切り替え
/help              このヘルプを表示
exit               終了
それ以外の入力は、選択中の専門家への質問として送信されます。";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Help,
    List,
    Select(String),
    Ask(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return ReplCommand::Exit;
    }
    match trimmed.split_once(char::is_whitespace).unwrap_or((trimmed, "")) {
        ("/help", _) => ReplCommand::Help,
        ("/list", _) => ReplCommand::List,
        ("/persona", arg) => ReplCommand::Select(arg.trim().to_string()),
        // Questions go out as typed, surrounding whitespace included.
        _ => ReplCommand::Ask(line.to_string()),
    }
}

/// Accepts a persona name or its 1-based position in the list.
pub fn resolve_selection(registry: &PersonaRegistry, arg: &str) -> Option<&'static str> {
    let arg = arg.trim();
    let names = registry.list_personas();
    if let Ok(index) = arg.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| names.get(i).copied());
    }
    names.into_iter().find(|name| *name == arg)
}

pub fn render_list(registry: &PersonaRegistry, selected: &str) -> String {
    registry
        .list_personas()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let marker = if *name == selected { "*" } else { " " };
            format!("{} {}. {}", marker, i + 1, name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shown while waiting on the model; an empty question never gets that far.
pub fn progress_line(request: &QueryRequest) -> Option<String> {
    request.has_question().then(|| submission::progress_message(&request.persona))
}

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::MissingQuestion { warning } => format!("⚠ {}", warning),
        Outcome::Answered { persona, text } => format!("{}\n{}", submission::answer_heading(persona), text),
        Outcome::Failed { persona, error, placeholder } => {
            format!("✖ {}\n{}\n{}", error, submission::answer_heading(persona), placeholder)
        }
    }
}
