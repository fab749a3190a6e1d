// expert_cli/src/main.rs

mod repl;

use std::sync::Arc;

use clap::Parser;
use common_utils::{load_env_files, AppConfig};
use expert_core::{ExpertError, QueryRequest};
use expert_llm::OpenAiChatClient;
use orchestrator::{submission, PersonaRegistry, ResponseService};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use crate::repl::ReplCommand;

#[derive(Parser, Debug)]
#[command(name = "expert_cli", version, about = "専門家ペルソナに質問する対話型CLI")]
struct Cli {
    /// Persona to start with, by name or 1-based number
    #[arg(short, long, env = "EXPERT_PERSONA")]
    persona: Option<String>,

    /// Ask a single question and exit instead of starting the REPL
    #[arg(short, long)]
    question: Option<String>,
}

fn build_service() -> Result<ResponseService, ExpertError> {
    let config = AppConfig::from_env()?;
    let client = OpenAiChatClient::new(&config.llm)?;
    Ok(ResponseService::new(PersonaRegistry::builtin(), Arc::new(client)))
}

async fn ask(service: &ResponseService, persona: &str, question: &str) {
    let request = QueryRequest::new(persona, question);
    if let Some(line) = repl::progress_line(&request) {
        println!("{}", line);
    }
    let outcome = submission::handle(service, &request).await;
    println!("{}\n", repl::render_outcome(&outcome));
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let env_report = load_env_files();
    let cli = Cli::parse();

    // The REPL owns the terminal; only warnings and above by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    env_report.log();

    let service = match build_service() {
        Ok(service) => service,
        Err(e) => {
            let message = submission::startup_failure_message(&e);
            tracing::error!("[CLI] {}", message);
            anyhow::bail!(message);
        }
    };
    let registry = service.registry().clone();

    let mut persona = match cli.persona.as_deref() {
        Some(arg) => repl::resolve_selection(&registry, arg)
            .ok_or_else(|| anyhow::anyhow!("unknown persona '{}'. Choose from:\n{}", arg, repl::render_list(&registry, "")))?,
        None => registry.default_persona(),
    };

    if let Some(question) = cli.question {
        ask(&service, persona, &question).await;
        return Ok(());
    }

    println!("{}", submission::PAGE_TITLE);
    println!("{}", submission::selected_info(persona));
    println!("{}\n", repl::HELP);

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline(&format!("[{}] > ", persona)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match repl::parse_line(&line) {
            ReplCommand::Exit => break,
            ReplCommand::Help => println!("{}", repl::HELP),
            ReplCommand::List => println!("{}", repl::render_list(&registry, persona)),
            ReplCommand::Select(arg) => match repl::resolve_selection(&registry, &arg) {
                Some(name) => {
                    persona = name;
                    println!("{}", submission::selected_info(persona));
                }
                None => println!("'{}' は登録されていない専門家です。\n{}", arg, repl::render_list(&registry, persona)),
            },
            ReplCommand::Ask(question) => ask(&service, persona, &question).await,
        }
    }

    println!("終了します。");
    Ok(())
}
