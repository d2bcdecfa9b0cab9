//! Interactive terminal front for Rulenav.
//!
//! A thin REPL over the dispatch pipeline and the navigation controller:
//! plain input is sent as a chat message, `/` commands drive sessions and
//! the document viewer. Presentation only; all invariants live in the
//! library crates.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rulenav_application::ChatUseCase;
use rulenav_core::session::{ChatMessage, MessageRole};
use rulenav_core::viewer::{NavigationController, ViewLayout};
use rulenav_interaction::{BackendConfig, resolve_backend};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rulenav")]
#[command(about = "Chat over the CME rulebook with page-level citations", long_about = None)]
struct Cli {
    /// Backend base URL (overrides RULENAV_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Use the streaming chat endpoint
    #[arg(long)]
    stream: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.api_url {
        Some(url) => BackendConfig::new(url),
        None => BackendConfig::from_env(),
    };

    let backend = resolve_backend(&config).await;
    let usecase = ChatUseCase::new(backend);
    let mut controller = NavigationController::new();

    println!("{}", "rulenav - CME rulebook navigator".bold());
    println!("Type a question, or /help for commands.\n");
    let session = usecase.active_session().await;
    print_message(session.messages.last());

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        if let Some(command) = input.strip_prefix('/') {
            if !handle_command(command, &usecase, &mut controller).await? {
                break;
            }
            continue;
        }

        let session_id = usecase.active_session_id().await;
        let result = if cli.stream {
            usecase
                .send_message_streaming(input, &session_id, CancellationToken::new())
                .await
        } else {
            usecase.send_message(input, &session_id).await
        };
        if let Err(err) = result {
            eprintln!("{} {err}", "error:".red());
            continue;
        }

        let session = usecase.active_session().await;
        print_message(session.messages.last());
    }

    Ok(())
}

/// Handles a `/` command. Returns `false` when the REPL should exit.
async fn handle_command(
    command: &str,
    usecase: &ChatUseCase,
    controller: &mut NavigationController,
) -> Result<bool> {
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "quit" | "q" => return Ok(false),
        "help" => print_help(),
        "new" => {
            let id = usecase.create_session().await;
            println!("started conversation {}", short_id(&id).dimmed());
        }
        "sessions" => {
            let active_id = usecase.active_session_id().await;
            for session in usecase.sessions().await {
                let marker = if session.id == active_id { "*" } else { " " };
                println!(
                    "{marker} {} {} ({} messages)",
                    short_id(&session.id).dimmed(),
                    session.title,
                    session.messages.len()
                );
            }
        }
        "switch" => match parts.next() {
            Some(prefix) => {
                let sessions = usecase.sessions().await;
                match sessions.iter().find(|s| s.id.starts_with(prefix)) {
                    Some(session) => {
                        usecase.select_session(&session.id).await;
                        println!("switched to {}", session.title);
                    }
                    None => println!("no session matching '{prefix}'"),
                }
            }
            None => println!("usage: /switch <id-prefix>"),
        },
        "open" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(index) if index >= 1 => {
                let session = usecase.active_session().await;
                let citations = session
                    .last_assistant_message()
                    .map(ChatMessage::citations)
                    .unwrap_or_default();
                match citations.get(index - 1) {
                    Some(citation) => {
                        controller.open_citation(citation);
                        print_viewer(controller);
                    }
                    None => println!("no citation [{index}] in the last answer"),
                }
            }
            _ => println!("usage: /open <citation-number>"),
        },
        "close" => {
            controller.close_document_panel();
            print_viewer(controller);
        }
        "split" => {
            controller.toggle_split_view();
            print_viewer(controller);
        }
        "next" => {
            controller.navigate_page(1);
            print_viewer(controller);
        }
        "prev" => {
            controller.navigate_page(-1);
            print_viewer(controller);
        }
        other => println!("unknown command '/{other}', try /help"),
    }
    Ok(true)
}

fn print_help() {
    println!("  /new               start a new conversation");
    println!("  /sessions          list conversations (* = active)");
    println!("  /switch <id>       switch conversation by id prefix");
    println!("  /open <n>          open citation [n] of the last answer");
    println!("  /close             close the document panel");
    println!("  /split             toggle split view");
    println!("  /next, /prev       page through the open document");
    println!("  /quit              exit");
}

fn print_message(message: Option<&ChatMessage>) {
    let Some(message) = message else {
        return;
    };
    let label = match message.role {
        MessageRole::User => "you".cyan().bold(),
        MessageRole::Assistant => "navigator".green().bold(),
    };
    println!("\n{label}: {}", message.content);
    for (index, citation) in message.citations().iter().enumerate() {
        println!(
            "  {} {} (page {})",
            format!("[{}]", index + 1).yellow(),
            citation.display_label(),
            citation.page_number
        );
    }
    println!();
}

fn print_viewer(controller: &NavigationController) {
    let layout = match controller.layout() {
        ViewLayout::ChatOnly => "chat only",
        ViewLayout::Split => "split",
        ViewLayout::Overlay => "overlay",
    };
    match &controller.view().active_document_id {
        Some(document_id) => println!(
            "{} {document_id}, page {} [{layout}]",
            "viewing:".dimmed(),
            controller.view().current_page
        ),
        None => println!("{} no document open [{layout}]", "viewing:".dimmed()),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
