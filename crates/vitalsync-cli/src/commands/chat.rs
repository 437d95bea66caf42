//! Chat command - interactive conversation with the assistant.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use vitalsync_ai::ChatBackend;
use vitalsync_core::{Category, NewDocument, ViewState};
use vitalsync_driver::{Session, SessionError};

use super::docs::print_doc;

const HELP: &str = "\
Commands:
  /add <category> | <title> | <content>   Add a document to the knowledge base
  /rm <id>                                Remove a document
  /docs                                   List documents
  /tip                                    Get a personalized tip
  /view <dashboard|chat|knowledge|tracker> Switch view
  /help                                   Show this help
  /quit                                   Leave the chat";

/// What the REPL should do after handling a line.
enum Flow {
    Continue,
    Quit,
}

pub(crate) async fn run() -> miette::Result<()> {
    let session = super::connect()?;
    session.start_chat();

    if let Some(greeting) = session.transcript().first() {
        println!("assistant> {}", greeting.text);
    }
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("you> ");
        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| miette::miette!("Failed to read input: {}", e))?
        else {
            break;
        };

        if let Flow::Quit = handle_line(&session, &line).await {
            break;
        }
    }

    Ok(())
}

async fn handle_line<B: ChatBackend>(session: &Session<B>, line: &str) -> Flow {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Flow::Continue;
    }

    if let Some(command) = trimmed.strip_prefix('/') {
        return handle_command(session, command).await;
    }

    prompt("assistant> ");
    match session.send_message_streaming(line, prompt).await {
        Ok(_) => println!(),
        Err(SessionError::Busy) => println!("(still answering, please wait)"),
        Err(e) => println!("{}", e),
    }

    Flow::Continue
}

async fn handle_command<B: ChatBackend>(session: &Session<B>, command: &str) -> Flow {
    let (name, args) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));

    match name {
        "quit" | "exit" => return Flow::Quit,
        "help" => println!("{}", HELP),
        "docs" => {
            let docs = session.documents();
            println!("{} documents", docs.len());
            for doc in &docs {
                print_doc(doc, false);
            }
        }
        "add" => match parse_new_document(args) {
            Ok(new) => match session.add_document(new) {
                Ok(doc) => println!("Added [{}] {}", doc.id, doc.title),
                Err(e) => println!("{}", e),
            },
            Err(e) => println!("{}", e),
        },
        "rm" => {
            if session.remove_document(args) {
                println!("Removed {}", args);
            } else {
                println!("No document with id '{}'", args);
            }
        }
        "tip" => println!("{}", session.daily_tip().await),
        "view" => match args.parse::<ViewState>() {
            Ok(view) => {
                session.navigate(view);
                println!("Now viewing: {}", session.current_view());
            }
            Err(e) => println!("{}", e),
        },
        other => println!("Unknown command '/{}'. Type /help for commands.", other),
    }

    Flow::Continue
}

/// Parse `<category> | <title> | <content>`.
fn parse_new_document(args: &str) -> Result<NewDocument, String> {
    let mut parts = args.splitn(3, '|').map(str::trim);
    let (Some(category), Some(title), Some(content)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err("Usage: /add <category> | <title> | <content>".to_string());
    };

    let category = category
        .parse::<Category>()
        .map_err(|e| e.to_string())?;
    let new = NewDocument::new(category, title, content);
    new.validate().map_err(|e| e.to_string())?;
    Ok(new)
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}
