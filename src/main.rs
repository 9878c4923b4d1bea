//! Promptsmith CLI - interactive prompt-engineering assistant.
//!
//! Wires the filesystem adapters to the conversation controller and
//! drives it from stdin. Commands: `/new`, `/select <n>`, `/regenerate`,
//! `/quit`; anything else is sent to the controller as an utterance.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use promptsmith::adapters::ai::{ClientOptions, HttpCompletionClient};
use promptsmith::adapters::catalog::FsResourceStore;
use promptsmith::adapters::storage::FileSettingsStore;
use promptsmith::application::{ControllerReply, ConversationController};
use promptsmith::config::AppConfig;
use promptsmith::domain::catalog::FrameworkCatalog;
use promptsmith::domain::composer::strip_code_fence;
use promptsmith::ports::SettingsStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("promptsmith=info")),
        )
        .init();

    let app_config = AppConfig::load()?;

    let settings = FileSettingsStore::new(&app_config.storage.settings_path);
    let profile = settings.load();
    let validation = profile.validate();
    if !validation.is_valid {
        eprintln!(
            "Configuration incomplete for the `{}` backend; missing: {}.",
            profile.active_service,
            validation.missing_fields.join(", ")
        );
        eprintln!(
            "Edit {} and fill in the listed fields.",
            settings.path().display()
        );
        std::process::exit(1);
    }

    let resources = Arc::new(FsResourceStore::new(&app_config.catalog.dir));
    let mut catalog = FrameworkCatalog::new();
    if !catalog.initialize(resources.as_ref()) {
        eprintln!(
            "Could not load the framework catalog from {}.",
            app_config.catalog.dir
        );
        std::process::exit(1);
    }

    let client = Arc::new(HttpCompletionClient::new(
        ClientOptions::default()
            .with_timeout(app_config.client.timeout())
            .with_max_retries(app_config.client.max_retries)
            .with_retry_base_delay(app_config.client.retry_base_delay()),
    ));

    let mut controller = ConversationController::new(
        catalog,
        resources,
        client,
        profile.active_service_config(),
    );

    println!("Promptsmith - describe what you need a prompt for.");
    println!("Commands: /new, /select <n>, /regenerate, /quit\n");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                controller.new_conversation();
                println!("Started a new conversation.\n");
            }
            "/regenerate" => match controller.regenerate().await {
                Ok(replies) => print_replies(&replies),
                Err(err) => eprintln!("error: {err}\n"),
            },
            _ if line.starts_with("/select") => {
                let index = line
                    .trim_start_matches("/select")
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1));
                match index {
                    Some(index) => match controller.select_framework(index).await {
                        Ok(replies) => print_replies(&replies),
                        Err(err) => eprintln!("error: {err}\n"),
                    },
                    None => eprintln!("usage: /select <number starting at 1>\n"),
                }
            }
            _ => match controller.handle_send(line).await {
                Ok(replies) => print_replies(&replies),
                Err(err) => eprintln!("error: {err}\n"),
            },
        }
    }

    Ok(())
}

fn print_replies(replies: &[ControllerReply]) {
    for reply in replies {
        match reply {
            ControllerReply::Assistant(text) => println!("{text}\n"),
            ControllerReply::Recommendations(frameworks) => {
                for (i, framework) in frameworks.iter().enumerate() {
                    println!(
                        "  {}. {} ({}) - {} - {} element(s)",
                        i + 1,
                        framework.name,
                        framework.name_en,
                        framework.complexity,
                        framework.elements
                    );
                    if !framework.reason.is_empty() {
                        println!("     {}", framework.reason);
                    }
                }
                println!();
            }
            ControllerReply::Questions { questions, .. } => {
                for (i, question) in questions.iter().enumerate() {
                    if question.hint.is_empty() {
                        println!("  {}. {}", i + 1, question.question);
                    } else {
                        println!("  {}. {} ({})", i + 1, question.question, question.hint);
                    }
                }
                println!();
            }
            ControllerReply::GeneratedPrompt(prompt) => {
                println!("--- generated prompt ---");
                println!("{}", strip_code_fence(prompt));
                println!("------------------------\n");
            }
        }
    }
}
