//! Interactive chat application for conversing with Gemini.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings (reads GEMINI_API_KEY or API_KEY)
//! gemini-chat
//!
//! # Specify a model
//! gemini-chat --model gemini-2.5-pro
//!
//! # Bound each reply to 20 seconds, without colors
//! gemini-chat --timeout-secs 20 --no-color
//!
//! # Cooler sampling and shorter replies
//! gemini-chat --temperature 0.2 --max-output-tokens 256
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/1` .. `/4` - Send one of the welcome suggestions
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application
//!
//! Ctrl+C while waiting for a reply abandons that request.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use gemini_chat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatInput, PlainTextRenderer, Renderer, TranscriptPane,
    help_text, parse_input,
};
use gemini_chat::{
    Dispatcher, Error, GeminiSession, SUGGESTIONS, SendOutcome, build_view, create_session,
};

/// Main entry point for the gemini-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemini-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut dispatcher = Dispatcher::from_session(create_session(&config.session_config()))
        .with_request_timeout(config.request_timeout);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut pane = TranscriptPane::new();
    let mut rl = DefaultEditor::new()?;

    // Ctrl+C outside the prompt abandons the in-flight request.
    let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel::<()>();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(());
    })?;

    println!("Gemini Chat (model: {})", config.model);
    println!("Type /help for commands, /quit to exit\n");
    pane.render(
        &build_view(dispatcher.state(), dispatcher.transcript()),
        &mut renderer,
    );

    loop {
        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let command = match parse_input(&line) {
                    ChatInput::Blank => continue,
                    ChatInput::Message(text) => {
                        let _ = rl.add_history_entry(line.trim());
                        dispatcher.set_draft(text);
                        None
                    }
                    ChatInput::Command(command) => {
                        let _ = rl.add_history_entry(line.trim());
                        Some(command)
                    }
                };

                match command {
                    None => {}
                    Some(ChatCommand::Suggest(index)) => dispatcher.set_draft(SUGGESTIONS[index]),
                    Some(ChatCommand::Quit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Some(ChatCommand::Help) => {
                        for line in help_text().lines() {
                            println!("    {}", line);
                        }
                        continue;
                    }
                    Some(ChatCommand::ListSuggestions) => {
                        for (index, suggestion) in SUGGESTIONS.iter().enumerate() {
                            println!("    {}. {}", index + 1, suggestion);
                        }
                        continue;
                    }
                    Some(ChatCommand::Stats) => {
                        print_stats(&dispatcher);
                        continue;
                    }
                    Some(ChatCommand::ShowConfig) => {
                        print_config(&config);
                        continue;
                    }
                    Some(ChatCommand::Invalid(message)) => {
                        renderer.print_error(&message);
                        continue;
                    }
                }

                let draft = dispatcher.state().draft.clone();
                let pending = match dispatcher.begin(&draft) {
                    Ok(pending) => pending,
                    Err(reason) => {
                        tracing::debug!(?reason, "input ignored");
                        pane.render_skipped(
                            reason,
                            &build_view(dispatcher.state(), dispatcher.transcript()),
                            &mut renderer,
                        );
                        continue;
                    }
                };
                pane.render(
                    &build_view(dispatcher.state(), dispatcher.transcript()),
                    &mut renderer,
                );

                while interrupts.try_recv().is_ok() {}
                let result = tokio::select! {
                    result = dispatcher.exchange(&pending) => result,
                    _ = interrupts.recv() => Err(Error::abort("interrupted by user")),
                };
                if let SendOutcome::Failed(err) = dispatcher.settle(pending, result) {
                    tracing::debug!(error = %err, "send rolled back");
                }
                pane.render(
                    &build_view(dispatcher.state(), dispatcher.transcript()),
                    &mut renderer,
                );
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(dispatcher: &Dispatcher<GeminiSession>) {
    let stats = dispatcher.stats();
    println!("    Session Statistics:");
    match dispatcher.session() {
        Some(session) => println!("      Model: {}", session.model()),
        None => println!("      Model: (no session)"),
    }
    println!("      Messages: {}", dispatcher.transcript().len());
    println!(
        "      Requests: {} sent, {} answered, {} failed",
        stats.sent, stats.replied, stats.failed
    );
    println!("      Ignored inputs: {}", stats.skipped);
}

fn print_config(config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Model: {}", config.model);
    match config.system_instruction.as_deref() {
        Some(instruction) => println!("      System instruction: {}", instruction),
        None => println!("      System instruction: (none)"),
    }
    println!(
        "      Request timeout: {}s",
        config.request_timeout.as_secs()
    );
    match config.base_url.as_deref() {
        Some(url) => println!("      Base URL: {}", url),
        None => println!("      Base URL: (default)"),
    }
    match config.generation.temperature {
        Some(temperature) => println!("      Temperature: {}", temperature),
        None => println!("      Temperature: (model default)"),
    }
    match config.generation.max_output_tokens {
        Some(tokens) => println!("      Max output tokens: {}", tokens),
        None => println!("      Max output tokens: (model default)"),
    }
    println!(
        "      Colors: {}",
        if config.use_color { "on" } else { "off" }
    );
}
