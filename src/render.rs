//! Terminal output for the chat view.
//!
//! A terminal cannot redraw its scrollback, so [`TranscriptPane`] remembers
//! what it has already printed and only emits the difference between frames.
//! New output always lands at the bottom, next to the prompt.

use std::io::{self, Stdout, Write};

use crate::dispatcher::SkipReason;
use crate::types::{Message, Role};
use crate::view::{Body, ChatView, WELCOME_TEXT, WELCOME_TITLE};

/// ANSI escape code for dim text (used for the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for blue text (used for the user's label).
const ANSI_BLUE: &str = "\x1b[34m";

/// ANSI escape code for magenta text (used for the model's label).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// ANSI escape code for red text (used for the error banner).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for cyan text (used for suggestions).
const ANSI_CYAN: &str = "\x1b[36m";

/// Carriage return plus erase-line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording renderers in tests
pub trait Renderer: Send {
    /// Print the greeting and the numbered suggestions.
    fn print_welcome(&mut self, title: &str, text: &str, suggestions: &[&str]);

    /// Print one transcript message.
    fn print_message(&mut self, message: &Message);

    /// Show the typing indicator.
    fn start_typing(&mut self);

    /// Remove the typing indicator.
    fn finish_typing(&mut self);

    /// Print an error banner.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    model_label: String,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            model_label: "Gemini".to_string(),
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label(&self, role: Role) -> String {
        let (name, color) = match role {
            Role::User => ("You", ANSI_BLUE),
            Role::Model => (self.model_label.as_str(), ANSI_MAGENTA),
        };
        if self.use_color {
            format!("{ANSI_BOLD}{color}{name}:{ANSI_RESET}")
        } else {
            format!("{name}:")
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_welcome(&mut self, title: &str, text: &str, suggestions: &[&str]) {
        if self.use_color {
            println!("{ANSI_BOLD}{title}{ANSI_RESET}");
        } else {
            println!("{title}");
        }
        println!("{text}\n");
        println!("Try one of these (type /<number>):");
        for (index, suggestion) in suggestions.iter().enumerate() {
            if self.use_color {
                println!("  {ANSI_CYAN}{}.{ANSI_RESET} {suggestion}", index + 1);
            } else {
                println!("  {}. {suggestion}", index + 1);
            }
        }
        println!();
        self.flush();
    }

    fn print_message(&mut self, message: &Message) {
        println!("{} {}", self.label(message.role()), message.text());
        if message.role() == Role::Model {
            println!();
        }
        self.flush();
    }

    fn start_typing(&mut self) {
        let label = self.label(Role::Model);
        if self.use_color {
            print!("{label} {ANSI_DIM}...{ANSI_RESET}");
        } else {
            print!("{label} ...");
        }
        self.flush();
    }

    fn finish_typing(&mut self) {
        if self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        } else {
            println!();
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }
}

/// Tracks what has been printed so each frame only adds what is new.
#[derive(Debug, Default)]
pub struct TranscriptPane {
    shown: usize,
    welcome_shown: bool,
    typing_shown: bool,
    last_banner: Option<String>,
}

impl TranscriptPane {
    /// Creates a pane that has printed nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transcript messages already printed.
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Prints whatever changed since the previous frame.
    pub fn render(&mut self, view: &ChatView<'_>, renderer: &mut dyn Renderer) {
        match &view.body {
            Body::Welcome { suggestions } => {
                self.clear_typing(renderer);
                // A reverted first message brings the welcome view back; the
                // suggestions are already on screen.
                self.shown = 0;
                if !self.welcome_shown {
                    renderer.print_welcome(WELCOME_TITLE, WELCOME_TEXT, suggestions);
                    self.welcome_shown = true;
                }
            }
            Body::Transcript { messages, typing } => {
                if messages.len() < self.shown {
                    self.shown = messages.len();
                }
                if self.shown < messages.len() {
                    self.clear_typing(renderer);
                    for message in &messages[self.shown..] {
                        renderer.print_message(message);
                    }
                    self.shown = messages.len();
                }
                if *typing && !self.typing_shown {
                    renderer.start_typing();
                    self.typing_shown = true;
                } else if !*typing {
                    self.clear_typing(renderer);
                }
            }
        }

        match view.banner {
            Some(banner) if self.last_banner.as_deref() != Some(banner.message.as_str()) => {
                self.clear_typing(renderer);
                renderer.print_error(&banner.message);
                self.last_banner = Some(banner.message.clone());
            }
            Some(_) => {}
            None => self.last_banner = None,
        }
    }

    /// Prints the frame after an input was ignored.
    ///
    /// Without a session every input is ignored, so the banner is repeated
    /// each time to say why.
    pub fn render_skipped(
        &mut self,
        reason: SkipReason,
        view: &ChatView<'_>,
        renderer: &mut dyn Renderer,
    ) {
        if let (SkipReason::NoSession, Some(banner)) = (reason, view.banner) {
            renderer.print_error(&banner.message);
            self.last_banner = Some(banner.message.clone());
        }
        self.render(view, renderer);
    }

    fn clear_typing(&mut self, renderer: &mut dyn Renderer) {
        if self.typing_shown {
            renderer.finish_typing();
            self.typing_shown = false;
        }
    }
}
