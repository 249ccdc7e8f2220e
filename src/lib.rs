//! Quizgen - study reviewers and quizzes from lecture documents
//!
//! Flow:
//! - extract: PDF pages / PPTX shapes → plain text
//! - prompt: text → reviewer or quiz prompt (truncated to the model budget)
//! - completion: prompt → model output via a chat-completions API
//! - parser: quiz output → structured items
//! - server: multipart HTTP endpoints over the above

pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod observability;
pub mod parser;
pub mod prompt;
pub mod server;
pub mod types;
pub mod upload;
pub mod utils;

pub use completion::{Completer, CompletionClient, CompletionError};
pub use config::{CompletionSettings, Config, LoggingConfig, ServerConfig};
pub use error::AppError;
pub use extract::{extract_text, ExtractError, Extractor, ExtractorRegistry};
pub use parser::parse_quiz;
pub use prompt::{build_prompt, question_count, PromptKind, MAX_CONTENT_CHARS};
pub use server::{create_router, run_server, AppState};
pub use types::*;
