//! Reviewer and quiz command handlers

use anyhow::{Context, Result};
use std::path::Path;

use quizgen::generate::{generate_quiz, generate_reviewer};
use quizgen::{CompletionClient, Config, QuizItem, QuizResponse};

use super::extract::load_text;

pub async fn run_reviewer(config: &Config, file: &Path) -> Result<()> {
    let text = load_text(file).await?;
    let client = CompletionClient::new(&config.completion)
        .with_context(|| format!("Set {} to generate content", quizgen::config::API_KEY_VAR))?;

    let reviewer = generate_reviewer(&client, &text).await?;
    println!("{}", reviewer);
    Ok(())
}

pub async fn run_quiz(config: &Config, file: &Path, json: bool) -> Result<()> {
    let text = load_text(file).await?;
    let client = CompletionClient::new(&config.completion)
        .with_context(|| format!("Set {} to generate content", quizgen::config::API_KEY_VAR))?;

    let quiz = generate_quiz(&client, &text).await?;

    if json {
        let output = serde_json::to_string_pretty(&QuizResponse { quiz })?;
        println!("{}", output);
        return Ok(());
    }

    if quiz.is_empty() {
        println!("The model response contained no parseable questions.");
        return Ok(());
    }

    for item in &quiz {
        print_item(item);
    }
    println!("{} questions", quiz.len());
    Ok(())
}

fn print_item(item: &QuizItem) {
    println!("\x1b[1m{}. {}\x1b[0m  [{}]", item.number, item.question, item.kind.label());
    for (letter, choice) in &item.choices {
        println!("   {}. {}", letter, choice);
    }
    println!("   \x1b[32mAnswer:\x1b[0m {}\n", item.answer);
}
