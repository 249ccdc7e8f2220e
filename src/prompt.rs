//! Prompt templates for reviewer and quiz generation
//!
//! Extracted text is prefix-truncated to [`MAX_CONTENT_CHARS`] (roughly 90% of
//! the downstream model's context window) before being embedded.

use crate::types::QuestionKind;
use crate::utils::char_prefix;

/// Hard cap on embedded content, in characters
pub const MAX_CONTENT_CHARS: usize = 43_000;

/// Which template to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Structured study guide, returned verbatim
    Reviewer,
    /// Quiz with the given number of questions in the typed grammar
    Quiz { questions: usize },
}

/// Content as embedded in a prompt
pub fn truncate_content(text: &str) -> &str {
    char_prefix(text, MAX_CONTENT_CHARS)
}

/// Number of quiz questions to request for text of `char_len` characters.
///
/// Step function: <1000 → 10, <3000 → 12, <6000 → 15, otherwise 20.
pub fn question_count(char_len: usize) -> usize {
    match char_len {
        0..=999 => 10,
        1000..=2999 => 12,
        3000..=5999 => 15,
        _ => 20,
    }
}

/// Render the prompt for `text`
pub fn build_prompt(text: &str, kind: PromptKind) -> String {
    let content = truncate_content(text);
    match kind {
        PromptKind::Reviewer => reviewer_prompt(content),
        PromptKind::Quiz { questions } => quiz_prompt(content, questions),
    }
}

fn reviewer_prompt(content: &str) -> String {
    format!(
        "You are a professional academic assistant trained to create student reviewers based on educational content. \
         Using the provided content, generate a complete and structured reviewer suitable for exam preparation.\n\n\
         The reviewer should:\n\
         - Be organized by topic or lesson, using clear section titles\n\
         - Present concepts in bullet points, numbered lists, or short paragraphs\n\
         - Define all important terms and include key examples where relevant\n\
         - Highlight essential facts and principles students must memorize or understand\n\
         - Avoid commentary or filler; focus strictly on informative content\n\
         - Use clear, concise language suitable for college students\n\n\
         Format the output like a printable reviewer or summary guide, just like a traditional study handout. \
         Ensure that the reviewer is complete, accurate, well-organized and easy to read.\n\n\
         Do not include activities or quizzes, just focus on the content.\n\n\
         Content:\n{}\n",
        content
    )
}

fn quiz_prompt(content: &str, questions: usize) -> String {
    let mc = QuestionKind::MultipleChoice.label();
    let tf = QuestionKind::TrueFalse.label();
    let sa = QuestionKind::ShortAnswer.label();
    format!(
        "You are an expert quiz generator for students. \
         Based on the following educational content, generate a quiz with exactly {questions} questions. \
         Questions should be a mix of multiple choice, true or false, and short answer. \
         Each question should be clear and relevant to the content.\n\n\
         Use exactly this format for every question, and separate questions with a line containing only ----\n\n\
         Q: <question text>\n\
         Type: <{mc}|{tf}|{sa}>\n\
         A. <choice>\n\
         B. <choice>\n\
         C. <choice>\n\
         D. <choice>\n\
         Answer: <A|B|C|D|True|False|short answer text>\n\
         ----\n\n\
         Rules:\n\
         - Only {mc} questions have the four lettered choices A to D, and their answer is a single letter.\n\
         - {tf} questions state a claim; their answer is True or False.\n\
         - {sa} questions have a brief free-text answer.\n\
         - Do not number the questions and do not add any text before the first question or after the last.\n\n\
         Content:\n{content}\n"
    )
}
