use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

// @module: Console questions behind a trait so runs can be scripted

/// Source of answers to interactive questions
pub trait Prompter {
    /// Show `question` and return one answer line without its line terminator.
    /// End of input reads as an empty answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompter reading from stdin and writing questions to stdout
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(strip_line_ending(&line).to_string())
    }
}

/// Prompter answering from a fixed queue; records every question
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }

    /// Questions asked so far
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        (**self).ask(question)
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Only a literal `y`, in either case, confirms.
pub fn is_affirmative(answer: &str) -> bool {
    answer.to_lowercase() == "y"
}

/// Trimmed deck name, or `default` when the answer is blank
pub fn resolve_deck_name(answer: &str, default: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
