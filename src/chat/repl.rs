use std::io::{BufRead, Write};

use super::session::ChatSession;
use crate::error::AppError;

const HELP: &str = "\
Commands:
  /overview     overall status
  /risk         warning and danger batches
  /maintenance  maintenance advice
  /examples     example questions
  /history      this session's transcript
  /saved        messages from earlier sessions (--save-history)
  /help         this help
  /quit, /exit  leave";

const EXAMPLES: &[&str] = &[
    "Looking at the temperature trend, what problems should we expect?",
    "What concrete steps would improve energy efficiency?",
    "Based on this data, what operating temperature range should we target?",
    "What preventive measures should we take for seasonal temperature changes?",
    "Group batches with similar patterns and suggest an operating strategy.",
    "Are the current alert thresholds appropriate?",
];

const SAVED_LIMIT: usize = 20;

enum Command<'a> {
    Quit,
    Help,
    History,
    Examples,
    Saved,
    Ask(&'a str),
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Some(Command::Ask(line));
    };
    Some(match command.to_ascii_lowercase().as_str() {
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        "history" => Command::History,
        "examples" => Command::Examples,
        "saved" => Command::Saved,
        "overview" => Command::Ask("What is the overall status?"),
        "risk" => Command::Ask("Are there any risk factors?"),
        "maintenance" => Command::Ask("Give me maintenance advice"),
        _ => Command::Unknown(line),
    })
}

/// Read questions line by line until `/quit` or EOF.
///
/// Failed answers are reported and the loop continues.
pub(crate) fn run_interactive<R: BufRead, W: Write>(
    session: &mut ChatSession,
    input: R,
    mut output: W,
) -> Result<(), AppError> {
    writeln!(output, "{}\n", session.welcome())?;
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            None => {}
            Some(Command::Quit) => break,
            Some(Command::Help) => writeln!(output, "{HELP}")?,
            Some(Command::History) => writeln!(output, "{}", session.transcript().trim_end())?,
            Some(Command::Examples) => {
                for (i, example) in EXAMPLES.iter().enumerate() {
                    writeln!(output, "{}. {example}", i + 1)?;
                }
            }
            Some(Command::Saved) => match session.saved(SAVED_LIMIT) {
                None => writeln!(output, "History is not being saved (use --save-history).")?,
                Some(Err(e)) => writeln!(output, "Error: {e}")?,
                Some(Ok(saved)) if saved.is_empty() => writeln!(output, "No saved messages.")?,
                Some(Ok(saved)) => {
                    for stored in saved {
                        writeln!(
                            output,
                            "[{}] {} ({}, session {}): {}",
                            stored.message.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            stored.message.role.as_str(),
                            stored.provider,
                            stored.session_id,
                            stored.message.content.lines().next().unwrap_or("")
                        )?;
                    }
                }
            },
            Some(Command::Unknown(raw)) => {
                writeln!(output, "Unknown command {raw}. Type /help for commands.")?;
            }
            Some(Command::Ask(question)) => match session.ask(question) {
                Ok(answer) => writeln!(output, "\n{}\n", answer.trim_end())?,
                Err(e) => {
                    tracing::warn!(error = %e, "question failed");
                    writeln!(output, "\nError: {e}\n")?;
                }
            },
        }
        write!(output, "> ")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

/// Answer each query in order; the first failure ends the run
pub(crate) fn run_queries<W: Write>(
    session: &mut ChatSession,
    queries: &[String],
    mut output: W,
) -> Result<(), AppError> {
    for (i, query) in queries.iter().enumerate() {
        if i > 0 {
            writeln!(output)?;
        }
        if queries.len() > 1 {
            writeln!(output, "> {}", query.trim())?;
        }
        let answer = session.ask(query)?;
        writeln!(output, "{}", answer.trim_end())?;
    }
    Ok(())
}
