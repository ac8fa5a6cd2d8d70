//! Command tables and the shared read-dispatch loop.
//!
//! # Responsibility
//! - Parse one input line into a command name and arguments.
//! - Resolve names through explicit static tables.
//! - Report handler errors without leaving the loop.
//!
//! # Invariants
//! - Command names are matched case-insensitively.
//! - A failed or cancelled command never ends the loop; only `Back`/`Exit` do.
//! - A command returning `Flow::Changed` is persisted before the next read.
//! - End of input at the command prompt ends the whole session.

pub mod book;
pub mod menu;
pub mod notes;

use crate::console::Prompt;
use assistant_core::{AppError, AppResult};
use colored::Colorize;
use log::{debug, warn};

pub const INVALID_COMMAND: &str = "Invalid command. Type '?' for help.";

/// Answer that clears an optional field in edit prompts.
pub(crate) const CLEAR: &str = "-";

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Continue after the module state was modified.
    Changed,
    /// Leave the current module and return to its parent.
    Back,
    /// Leave every module and end the session.
    Exit,
}

/// Handler signature shared by every command table over state `S`.
///
/// The last argument is the raw input after the command name.
pub type Handler<S> = fn(&mut S, &mut dyn Prompt, &str) -> AppResult<Flow>;

/// One command table row.
pub struct CommandSpec<H> {
    /// Primary name first, then aliases.
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: H,
}

pub fn lookup<'t, H>(table: &'t [CommandSpec<H>], name: &str) -> Option<&'t CommandSpec<H>> {
    table
        .iter()
        .find(|command| command.names.iter().any(|candidate| *candidate == name))
}

/// Splits `line` into a lower-cased command name and the untouched rest.
///
/// Returns `None` for blank input.
pub fn parse_input(line: &str) -> Option<(String, &str)> {
    let line = line.trim_start();
    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    let (name, rest) = line.split_at(end);
    if name.is_empty() {
        return None;
    }
    let rest = rest.strip_prefix(char::is_whitespace).unwrap_or(rest);
    Some((name.to_lowercase(), rest))
}

/// Runs the read-dispatch loop for one module until a handler leaves it.
///
/// `persist` is called after every command that reports `Flow::Changed`.
pub fn run_module<S>(
    state: &mut S,
    prompt: &mut dyn Prompt,
    label: &str,
    table: &[CommandSpec<Handler<S>>],
    persist: &dyn Fn(&S) -> AppResult<()>,
) -> Flow {
    loop {
        let line = match prompt.prompt(label, "") {
            Ok(line) => line,
            Err(_) => {
                debug!("event=command_loop module=cli status=eof label={label}");
                return Flow::Exit;
            }
        };
        let Some((name, rest)) = parse_input(&line) else {
            continue;
        };
        let Some(command) = lookup(table, &name) else {
            prompt.print(&INVALID_COMMAND.red().to_string());
            continue;
        };

        match (command.handler)(state, prompt, rest) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Changed) => {
                if let Err(err) = persist(state) {
                    warn!(
                        "event=autosave module=cli status=error command={}",
                        command.names[0]
                    );
                    prompt.print(&err.to_string().red().to_string());
                }
            }
            Ok(flow) => return flow,
            Err(AppError::Cancelled) => {
                prompt.print(&AppError::Cancelled.to_string().yellow().to_string());
            }
            Err(err) => {
                warn!(
                    "event=command module=cli status=error command={} kind={}",
                    command.names[0],
                    error_kind(&err)
                );
                prompt.print(&err.to_string().red().to_string());
            }
        }
    }
}

fn error_kind(err: &AppError) -> &'static str {
    match err {
        AppError::Validation(_) => "validation",
        AppError::NotFound { .. } => "not_found",
        AppError::AlreadyExists { .. } => "already_exists",
        AppError::InvalidInput(_) => "invalid_input",
        AppError::Cancelled => "cancelled",
        AppError::Storage(_) => "storage",
    }
}

/// Uses `given` when non-blank, otherwise asks for the value.
pub(crate) fn required(prompt: &mut dyn Prompt, label: &str, given: &str) -> AppResult<String> {
    let value = if given.trim().is_empty() {
        prompt.prompt(label, "")?
    } else {
        given.to_string()
    };
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{label} cannot be empty.")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{lookup, parse_input, run_module, CommandSpec, Flow, Handler, INVALID_COMMAND};
    use crate::console::tests::{output, scripted};
    use crate::console::Prompt;
    use assistant_core::{AppError, AppResult};
    use std::cell::Cell;

    fn bump(count: &mut u32, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
        *count += 1;
        Ok(Flow::Changed)
    }

    fn fail(_: &mut u32, _: &mut dyn Prompt, rest: &str) -> AppResult<Flow> {
        Err(AppError::InvalidInput(format!("bad [{rest}]")))
    }

    fn leave(_: &mut u32, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
        Ok(Flow::Back)
    }

    static TABLE: &[CommandSpec<Handler<u32>>] = &[
        CommandSpec {
            names: &["bump", "b"],
            usage: "",
            description: "count",
            handler: bump,
        },
        CommandSpec {
            names: &["fail"],
            usage: "",
            description: "fail",
            handler: fail,
        },
        CommandSpec {
            names: &["back"],
            usage: "",
            description: "leave",
            handler: leave,
        },
    ];

    fn no_persist(_: &u32) -> AppResult<()> {
        Ok(())
    }

    #[test]
    fn parse_input_lowercases_name_and_keeps_rest_verbatim() {
        let (name, rest) = parse_input("  ADD John  Smith").unwrap();
        assert_eq!(name, "add");
        assert_eq!(rest, "John  Smith");
        assert_eq!(parse_input("all").unwrap().1, "");
        assert!(parse_input("   ").is_none());
    }

    #[test]
    fn lookup_resolves_aliases() {
        assert_eq!(lookup(TABLE, "b").unwrap().names[0], "bump");
        assert!(lookup(TABLE, "nope").is_none());
    }

    #[test]
    fn loop_survives_errors_and_unknown_commands() {
        let mut console = scripted(&["bump", "", "what", "fail x  y", "B", "back"]);
        let mut count = 0;
        let flow = run_module(&mut count, &mut console, "test", TABLE, &no_persist);
        assert_eq!(flow, Flow::Back);
        assert_eq!(count, 2);

        let printed = output(console);
        assert!(printed.contains(INVALID_COMMAND));
        assert!(printed.contains("bad [x  y]"));
    }

    #[test]
    fn changed_state_is_persisted_after_each_command() {
        let saved = Cell::new(Vec::new());
        let persist = |count: &u32| -> AppResult<()> {
            let mut seen = saved.take();
            seen.push(*count);
            saved.set(seen);
            Ok(())
        };
        let mut console = scripted(&["bump", "fail", "bump"]);
        let mut count = 0;
        assert_eq!(
            run_module(&mut count, &mut console, "test", TABLE, &persist),
            Flow::Exit
        );
        assert_eq!(saved.take(), vec![1, 2]);
    }

    #[test]
    fn persist_failure_is_reported_and_loop_continues() {
        let persist =
            |_: &u32| -> AppResult<()> { Err(AppError::InvalidInput("disk full".to_string())) };
        let mut console = scripted(&["bump", "back"]);
        let mut count = 0;
        let flow = run_module(&mut count, &mut console, "test", TABLE, &persist);
        assert_eq!(flow, Flow::Back);
        assert!(output(console).contains("disk full"));
    }

    #[test]
    fn end_of_input_exits() {
        let mut console = scripted(&["bump"]);
        let mut count = 0;
        assert_eq!(
            run_module(&mut count, &mut console, "test", TABLE, &no_persist),
            Flow::Exit
        );
        assert_eq!(count, 1);
    }
}
