//! Line commands understood by the terminal host.

use crate::domain::TodoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    /// `None` when the id did not parse; treated as a no-op.
    Toggle(Option<TodoId>),
    /// Rename; a missing title cancels the edit.
    Edit(Option<TodoId>, Option<String>),
    Remove(Option<TodoId>),
    List,
    Json,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  add <title>         add a todo
  toggle <id>         mark done / not done
  edit <id> [title]   rename (no title cancels)
  rm <id>             delete
  ls                  show the list
  json                dump the list as JSON
  help                this text
  quit                exit";

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" | "a" => Command::Add(rest.to_string()),
            "toggle" | "t" | "done" => Command::Toggle(rest.parse().ok()),
            "edit" | "e" => {
                let (id, title) = match rest.split_once(char::is_whitespace) {
                    Some((id, title)) => (id, Some(title.to_string())),
                    None => (rest, None),
                };
                Command::Edit(id.parse().ok(), title)
            }
            "rm" | "delete" | "del" => Command::Remove(rest.parse().ok()),
            "ls" | "list" => Command::List,
            "json" => Command::Json,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}
