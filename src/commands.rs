//! Session commands and alias resolution

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All commands understood inside a session
pub const COMMANDS: &[Command] = &[
  Command {
    name: "list",
    aliases: &["ls", "jobs"],
    description: "List jobs (--status, --type, --sort, --search, --page, --limit)",
  },
  Command {
    name: "show",
    aliases: &["get", "job"],
    description: "Show a single job by id",
  },
  Command {
    name: "create",
    aliases: &["add", "new"],
    description: "Add a job (--company, --position, ...)",
  },
  Command {
    name: "update",
    aliases: &["edit", "set"],
    description: "Change fields of a job",
  },
  Command {
    name: "delete",
    aliases: &["rm", "remove"],
    description: "Delete a job by id",
  },
  Command {
    name: "stats",
    aliases: &["statistics"],
    description: "Application statistics",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Run list/show/stats bypassing the cache",
  },
  Command {
    name: "cache",
    aliases: &["cached"],
    description: "Show what is cached",
  },
  Command {
    name: "clear",
    aliases: &["flush"],
    description: "Drop all cached data",
  },
  Command {
    name: "help",
    aliases: &["h", "?"],
    description: "Show this help",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Leave the session",
  },
];

/// How well `input` (already lowercased) names `cmd`; lower is better
fn match_rank(cmd: &Command, input: &str) -> Option<u8> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else {
    None
  }
}

/// Get suggestions for a given input, best match first
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.to_lowercase();

  let mut matches: Vec<(&'static Command, u8)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_rank(cmd, &input).map(|rank| (cmd, rank)))
    .collect();
  matches.sort_by_key(|(_, rank)| *rank);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Resolve a typed command word to a command.
///
/// Exact names and aliases always win; a prefix only resolves when it is
/// unambiguous.
pub fn resolve(input: &str) -> Option<&'static Command> {
  let input_lower = input.to_lowercase();
  let suggestions = get_suggestions(&input_lower);
  let first = *suggestions.first()?;

  let exact = first.name == input_lower || first.aliases.contains(&input_lower.as_str());
  if exact || suggestions.len() == 1 {
    Some(first)
  } else {
    None
  }
}

/// Help text listing every command
pub fn help_text() -> String {
  COMMANDS
    .iter()
    .map(|cmd| {
      format!(
        "  {:<8} {:<18} {}",
        cmd.name,
        cmd.aliases.join(", "),
        cmd.description
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}
