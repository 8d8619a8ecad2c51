// Command abbreviation matching for the stacklist CLI

/// Find all commands that start with the given prefix (case-insensitive)
pub fn find_matching_commands<'a>(prefix: &str, commands: &'a [&str]) -> Vec<&'a str> {
    let prefix_lower = prefix.to_lowercase();
    commands.iter()
        .filter(|cmd| cmd.to_lowercase().starts_with(&prefix_lower))
        .copied()
        .collect()
}

/// Find a unique command match for the given prefix
/// Returns Ok(command) if exactly one match, Err(matches) if ambiguous, Err(empty) if no match
/// Exact matches take precedence over prefix matches
pub fn find_unique_command<'a>(prefix: &str, commands: &'a [&str]) -> Result<&'a str, Vec<&'a str>> {
    let prefix_lower = prefix.to_lowercase();
    for cmd in commands {
        if cmd.to_lowercase() == prefix_lower {
            return Ok(*cmd);
        }
    }

    let matches = find_matching_commands(prefix, commands);

    if matches.len() == 1 {
        Ok(matches[0])
    } else {
        Err(matches)
    }
}

/// Top-level commands
pub const TOP_LEVEL_COMMANDS: &[&str] = &[
    "init", "folders", "stacks", "sections", "categories", "list"
];

pub const FOLDER_COMMANDS: &[&str] = &["add"];

pub const STACK_COMMANDS: &[&str] = &["add", "approve", "trash"];

pub const SECTION_COMMANDS: &[&str] = &["add", "list"];

pub const CATEGORY_COMMANDS: &[&str] = &["add"];

/// Get subcommands for a given top-level command
pub fn get_subcommands(command: &str) -> Option<&'static [&'static str]> {
    match command {
        "folders" => Some(FOLDER_COMMANDS),
        "stacks" => Some(STACK_COMMANDS),
        "sections" => Some(SECTION_COMMANDS),
        "categories" => Some(CATEGORY_COMMANDS),
        _ => None,
    }
}

/// Expand command abbreviations in the leading command and subcommand.
/// Arguments that match nothing are passed through for clap to report.
pub fn expand_command_abbreviations(args: Vec<String>) -> Result<Vec<String>, String> {
    let mut args = args.into_iter();
    let mut expanded = Vec::new();

    let Some(first) = args.next() else {
        return Ok(expanded);
    };
    if first.starts_with('-') {
        expanded.push(first);
        expanded.extend(args);
        return Ok(expanded);
    }

    let command = match find_unique_command(&first, TOP_LEVEL_COMMANDS) {
        Ok(full_cmd) => full_cmd.to_string(),
        Err(matches) if matches.is_empty() => first,
        Err(matches) => {
            return Err(format!(
                "Ambiguous command '{}'. Did you mean one of: {}?",
                first,
                matches.join(", ")
            ));
        }
    };

    let subcommands = get_subcommands(&command);
    expanded.push(command);

    if let Some(subcommands) = subcommands {
        if let Some(next_arg) = args.next() {
            if next_arg.starts_with('-') {
                expanded.push(next_arg);
            } else {
                match find_unique_command(&next_arg, subcommands) {
                    Ok(full_subcmd) => expanded.push(full_subcmd.to_string()),
                    Err(matches) if matches.is_empty() => expanded.push(next_arg),
                    Err(matches) => {
                        return Err(format!(
                            "Ambiguous subcommand '{}'. Did you mean one of: {}?",
                            next_arg,
                            matches.join(", ")
                        ));
                    }
                }
            }
        }
    }

    expanded.extend(args);
    Ok(expanded)
}
