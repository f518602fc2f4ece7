//! Command structure extraction
//!
//! A command is an escape-prefixed identifier followed by optional `[...]`
//! groups and required `{...}` groups. The *structure skeleton* keeps the name
//! and one placeholder per group; the *payload* is the text of the last group,
//! the part a translator is allowed to rewrite.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Skeleton and payload of a single command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CommandStructure {
    /// Identifier following the backslash
    pub command_name: String,
    /// Name plus `[]` per optional group and `{}` per required group
    pub structure: String,
    /// Inner text of the last required group, else of the last optional group
    pub content: String,
    /// The command text the structure was extracted from
    pub full_command: String,
}

/// Extract the structure of a command substring.
///
/// Returns `None` when `command` does not start with `\` followed by at least
/// one ASCII alphanumeric character.
///
/// Optional groups are read first, then required groups, so the skeleton
/// always lists `[]` markers before `{}` markers. A group left open at the end
/// of the input is not counted.
///
/// ```rust
/// use texguard::extract_command_structure;
///
/// let s = extract_command_structure(r"\section[Intro]{Introduction}").unwrap();
/// assert_eq!(s.structure, r"\section[]{}");
/// assert_eq!(s.content, "Introduction");
/// ```
pub fn extract_command_structure(command: &str) -> Option<CommandStructure> {
    let name_end = command_name_end(command, 0)?;
    let command_name = &command[1..name_end];

    let mut pos = skip_whitespace(command, name_end);

    let mut optional: Vec<&str> = Vec::new();
    while command[pos..].starts_with('[') {
        match close_group(command, pos, '[', ']') {
            Some(end) => {
                optional.push(&command[pos + 1..end - 1]);
                pos = end;
            }
            None => {
                pos = command.len();
                break;
            }
        }
    }

    pos = skip_whitespace(command, pos);

    let mut required: Vec<&str> = Vec::new();
    while command[pos..].starts_with('{') {
        match close_group(command, pos, '{', '}') {
            Some(end) => {
                required.push(&command[pos + 1..end - 1]);
                pos = end;
            }
            None => break,
        }
    }

    let content = required
        .last()
        .or_else(|| optional.last())
        .copied()
        .unwrap_or("");

    let groups = optional.len() + required.len();
    let mut structure = String::with_capacity(command_name.len() + 1 + 2 * groups);
    structure.push('\\');
    structure.push_str(command_name);
    for _ in &optional {
        structure.push_str("[]");
    }
    for _ in &required {
        structure.push_str("{}");
    }

    Some(CommandStructure {
        command_name: command_name.to_string(),
        structure,
        content: content.to_string(),
        full_command: command.to_string(),
    })
}

/// Byte offset just past the command name starting at `start`.
///
/// `start` must point at the backslash.
pub(crate) fn command_name_end(text: &str, start: usize) -> Option<usize> {
    let rest = text.get(start..)?.strip_prefix('\\')?;
    let len = rest.bytes().take_while(u8::is_ascii_alphanumeric).count();
    if len == 0 {
        None
    } else {
        Some(start + 1 + len)
    }
}

/// Find where a command's parameter groups end inside a larger text.
///
/// Whitespace between the name and the first group is part of the command only
/// when a group actually follows. Groups must be adjacent; the scan stops at the
/// first character outside an open group that does not open a new one. An
/// unterminated group runs to the end of the text.
pub(crate) fn scan_command_end(text: &str, name_end: usize) -> usize {
    let after_ws = skip_whitespace(text, name_end);
    if !(text[after_ws..].starts_with('[') || text[after_ws..].starts_with('{')) {
        return name_end;
    }

    let mut brace_depth = 0usize;
    let mut bracket_depth = 0usize;
    let mut end = after_ws;

    for (offset, c) in text[after_ws..].char_indices() {
        let in_brace = brace_depth > 0;
        let in_bracket = bracket_depth > 0;
        match c {
            '[' if !in_brace => bracket_depth += 1,
            ']' if in_bracket => bracket_depth -= 1,
            '{' if !in_bracket => brace_depth += 1,
            '}' if in_brace => brace_depth -= 1,
            _ if !in_brace && !in_bracket => break,
            _ => {}
        }
        end = after_ws + offset + c.len_utf8();
    }

    end
}

/// Environment name of a `\begin{...}` / `\end{...}` command: the text between
/// the first `{` and the next `}`.
pub fn environment_name(content: &str) -> Option<&str> {
    let open = content.find('{')?;
    let rest = &content[open + 1..];
    let close = rest.find('}')?;
    Some(&rest[..close])
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Byte offset just past the delimiter closing the group opened at `start`
fn close_group(text: &str, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text[start..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(start + offset + c.len_utf8());
            }
        }
    }
    None
}
