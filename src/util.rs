//! Shared utility helpers.

/// Line-comment marker used to render deactivated statements as inert SQL.
pub const COMMENT_MARKER: &str = "-- ";

/// Rewrite whitespace inside an identifier with underscores.
///
/// Hive identifiers cannot carry embedded spaces, so every whitespace
/// character is replaced one-for-one.
pub fn replace_space_with_underscore(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Indent every line of `text` by `width` spaces.
pub fn indent_string(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every line of `text` with the comment marker.
pub fn comment_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("{}{}", COMMENT_MARKER, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comment out `text` unless it is active.
#[inline]
pub fn comment_if_deactivated(text: &str, is_activated: bool) -> String {
    if is_activated {
        text.to_string()
    } else {
        comment_lines(text)
    }
}

/// Escape single quotes for use inside a Hive string literal.
pub fn escape_single_quotes(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Result of splitting a key list by activation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineKeys {
    /// Rendered key list, with inactive keys trailing in a block comment
    pub keys: String,
    /// True when every key is inactive
    pub all_deactivated: bool,
}

/// Join keys, moving the inactive ones into a trailing `/*, ... */` block.
///
/// When all keys are inactive the plain list is returned and the caller
/// decides how to comment the whole clause out.
pub fn comment_deactivated_inline_keys<F>(keys: &[String], is_activated: F) -> InlineKeys
where
    F: Fn(&str) -> bool,
{
    let (active, inactive): (Vec<&String>, Vec<&String>) =
        keys.iter().partition(|key| is_activated(key));

    let join = |items: &[&String]| {
        items
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if active.is_empty() {
        return InlineKeys {
            keys: join(&inactive),
            all_deactivated: !inactive.is_empty(),
        };
    }

    if inactive.is_empty() {
        return InlineKeys {
            keys: join(&active),
            all_deactivated: false,
        };
    }

    InlineKeys {
        keys: format!("{} /*, {} */", join(&active), join(&inactive)),
        all_deactivated: false,
    }
}

/// Insert or replace an entry in an ordered name-keyed list.
///
/// A replaced entry keeps its original position (object-assign semantics).
pub fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    if let Some(slot) = entries.iter_mut().find(|(n, _)| *n == name) {
        slot.1 = value;
    } else {
        entries.push((name, value));
    }
}
