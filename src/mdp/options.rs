//! Escaped option lists (`a|b\|c|d\\e`).

use crate::{AppError, Result};

/// Split `text` on unescaped `|`.
///
/// `\|` yields a literal `|` and `\\` a literal `\`. Empty leading or inner
/// options are kept; an empty final option is not emitted, so `""` yields an
/// empty list and `"a|"` yields `["a"]`.
///
/// # Errors
///
/// Returns [`AppError::InvalidEscape`] carrying `text` when `\` is followed by
/// anything other than `\` or `|`.
pub fn split_valid_options(text: &str) -> Result<Vec<String>> {
    let mut options = Vec::new();
    let mut option = String::new();
    let mut escaped = false;

    for c in text.chars() {
        if escaped {
            match c {
                '\\' | '|' => option.push(c),
                _ => return Err(AppError::InvalidEscape(text.to_owned())),
            }
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '|' => options.push(std::mem::take(&mut option)),
            _ => option.push(c),
        }
    }

    if !option.is_empty() {
        options.push(option);
    }
    Ok(options)
}
