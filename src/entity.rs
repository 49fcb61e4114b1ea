use std::borrow::Cow;

use crate::error::Error;

/// Expand predefined entity and character references in parsed text.
pub(crate) fn unescape(content: Cow<str>) -> Result<Cow<str>, Error> {
    if !content.contains('&') {
        return Ok(content);
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut is_complete = false;
        for c in chars.by_ref() {
            if c == ';' {
                is_complete = true;
                break;
            }
            entity.push(c);
        }
        if !is_complete {
            return Err(Error::UnclosedEntity(entity));
        }
        match entity.as_str() {
            "amp" => result.push('&'),
            "apos" => result.push('\''),
            "gt" => result.push('>'),
            "lt" => result.push('<'),
            "quot" => result.push('"'),
            _ => result.push(char_reference(&entity)?),
        }
    }
    Ok(result.into())
}

fn char_reference(entity: &str) -> Result<char, Error> {
    let digits = entity
        .strip_prefix('#')
        .ok_or_else(|| Error::InvalidEntity(entity.to_string()))?;
    let code = match digits.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    }
    .map_err(|_| Error::InvalidEntity(entity.to_string()))?;
    char::from_u32(code).ok_or_else(|| Error::InvalidEntity(entity.to_string()))
}

/// Escape text content: `&`, `<` and `>`.
pub(crate) fn escape_text(content: &str) -> Cow<str> {
    escape(content, false)
}

/// Escape an attribute value: text escapes plus `"`.
pub(crate) fn escape_attribute(content: &str) -> Cow<str> {
    escape(content, true)
}

fn escape(content: &str, quote: bool) -> Cow<str> {
    if !content
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>') || (quote && c == '"'))
    {
        return content.into();
    }
    let mut result = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quote => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result.into()
}
