//! C integer literals as Python literals.

/// The Python spelling of a C integer literal, or `None` for anything else.
///
/// Integer suffixes are dropped and octal literals gain the `0o` prefix.
pub(crate) fn python_int(spelling: &str) -> Option<String> {
    let digits = spelling.trim_end_matches(['u', 'U', 'l', 'L']);
    if digits.is_empty() {
        return None;
    }

    let radix_body = |prefixes: [&str; 2]| {
        prefixes
            .iter()
            .find_map(|prefix| digits.strip_prefix(prefix))
    };
    if let Some(body) = radix_body(["0x", "0X"]) {
        return is_digits(body, 16).then(|| format!("0x{body}"));
    }
    if let Some(body) = radix_body(["0b", "0B"]) {
        return is_digits(body, 2).then(|| format!("0b{body}"));
    }
    if let Some(body) = digits.strip_prefix('0')
        && !body.is_empty()
    {
        return is_digits(body, 8).then(|| format!("0o{body}"));
    }
    is_digits(digits, 10).then(|| digits.to_string())
}

fn is_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_digit(radix))
}
