//! Input mask for German phone numbers.

/// Characters the phone field accepts from the keyboard
pub fn is_phone_input_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ')
}

/// Re-format a phone number as it is being typed.
///
/// Numbers whose digits start with the country code `49`, or with the
/// national trunk prefix `0`, are rewritten as `+49 AAA REST`. The area
/// group ends where the user typed a separator after two or three area
/// digits, otherwise after three. Anything else is returned as is.
pub fn format_phone_number(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    let (prefix_len, national) = if let Some(rest) = digits.strip_prefix("49") {
        (2, rest)
    } else if let Some(rest) = digits.strip_prefix('0') {
        (1, rest)
    } else {
        return input.to_string();
    };

    let mut formatted = String::from("+49");
    if national.is_empty() {
        return formatted;
    }

    let typed_split = area_separator(input, prefix_len);
    let split = typed_split.unwrap_or(3).min(national.len());
    formatted.push(' ');
    formatted.push_str(&national[..split]);
    if national.len() > split {
        formatted.push(' ');
        formatted.push_str(&national[split..]);
    } else if typed_split == Some(split) && input.ends_with(|c: char| !c.is_ascii_digit()) {
        // keep the separator just typed so the next digit starts the subscriber group
        formatted.push(' ');
    }
    formatted
}

/// Number of area digits before the first separator the user typed after
/// the area code started, if that is a valid area length.
fn area_separator(input: &str, prefix_len: usize) -> Option<usize> {
    let mut seen = 0;
    for c in input.chars() {
        if c.is_ascii_digit() {
            seen += 1;
        } else if c != '+' && seen > prefix_len {
            let area = seen - prefix_len;
            return (2..=3).contains(&area).then_some(area);
        }
    }
    None
}
