//! Digit-buffer model of the phone input mask `(DDD) DDD-DDDD`.
//!
//! The buffer holds at most ten digits; the first digit of the area code
//! must be 1-9. Formatting is progressive, so a partially filled buffer
//! renders as far as its digits reach (e.g. "(40", "(404) 5").

/// Maximum number of digits a masked phone number holds.
pub const MAX_DIGITS: usize = 10;

/// Whether `c` may be appended to the digit buffer `digits`.
pub fn accepts(digits: &str, c: char) -> bool {
    if !c.is_ascii_digit() || digits.len() >= MAX_DIGITS {
        return false;
    }
    // Area code cannot start with 0.
    !(digits.is_empty() && c == '0')
}

/// Append `c` if the mask allows it. Returns true when the buffer changed.
pub fn push_digit(digits: &mut String, c: char) -> bool {
    if accepts(digits, c) {
        digits.push(c);
        true
    } else {
        false
    }
}

/// Remove the last digit. Returns true when the buffer changed.
pub fn pop_digit(digits: &mut String) -> bool {
    digits.pop().is_some()
}

/// Extract the digit buffer back out of formatted (or free) text, keeping
/// only the digits the mask would have accepted.
pub fn digits_of(text: &str) -> String {
    let mut digits = String::new();
    for c in text.chars() {
        if digits.len() >= MAX_DIGITS {
            break;
        }
        push_digit(&mut digits, c);
    }
    digits
}

/// Progressive mask rendering: `(DDD) DDD-DDDD` cut off where the digits end.
pub fn format(digits: &str) -> String {
    if digits.is_empty() {
        return String::new();
    }
    let d: Vec<char> = digits.chars().take(MAX_DIGITS).collect();
    let mut out = String::with_capacity(14);
    out.push('(');
    for c in d.iter().take(3) {
        out.push(*c);
    }
    if d.len() > 3 {
        out.push_str(") ");
        for c in d.iter().skip(3).take(3) {
            out.push(*c);
        }
    }
    if d.len() > 6 {
        out.push('-');
        for c in d.iter().skip(6) {
            out.push(*c);
        }
    }
    out
}

/// A buffer with all ten digits fills the mask completely.
pub fn is_complete(digits: &str) -> bool {
    digits.len() == MAX_DIGITS
}
