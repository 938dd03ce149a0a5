//! Base36 encoding for compact timestamps inside signed tokens.

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    // Alphabet bytes are ASCII
    String::from_utf8(digits).unwrap_or_default()
}

pub fn decode(s: &str) -> Option<u64> {
    if s.is_empty() || s.len() > 13 {
        return None;
    }

    let mut value: u64 = 0;
    for c in s.bytes() {
        let digit = match c {
            b'0'..=b'9' => (c - b'0') as u64,
            b'a'..=b'z' => (c - b'a') as u64 + 10,
            _ => return None,
        };
        value = value.checked_mul(36)?.checked_add(digit)?;
    }

    Some(value)
}
