//! Fixed-column line breaking.

/// Insert a `'\n'` after every `n` characters of `s`, in place.
///
/// Counts characters, not bytes. No newline is appended after the last chunk, and
/// `n == 0` leaves `s` untouched.
pub fn break_string(n: usize, s: &mut String) {
    if n == 0 || s.chars().count() <= n {
        return;
    }
    *s = broken(n, s);
}

/// Non-mutating variant of [`break_string`].
pub fn broken(n: usize, s: &str) -> String {
    if n == 0 {
        return s.to_owned();
    }

    let mut out = String::with_capacity(s.len() + s.len() / n);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && i % n == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    out
}
