//! Rewrite TeX typed into math input into plain text the number parser reads.
//!
//! Only the constructs a numeric answer can contain are understood:
//! fractions, pi, percent signs and spacing. Anything else passes through
//! with its backslash removed.

/// Convert TeX such as `-\frac{3}{4}` or `2\pi` to `-3/4` or `2pi`.
///
/// Plain text is returned unchanged.
pub fn parse_tex(input: &str) -> String {
    if !input.contains('\\') && !input.contains('{') {
        return input.to_string();
    }

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end].is_ascii_alphabetic() {
                    end += 1;
                }

                if end == start {
                    // Single-symbol commands: \% \, \; \! and friends
                    match chars.get(start) {
                        Some('%') => out.push('%'),
                        Some(',' | ';' | ':' | '!' | ' ') | None => {}
                        Some(other) => out.push(*other),
                    }
                    i = start + 1;
                    continue;
                }

                let command: String = chars[start..end].iter().collect();
                i = end;
                match command.as_str() {
                    "frac" | "dfrac" | "tfrac" => {
                        let (numerator, next) = read_group(&chars, i);
                        let (denominator, next) = read_group(&chars, next);
                        // `1\frac{1}{2}` is a mixed number
                        if out.ends_with(|c: char| c.is_ascii_digit()) {
                            out.push(' ');
                        }
                        out.push_str(&parse_tex(&numerator));
                        out.push('/');
                        out.push_str(&parse_tex(&denominator));
                        i = next;
                    }
                    "pi" => out.push_str("pi"),
                    "cdot" | "times" => out.push('*'),
                    "div" => out.push('/'),
                    "left" | "right" | "quad" | "qquad" => {}
                    other => out.push_str(other),
                }
            }
            '{' | '}' => i += 1,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Read a `{...}` group (or a single bare token) starting at `start`.
/// Returns the group's inner text and the index just past it.
fn read_group(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }

    match chars.get(i) {
        Some('{') => {
            let mut depth = 0usize;
            let mut inner = String::new();
            for (offset, c) in chars[i..].iter().enumerate() {
                match c {
                    '{' => {
                        depth += 1;
                        if depth == 1 {
                            continue;
                        }
                    }
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return (inner, i + offset + 1);
                        }
                    }
                    _ => {}
                }
                inner.push(*c);
            }
            // Unbalanced braces: take the rest
            (inner, chars.len())
        }
        Some(c) => (c.to_string(), i + 1),
        None => (String::new(), i),
    }
}
