/// Integral numbers print without a fractional part; everything else uses the
/// shortest round-trip form.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        if n.abs() < i64::MAX as f64 {
            let mut buf = itoa::Buffer::new();
            return buf.format(n as i64).to_string();
        }
        return format!("{n:.0}");
    }
    let mut buf = ryu::Buffer::new();
    buf.format(n).to_string()
}

/// Decode backslash escapes embedded in program text.
///
/// Recognises `\n \t \r \\ \' \" \0 \a \b \f \v` and `\xHH`. Unknown or
/// malformed escapes are kept as written.
pub fn decode_escapes(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };
        let decoded = match next {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '0' => Some('\0'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            _ => None,
        };
        if let Some(ch) = decoded {
            chars.next();
            out.push(ch);
            continue;
        }
        if next == 'x' {
            let mut lookahead = chars.clone();
            lookahead.next();
            let hi = lookahead.next().and_then(|h| h.to_digit(16));
            let lo = lookahead.next().and_then(|l| l.to_digit(16));
            if let (Some(hi), Some(lo)) = (hi, lo)
                && let Some(ch) = char::from_u32(hi * 16 + lo)
            {
                out.push(ch);
                chars = lookahead;
                continue;
            }
        }
        out.push('\\');
    }
    out
}
