//! Character reference decoding.
//!
//! Only the handful of references that show up in hand-written pages are
//! understood. Anything else is left in the text verbatim.

/// Named references we decode, without the surrounding `&` and `;`.
const NAMED_REFERENCES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("shy", '\u{ad}'),
];

/// Longest reference body we look at before giving up on a `&`.
const MAX_REFERENCE_LEN: usize = 10;

/// Replace known character references in `input`.
#[must_use]
pub fn decode_character_references(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after
            .find(';')
            .filter(|&end| end <= MAX_REFERENCE_LEN)
            .and_then(|end| lookup(&after[..end]).map(|ch| (ch, end)))
        {
            Some((ch, end)) => {
                out.push(ch);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_REFERENCES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|&(_, ch)| ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_references() {
        assert_eq!(decode_character_references("a &lt;b&gt; &amp; c"), "a <b> & c");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_character_references("&#65;&#x42;"), "AB");
    }

    #[test]
    fn test_soft_hyphen() {
        assert_eq!(decode_character_references("hy&shy;phen"), "hy\u{ad}phen");
    }

    #[test]
    fn test_unknown_reference_kept() {
        assert_eq!(decode_character_references("&bogus; & x"), "&bogus; & x");
    }
}
