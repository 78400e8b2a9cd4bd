//! Escape-aware delimiter scanning.
//!
//! BBCode brackets are escaped with backslashes, and the backslashes
//! themselves can be escaped: a run of `R` backslashes immediately before a
//! bracket collapses pairwise, and the bracket is a real delimiter only when
//! `R` is even. The scanner locates genuine delimiters and records which
//! backslash characters must later be deleted from display text.

/// Finds the next occurrence of `delimiter` at or after `from` that is not
/// escaped, pushing the absolute position of every backslash that the
/// preceding run marks for deletion onto `escapes`.
///
/// For a run of `R` backslashes ending just before a candidate at `p`, the
/// positions `p - 1, p - 3, ...` (one per pair) are recorded. An odd `R`
/// leaves the candidate itself escaped; it is skipped and scanning continues,
/// but its markers stay recorded since they still belong to the surrounding
/// text span.
pub fn next_unescaped(text: &str, from: usize, delimiter: u8, escapes: &mut Vec<usize>) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut at = from;
    loop {
        let found = bytes[at.min(bytes.len())..]
            .iter()
            .position(|&b| b == delimiter)?;
        let pos = at + found;

        if pos > 0 {
            let mut run = 0;
            while pos - run > 0 && bytes[pos - run - 1] == b'\\' {
                run += 1;
            }
            let mut pair = 0;
            while pair < run {
                escapes.push(pos - pair - 1);
                pair += 2;
            }
            if run % 2 == 1 {
                at = pos + 1;
                continue;
            }
        }

        return Some(pos);
    }
}

/// Escapes plain text so it survives a parse verbatim: every `[` is prefixed
/// with a backslash, as is every backslash belonging to a run that ends
/// directly before a `[`.
///
/// Hand-rolled rather than a pattern: the backslash case needs lookahead to
/// the end of its run, which the `regex` crate cannot express.
pub fn escape(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (index, ch) in text.char_indices() {
        match ch {
            '[' => {
                out.push('\\');
                out.push('[');
            }
            '\\' => {
                let mut end = index;
                while end < bytes.len() && bytes[end] == b'\\' {
                    end += 1;
                }
                if bytes.get(end) == Some(&b'[') {
                    out.push('\\');
                }
                out.push('\\');
            }
            other => out.push(other),
        }
    }
    out
}
