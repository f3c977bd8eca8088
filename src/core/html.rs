// src/core/html.rs
// Naive, case-insensitive tag-block scanning. No DOM, no nesting:
// a block runs from `<tag` to the first matching `</tag>` after it.

use super::sanitize::{normalize_entities, normalize_ws};

/// ASCII-only lowercasing. Byte offsets are preserved, so indices found in
/// the lowered copy are valid in the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Iterator over complete `<tag …>…</tag>` blocks of one element name.
pub struct Blocks<'a> {
    src: &'a str,
    lc: String,
    open: String,
    close: String,
    pos: usize,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let start = self.lc.get(self.pos..)?.find(&self.open)? + self.pos;
            let after = start + self.open.len();

            // `<tr` must not match `<track`
            match self.lc.as_bytes().get(after) {
                Some(b) if *b == b'>' || *b == b'/' || b.is_ascii_whitespace() => {}
                _ => {
                    self.pos = after;
                    continue;
                }
            }

            let open_end = self.src[start..].find('>')? + start + 1;
            let end_rel = self.lc[open_end..].find(&self.close)?;
            let end = open_end + end_rel + self.close.len();
            self.pos = end;
            return Some(&self.src[start..end]);
        }
    }
}

/// All `<tag>` blocks in `s`, in document order.
pub fn blocks_ci<'a>(s: &'a str, tag: &str) -> Blocks<'a> {
    let tag = to_lower(tag);
    Blocks {
        src: s,
        lc: to_lower(s),
        open: join!("<", &tag),
        close: join!("</", &tag, ">"),
        pos: 0,
    }
}

/// Given a complete block like `<td …>INNER</td>`, return INNER
/// (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return &block[open_end + 1..close_start];
            }
        }
    }
    ""
}

/// Remove all `<…>` tags, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of a cell block: tags stripped, entities decoded, trimmed.
pub fn cell_text(block: &str) -> String {
    let text = strip_tags(inner_after_open_tag(block));
    normalize_ws(&normalize_entities(&text))
}
