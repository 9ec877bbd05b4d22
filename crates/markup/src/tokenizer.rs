//! Simplified markup tokenizer with a constrained ASCII tag-name character set.
//!
//! Supported tag/attribute-name characters: `[A-Za-z0-9:_-]`. This is not a
//! full HTML5 state machine; the binding layer only needs element structure
//! and attributes, so entity decoding and script/style rawtext modes are
//! intentionally absent.

use crate::types::Token;
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Tokenizes markup text into a flat token list.
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out = Vec::new();
    let mut i = 0;

    // Slice endpoints are always at ASCII structural bytes, so they stay on
    // UTF-8 char boundaries.
    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            i = match memchr(b'<', &bytes[i..]) {
                Some(rel) => i + rel,
                None => len,
            };
            let text = &input[start..i];
            if !text.is_empty() {
                out.push(Token::Text(text.to_string()));
            }
            continue;
        }

        if input[i..].starts_with(COMMENT_START) {
            let body_start = i + COMMENT_START.len();
            match input[body_start..].find(COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + COMMENT_END.len();
                }
                None => {
                    // Unterminated comment swallows the rest of the input.
                    out.push(Token::Comment(input[body_start..].to_string()));
                    i = len;
                }
            }
            continue;
        }

        if i + 2 <= len && bytes[i + 1] == b'!' {
            let rest = &input[i + 2..];
            match rest.find('>') {
                Some(end) => {
                    out.push(Token::Doctype(rest[..end].trim().to_string()));
                    i += 2 + end + 1;
                }
                None => break,
            }
            continue;
        }

        if i + 2 <= len && bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < len && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            while j < len && bytes[j] != b'>' {
                j += 1;
            }
            if j < len {
                j += 1;
            }
            out.push(Token::EndTag(name));
            i = j;
            continue;
        }

        // Start tag.
        let start = i + 1;
        let mut j = start;
        while j < len && is_name_byte(bytes[j]) {
            j += 1;
        }
        if j == start {
            // Bare '<' in text; emit it literally and move on.
            out.push(Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let name = input[start..j].to_ascii_lowercase();

        let mut attributes: Vec<(String, Option<String>)> = Vec::new();
        let mut self_closing = false;
        let mut k = j;
        loop {
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k >= len {
                break;
            }
            if bytes[k] == b'>' {
                k += 1;
                break;
            }
            if bytes[k] == b'/' {
                if k + 1 < len && bytes[k + 1] == b'>' {
                    self_closing = true;
                    k += 2;
                    break;
                }
                k += 1;
                continue;
            }

            let name_start = k;
            while k < len && is_name_byte(bytes[k]) {
                k += 1;
            }
            if name_start == k {
                k += 1;
                continue;
            }
            let attr_name = input[name_start..k].to_ascii_lowercase();

            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            let value = if k < len && bytes[k] == b'=' {
                k += 1;
                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    k += 1;
                    let vstart = k;
                    while k < len && bytes[k] != quote {
                        k += 1;
                    }
                    let raw = &input[vstart..k];
                    if k < len {
                        k += 1;
                    }
                    Some(raw.to_string())
                } else {
                    let vstart = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                            break;
                        }
                        k += 1;
                    }
                    Some(input[vstart..k].to_string())
                }
            } else {
                None
            };
            attributes.push((attr_name, value));
        }

        if is_void_element(&name) {
            self_closing = true;
        }

        out.push(Token::StartTag {
            name,
            attributes,
            self_closing,
        });
        i = k;
    }

    out
}
