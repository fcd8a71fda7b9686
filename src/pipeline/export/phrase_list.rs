//! List-literal form of phrase lists inside the table-dump CSV.
//!
//! `['battery life', "kid's tablet", 'fast, cheap']`: square brackets around
//! comma-separated single- or double-quoted strings with backslash escapes.
//! A trailing comma and surrounding whitespace are accepted.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhraseListError {
    #[error("Phrase list is empty")]
    Empty,

    #[error("Not a list literal")]
    NotAList,

    #[error("Unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Trailing input at offset {0}")]
    TrailingInput(usize),
}

/// Parse a list literal into its string elements.
pub fn parse_phrase_list(input: &str) -> Result<Vec<String>, PhraseListError> {
    if input.trim().is_empty() {
        return Err(PhraseListError::Empty);
    }

    let mut parser = Parser {
        chars: input.char_indices().peekable(),
    };

    parser.skip_whitespace();
    match parser.chars.next() {
        Some((_, '[')) => {}
        _ => return Err(PhraseListError::NotAList),
    }

    let mut items = Vec::new();
    loop {
        parser.skip_whitespace();
        match parser.chars.peek().copied() {
            Some((_, ']')) => {
                parser.chars.next();
                break;
            }
            Some((offset, quote @ ('\'' | '"'))) => {
                parser.chars.next();
                items.push(parser.string_body(offset, quote)?);
            }
            Some((offset, found)) => return Err(PhraseListError::UnexpectedChar { found, offset }),
            None => return Err(PhraseListError::UnexpectedEnd),
        }

        parser.skip_whitespace();
        match parser.chars.next() {
            Some((_, ',')) => continue,
            Some((_, ']')) => break,
            Some((offset, found)) => return Err(PhraseListError::UnexpectedChar { found, offset }),
            None => return Err(PhraseListError::UnexpectedEnd),
        }
    }

    parser.skip_whitespace();
    if let Some((offset, _)) = parser.chars.next() {
        return Err(PhraseListError::TrailingInput(offset));
    }

    Ok(items)
}

struct Parser<'s> {
    chars: std::iter::Peekable<std::str::CharIndices<'s>>,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    /// Read up to the closing `quote`; the opening quote is already consumed.
    fn string_body(&mut self, start: usize, quote: char) -> Result<String, PhraseListError> {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err(PhraseListError::UnterminatedString(start))
    }
}

/// Render phrases as a list literal. Elements are single-quoted unless they
/// contain `'` and no `"`.
pub fn render_phrase_list(items: &[String]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| quote_element(item)).collect();
    format!("[{}]", rendered.join(", "))
}

fn quote_element(item: &str) -> String {
    let quote = if item.contains('\'') && !item.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(item.len() + 2);
    out.push(quote);
    for c in item.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
