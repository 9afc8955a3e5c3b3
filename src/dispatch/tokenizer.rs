//! Input tokenizer.

/// One token with its byte span in the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with quotes removed and escapes applied.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Tokens of one input line, with the line kept for raw slicing.
#[derive(Debug, Clone)]
pub struct TokenStream {
    input: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Split on whitespace, keeping double-quoted segments together.
    ///
    /// Inside quotes `\` escapes the next character. `""` is an empty token.
    /// An unterminated quote runs to the end of the input.
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut start: Option<usize> = None;
        let mut in_quotes = false;
        let mut chars = input.char_indices();

        while let Some((i, ch)) = chars.next() {
            match ch {
                '"' => {
                    start.get_or_insert(i);
                    in_quotes = !in_quotes;
                }
                '\\' if in_quotes => {
                    if let Some((_, next)) = chars.next() {
                        current.push(next);
                    }
                }
                c if c.is_whitespace() && !in_quotes => {
                    if let Some(s) = start.take() {
                        tokens.push(Token {
                            text: std::mem::take(&mut current),
                            start: s,
                            end: i,
                        });
                    }
                }
                c => {
                    start.get_or_insert(i);
                    current.push(c);
                }
            }
        }

        if let Some(s) = start {
            tokens.push(Token {
                text: current,
                start: s,
                end: input.len(),
            });
        }

        Self { input, tokens }
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token texts, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Raw input from token `from` through the last token, verbatim.
    pub fn raw_rest(&self, from: usize) -> &str {
        match (self.tokens.get(from), self.tokens.last()) {
            (Some(first), Some(last)) => &self.input[first.start..last.end],
            _ => "",
        }
    }

    /// Whether the input ends in whitespace (a new word is being started).
    pub fn ends_with_whitespace(&self) -> bool {
        self.input.ends_with(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_args() {
        let stream = TokenStream::new("foo  bar\tbaz");
        assert_eq!(stream.texts(), vec!["foo", "bar", "baz"]);
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_parse_quoted_args() {
        let stream = TokenStream::new(r#"foo "hello world" bar"#);
        assert_eq!(stream.texts(), vec!["foo", "hello world", "bar"]);
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let stream = TokenStream::new(r#""hello \"world\"""#);
        assert_eq!(stream.texts(), vec![r#"hello "world""#]);
    }

    #[test]
    fn test_empty_quotes_make_empty_token() {
        let stream = TokenStream::new(r#"say "" now"#);
        assert_eq!(stream.texts(), vec!["say", "", "now"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let stream = TokenStream::new(r#"say "hello there"#);
        assert_eq!(stream.texts(), vec!["say", "hello there"]);
    }

    #[test]
    fn test_spans_and_raw_rest() {
        let stream = TokenStream::new("say  hello   big world ");
        assert_eq!(stream.get(1).map(|t| (t.start, t.end)), Some((5, 10)));
        assert_eq!(stream.raw_rest(1), "hello   big world");
        assert_eq!(stream.raw_rest(4), "");
        assert!(stream.ends_with_whitespace());
    }

    #[test]
    fn test_blank_input() {
        assert!(TokenStream::new("   ").is_empty());
        assert!(TokenStream::new("").is_empty());
    }
}
