#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteMode {
    Unquoted,
    Single,
    Double,
}

/// Splits one pipeline segment into argument words, resolving quotes and
/// backslash escapes.
///
/// An unterminated quote is never an error: everything collected so far
/// becomes part of the final word.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut mode = QuoteMode::Unquoted;
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            // when in a single quote, no escapes are possible
            QuoteMode::Single => {
                if c == '\'' {
                    mode = QuoteMode::Unquoted;
                } else {
                    current.push(c);
                }
            }
            QuoteMode::Double => match c {
                '"' => mode = QuoteMode::Unquoted,
                '\\' => match chars.peek() {
                    Some(&escaped @ ('"' | '\\' | '$' | '\n')) => {
                        chars.next();
                        current.push(escaped);
                    }
                    _ => current.push('\\'),
                },
                _ => current.push(c),
            },
            QuoteMode::Unquoted => match c {
                '\'' => mode = QuoteMode::Single,
                '"' => mode = QuoteMode::Double,
                '\\' => current.push(chars.next().unwrap_or('\\')),
                ' ' | '\t' => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }

    if mode != QuoteMode::Unquoted {
        trace!(?mode, "unterminated quote, keeping collected text");
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_unquoted_whitespace() {
        assert_eq!(tokenize("echo  hello\tworld "), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn double_quotes_group_words() {
        assert_eq!(tokenize(r#"echo "a b" c"#), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn escaped_space_stays_in_word() {
        assert_eq!(tokenize(r"echo a\ b"), vec!["echo", "a b"]);
    }

    #[test]
    fn adjacent_runs_concatenate() {
        assert_eq!(tokenize(r#"a"b"c"#), vec!["abc"]);
        assert_eq!(tokenize(r#"'x'"y"z"#), vec!["xyz"]);
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(tokenize(r#"echo 'a\"b  $c'"#), vec!["echo", r#"a\"b  $c"#]);
    }

    #[test]
    fn double_quote_escapes_only_special_characters() {
        assert_eq!(tokenize(r#""a\"b\\c\$d""#), vec![r#"a"b\c$d"#]);
        assert_eq!(tokenize(r#""a\nb""#), vec![r"a\nb"]);
    }

    #[test]
    fn unquoted_backslash_escapes_anything() {
        assert_eq!(tokenize(r"\'hi\' \n"), vec!["'hi'", "n"]);
    }

    #[test]
    fn trailing_backslash_is_literal() {
        assert_eq!(tokenize(r"echo foo\"), vec!["echo", r"foo\"]);
    }

    #[test]
    fn unterminated_quote_keeps_collected_text() {
        assert_eq!(tokenize(r#"echo "a b"#), vec!["echo", "a b"]);
        assert_eq!(tokenize("echo 'x  y"), vec!["echo", "x  y"]);
    }

    #[test]
    fn empty_quotes_produce_no_word() {
        assert_eq!(tokenize(r#"echo "" ''"#), vec!["echo"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn rejoining_plain_words_is_stable() {
        for line in [
            r#"echo "one" 'two' three"#,
            "ls   -la\t/tmp",
            r#"a"b"c d'e'f"#,
        ] {
            let words = tokenize(line);
            let rejoined = words.join(" ");
            assert_eq!(tokenize(&rejoined), words, "line: {line}");
        }
    }
}
