use bank_core::BankError;

/// Splits one command line into tokens. Whitespace separates tokens outside
/// quotes; a `"` opens a quoted span consumed verbatim (including embedded
/// whitespace) until the matching closing `"`. An unterminated quote is a
/// [`BankError::UnterminatedQuote`].
pub fn tokenize(line: &str) -> Result<Vec<String>, BankError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        if chars.peek() == Some(&'"') {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return Err(BankError::UnterminatedQuote);
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
            tokens.push(token);
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("LOGIN ACC1001 testpass").unwrap(), vec!["LOGIN", "ACC1001", "testpass"]);
    }

    #[test]
    fn quoted_span_keeps_embedded_spaces() {
        let tokens = tokenize(r#"REGISTER "New Test User" "1995-05-15" "9876543210" "newpassword""#).unwrap();
        assert_eq!(tokens, vec!["REGISTER", "New Test User", "1995-05-15", "9876543210", "newpassword"]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(matches!(tokenize(r#"REGISTER "New Test"#), Err(BankError::UnterminatedQuote)));
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn collapses_repeated_whitespace() {
        assert_eq!(tokenize("  DEPOSIT   500  ").unwrap(), vec!["DEPOSIT", "500"]);
    }
}
