use crate::{
    error::CalcError,
    lex::{Op, Token},
};

/// Infix to postfix conversion with the shunting-yard algorithm.
///
/// Operators are binary and left-associative: an operator on the stack is
/// popped while its precedence is at least that of the incoming one, so
/// `10 - 2 - 3` comes out as `10 2 - 3 -`.
pub fn to_postfix<'de>(
    tokens: impl IntoIterator<Item = Token<'de>>,
) -> Result<Vec<Token<'de>>, CalcError> {
    let mut output = Vec::new();
    let mut stack: Vec<Token<'de>> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::LeftParen => stack.push(token),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Token::LeftParen) => break,
                    Some(top) => output.push(top),
                    None => return Err(CalcError::MismatchedParentheses),
                }
            },
            Token::Operator(op) => {
                while let Some(&Token::Operator(top)) = stack.last() {
                    if precedence(top) < precedence(op) {
                        break;
                    }
                    output.push(Token::Operator(top));
                    stack.pop();
                }
                stack.push(token);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::LeftParen {
            // never closed
            return Err(CalcError::MismatchedParentheses);
        }
        output.push(top);
    }

    log::debug!("postfix: {}", display_sequence(&output));
    Ok(output)
}

/// Converts whitespace separated infix text, where every word is one token.
pub fn to_postfix_str(text: &str) -> Result<Vec<Token<'_>>, CalcError> {
    let tokens = text
        .split_whitespace()
        .map(Token::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    to_postfix(tokens)
}

/// Joins a token sequence with single spaces, e.g. `3 5 2 8 - * +`.
pub fn display_sequence(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn precedence(op: Op) -> u8 {
    match op {
        Op::Plus | Op::Minus => 1,
        Op::Star | Op::Slash => 2,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::lex::tokenize;

    fn postfix(expression: &str) -> Result<String, CalcError> {
        let tokens = tokenize(expression)?;
        to_postfix(tokens).map(|output| display_sequence(&output))
    }

    #[rstest]
    #[case("3 + 5", "3 5 +")]
    #[case("10 - 2 * 3", "10 2 3 * -")]
    #[case("(1 + 2) * 4", "1 2 + 4 *")]
    #[case("10 / 2 + 3", "10 2 / 3 +")]
    #[case("3 + 5 * (2 - 8)", "3 5 2 8 - * +")]
    #[case("10 - 2 - 3", "10 2 - 3 -")]
    #[case("10 / 2 / 5", "10 2 / 5 /")]
    #[case("2 * 3 / 4", "2 3 * 4 /")]
    #[case("1 - 2 + 3", "1 2 - 3 +")]
    #[case("((7))", "7")]
    #[case("(1 + (2 - 3)) * (4 / 5)", "1 2 3 - + 4 5 / *")]
    #[case("", "")]
    fn converts(#[case] expression: &str, #[case] expected: &str) {
        assert_eq!(postfix(expression).unwrap(), expected);
    }

    #[test]
    fn stray_operators_are_passed_through() {
        assert_eq!(postfix("3 + * 5").unwrap(), "3 5 * +");
        assert_eq!(postfix("3 + 5 *").unwrap(), "3 5 * +");
    }

    #[rstest]
    #[case("5 + (3 - 2")]
    #[case("3 + )5 * 2(")]
    #[case("3 + 5)")]
    #[case("(3 + 5")]
    #[case(")")]
    #[case("(")]
    #[case("((1) + 2")]
    fn rejects_unbalanced_parentheses(#[case] expression: &str) {
        assert!(matches!(
            postfix(expression),
            Err(CalcError::MismatchedParentheses)
        ));
    }

    #[test]
    fn converts_word_separated_text() {
        let output = to_postfix_str("( 1 + 2 ) * 4").unwrap();
        assert_eq!(display_sequence(&output), "1 2 + 4 *");
    }

    #[rstest]
    #[case("3 + x", "x")]
    #[case("1 +2", "+2")]
    #[case("4 % 2", "%")]
    fn rejects_unknown_words(#[case] text: &str, #[case] bad: &str) {
        assert!(matches!(
            to_postfix_str(text),
            Err(CalcError::InvalidToken { token }) if token == bad
        ));
    }
}
