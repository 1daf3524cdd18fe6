use crate::{
    error::CalcError,
    lex::{Op, Token},
};

/// Runs a postfix sequence on a value stack.
///
/// Numbers are parsed here, not in the lexer. The sequence must leave exactly
/// one value behind.
pub fn evaluate<'de>(postfix: impl IntoIterator<Item = Token<'de>>) -> Result<f64, CalcError> {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(literal) => {
                stack.push(parse_number(literal)?);
            }
            Token::Operator(op) => {
                // `b` is on top: it was the right-hand operand.
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(CalcError::InsufficientOperands { op });
                };
                let result = apply(op, a, b)?;
                log::trace!("{a} {op} {b} = {result}");
                stack.push(result);
            }
            Token::LeftParen | Token::RightParen => {
                return Err(CalcError::InvalidOperator {
                    token: token.to_string(),
                });
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        values => Err(CalcError::MalformedExpression {
            values: values.len(),
        }),
    }
}

/// Evaluates whitespace separated postfix text such as `3 4 + 2 *`.
pub fn evaluate_str(text: &str) -> Result<f64, CalcError> {
    let postfix = text
        .split_whitespace()
        .map(Token::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    evaluate(postfix)
}

fn parse_number(literal: &str) -> Result<f64, CalcError> {
    let error = |source| CalcError::NumberParseError {
        literal: literal.to_string(),
        source,
    };
    let value: f64 = literal.parse().map_err(|e| error(Some(e)))?;
    if !value.is_finite() {
        return Err(error(None));
    }
    Ok(value)
}

fn apply(op: Op, a: f64, b: f64) -> Result<f64, CalcError> {
    Ok(match op {
        Op::Plus => a + b,
        Op::Minus => a - b,
        Op::Star => a * b,
        Op::Slash => {
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            a / b
        }
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("3 5 +", 8.0)]
    #[case("10 2 3 * -", 4.0)]
    #[case("1 2 + 4 *", 12.0)]
    #[case("10 2 / 3 +", 8.0)]
    #[case("3 5 2 8 - * +", -27.0)]
    #[case("10 2 - 3 -", 5.0)]
    #[case("10 2 / 5 /", 1.0)]
    #[case("3.5 2.5 +", 6.0)]
    #[case("0 5 /", 0.0)]
    #[case("42", 42.0)]
    #[case("5.", 5.0)]
    fn evaluates(#[case] postfix: &str, #[case] expected: f64) {
        assert_eq!(evaluate_str(postfix).unwrap(), expected);
    }

    #[test]
    fn keeps_operand_order() {
        assert_eq!(evaluate_str("2 8 -").unwrap(), -6.0);
        assert_eq!(evaluate_str("1 4 /").unwrap(), 0.25);
    }

    #[rstest]
    #[case("3 +", Op::Plus)]
    #[case("3 5 * +", Op::Plus)]
    #[case("-", Op::Minus)]
    fn rejects_missing_operands(#[case] postfix: &str, #[case] expected: Op) {
        assert!(matches!(
            evaluate_str(postfix),
            Err(CalcError::InsufficientOperands { op }) if op == expected
        ));
    }

    #[rstest]
    #[case("10 0 /")]
    #[case("1 0.0 /")]
    #[case("4 2 2 - /")]
    fn rejects_division_by_zero(#[case] postfix: &str) {
        assert!(matches!(
            evaluate_str(postfix),
            Err(CalcError::DivisionByZero)
        ));
    }

    #[rstest]
    #[case("", 0)]
    #[case("1 2", 2)]
    #[case("1 2 3 +", 2)]
    fn rejects_leftover_values(#[case] postfix: &str, #[case] expected: usize) {
        assert!(matches!(
            evaluate_str(postfix),
            Err(CalcError::MalformedExpression { values }) if values == expected
        ));
    }

    #[test]
    fn rejects_parentheses() {
        assert!(matches!(
            evaluate([Token::Number("1"), Token::LeftParen]),
            Err(CalcError::InvalidOperator { token }) if token == "("
        ));
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let err = evaluate([Token::Number("1.2.3")]).unwrap_err();
        assert!(matches!(
            err,
            CalcError::NumberParseError { ref literal, .. } if literal == "1.2.3"
        ));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[rstest]
    #[case(format!("1{}", "0".repeat(400)))]
    #[case(format!("{}.5", "9".repeat(320)))]
    fn rejects_numbers_that_overflow(#[case] literal: String) {
        let err = evaluate([Token::Number(&literal)]).unwrap_err();
        assert!(matches!(
            err,
            CalcError::NumberParseError { source: None, .. }
        ));

        let text = format!("{literal} 1 +");
        assert!(matches!(
            evaluate_str(&text),
            Err(CalcError::InvalidToken { token }) if token == literal
        ));
    }
}
