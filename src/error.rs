use std::num::ParseFloatError;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::lex::Op;

/// Every way turning an expression into a number can fail.
///
/// Lexer failures carry the expression and the span of the offending
/// character so that a [`miette::Report`] can point at it. Later stages only
/// see tokens and report what they found.
#[derive(Error, Debug, Diagnostic)]
pub enum CalcError {
    #[error("Unexpected character '{token}'")]
    #[diagnostic(
        code(rpn_calc::lex::invalid_character),
        help("only digits, `.`, `+ - * /`, parentheses and whitespace may appear in an expression")
    )]
    InvalidCharacter {
        #[source_code]
        src: NamedSource<String>,

        #[label("this character")]
        bad_bit: SourceSpan,

        token: char,
    },

    #[error("invalid number format: multiple decimal points")]
    #[diagnostic(
        code(rpn_calc::lex::invalid_number_format),
        help("a number literal may contain at most one `.`")
    )]
    InvalidNumberFormat {
        #[source_code]
        src: NamedSource<String>,

        #[label("second decimal point in this number")]
        bad_bit: SourceSpan,
    },

    #[error("mismatched parentheses")]
    #[diagnostic(
        code(rpn_calc::parse::mismatched_parentheses),
        help("every `(` needs a matching `)` after it")
    )]
    MismatchedParentheses,

    #[error("invalid token `{token}`")]
    #[diagnostic(
        code(rpn_calc::parse::invalid_token),
        help("tokens are numbers, `+ - * /`, `(` or `)`")
    )]
    InvalidToken { token: String },

    #[error("not enough operands for `{op}`")]
    #[diagnostic(
        code(rpn_calc::eval::insufficient_operands),
        help("every operator needs a value on both sides")
    )]
    InsufficientOperands { op: Op },

    #[error("division by zero")]
    #[diagnostic(code(rpn_calc::eval::division_by_zero))]
    DivisionByZero,

    #[error("invalid operator `{token}`")]
    #[diagnostic(code(rpn_calc::eval::invalid_operator))]
    InvalidOperator { token: String },

    #[error("malformed expression: {values} values left after evaluation")]
    #[diagnostic(
        code(rpn_calc::eval::malformed_expression),
        help("an expression must reduce to exactly one value")
    )]
    MalformedExpression { values: usize },

    /// `source` is `None` when the text parses but overflows to infinity.
    #[error("cannot parse `{literal}` as a finite number")]
    #[diagnostic(code(rpn_calc::eval::number_parse_error))]
    NumberParseError {
        literal: String,

        #[source]
        source: Option<ParseFloatError>,
    },
}

impl CalcError {
    /// Byte span of the offending input, for errors raised while lexing.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::InvalidCharacter { bad_bit, .. }
            | Self::InvalidNumberFormat { bad_bit, .. } => Some(*bad_bit),
            _ => None,
        }
    }
}
