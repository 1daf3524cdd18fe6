//! Evaluates arithmetic expressions such as `3 + 5 * (2 - 8)`.
//!
//! An expression goes through three stages: [`tokenize`] splits it into
//! [`Token`]s, [`to_postfix`] reorders them into reverse Polish notation and
//! [`evaluate`] runs the result on a value stack. [`calculate`] does all three
//! and hands back the first [`CalcError`] it meets.

pub mod error;
pub mod eval;
pub mod lex;
pub mod parse;

pub use error::CalcError;
pub use eval::{evaluate, evaluate_str};
pub use lex::{Lexer, Op, Token, tokenize, tokenize_named};
pub use parse::{display_sequence, to_postfix, to_postfix_str};

pub fn calculate(expression: &str) -> Result<f64, CalcError> {
    calculate_named(None, expression)
}

/// Like [`calculate`], with `name` shown as the source of lexer diagnostics.
pub fn calculate_named<'de>(
    name: Option<&'de str>,
    expression: &'de str,
) -> Result<f64, CalcError> {
    let tokens = tokenize_named(name, expression)?;
    let postfix = to_postfix(tokens)?;
    let value = evaluate(postfix)?;
    log::debug!("{expression:?} = {value}");
    Ok(value)
}
