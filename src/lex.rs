use std::fmt::Display;

use miette::{NamedSource, SourceSpan};

use crate::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
}

impl Op {
    pub fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Star => '*',
            Self::Slash => '/',
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single lexical unit of an expression.
///
/// Numbers keep the text they were written with and are only turned into
/// an `f64` when the postfix sequence is evaluated. The lexer does not check
/// that text further, so a lone `.` lexes as `Number(".")` and fails during
/// evaluation, while [`Token::try_from`] rejects the same text up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'de> {
    Number(&'de str),
    Operator(Op),
    LeftParen,
    RightParen,
}

impl Token<'_> {
    /// Upper-case kind name used by the token dump.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number(_) => "NUMBER",
            Self::Operator(Op::Plus) => "PLUS",
            Self::Operator(Op::Minus) => "MINUS",
            Self::Operator(Op::Star) => "STAR",
            Self::Operator(Op::Slash) => "SLASH",
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(literal) => write!(f, "{literal}"),
            Self::Operator(op) => write!(f, "{op}"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
        }
    }
}

/// Classifies one already separated piece of text, e.g. a word of
/// hand-written RPN.
impl<'de> TryFrom<&'de str> for Token<'de> {
    type Error = CalcError;

    fn try_from(text: &'de str) -> Result<Self, Self::Error> {
        match text {
            "(" => Ok(Self::LeftParen),
            ")" => Ok(Self::RightParen),
            "+" => Ok(Self::Operator(Op::Plus)),
            "-" => Ok(Self::Operator(Op::Minus)),
            "*" => Ok(Self::Operator(Op::Star)),
            "/" => Ok(Self::Operator(Op::Slash)),
            _ if is_number_literal(text) => Ok(Self::Number(text)),
            _ => Err(CalcError::InvalidToken {
                token: text.to_string(),
            }),
        }
    }
}

fn is_number_literal(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.matches('.').count() <= 1
        && text.parse::<f64>().is_ok_and(f64::is_finite)
}

pub struct Lexer<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(filename: Option<&'de str>, input: &'de str) -> Self {
        Self {
            filename,
            whole: input,
            rest: input,
            byte: 0,
        }
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(
            self.filename.unwrap_or("<expression>"),
            self.whole.to_string(),
        )
    }

    /// Scans the number literal at the front of `cur`, which starts at byte
    /// `start` of the whole input.
    fn number(&mut self, cur: &'de str, start: usize) -> Result<Token<'de>, CalcError> {
        let mut seen_point = false;
        let mut end = cur.len();
        for (at, c) in cur.char_indices() {
            match c {
                '0'..='9' => {}
                '.' if !seen_point => seen_point = true,
                '.' => {
                    self.rest = "";
                    return Err(CalcError::InvalidNumberFormat {
                        src: self.source(),
                        bad_bit: SourceSpan::from(start + at..start + at + 1),
                    });
                }
                _ => {
                    end = at;
                    break;
                }
            }
        }

        let literal = &cur[..end];
        self.byte = start + end;
        self.rest = &cur[end..];
        Ok(Token::Number(literal))
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let cur = self.rest;
            let start = self.byte;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let token = match c {
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '+' => Token::Operator(Op::Plus),
                '-' => Token::Operator(Op::Minus),
                '*' => Token::Operator(Op::Star),
                '/' => Token::Operator(Op::Slash),
                '0'..='9' | '.' => return Some(self.number(cur, start)),
                c if c.is_whitespace() => continue,
                c => {
                    // Nothing after a bad character is worth lexing.
                    self.rest = "";
                    return Some(Err(CalcError::InvalidCharacter {
                        src: self.source(),
                        bad_bit: SourceSpan::from(start..self.byte),
                        token: c,
                    }));
                }
            };
            log::trace!("token {token} at byte {start}");
            return Some(Ok(token));
        }
    }
}

/// Splits `expression` into tokens, stopping at the first bad character or
/// malformed number. An empty expression gives an empty sequence.
pub fn tokenize(expression: &str) -> Result<Vec<Token<'_>>, CalcError> {
    tokenize_named(None, expression)
}

pub fn tokenize_named<'de>(
    filename: Option<&'de str>,
    expression: &'de str,
) -> Result<Vec<Token<'de>>, CalcError> {
    let tokens = Lexer::new(filename, expression).collect::<Result<Vec<_>, _>>()?;
    log::debug!("lexed {} tokens from {expression:?}", tokens.len());
    Ok(tokens)
}
