//! Parser for branch constraints.
//!
//! A constraint is a comma-separated list of comparisons, all of which must
//! hold for the branch to match: `count == 1`, `gender = male, count > 0`.
//! Operands are integers, single-quoted strings, or bare enum words; ordering
//! comparisons only make sense against numbers and reject anything else.

use std::fmt;

use super::GrammarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ConstraintOp {
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ConstraintOp::Lt | ConstraintOp::Lte | ConstraintOp::Gt | ConstraintOp::Gte
        )
    }

    /// The operator as it appears in emitted JavaScript.
    pub fn js_token(&self) -> &'static str {
        match self {
            ConstraintOp::Eq => "===",
            ConstraintOp::Neq => "!==",
            ConstraintOp::Lt => "<",
            ConstraintOp::Lte => "<=",
            ConstraintOp::Gt => ">",
            ConstraintOp::Gte => ">=",
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ConstraintOp::Eq => "==",
            ConstraintOp::Neq => "!=",
            ConstraintOp::Lt => "<",
            ConstraintOp::Lte => "<=",
            ConstraintOp::Gt => ">",
            ConstraintOp::Gte => ">=",
        };
        f.write_str(token)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Number(i64),
    /// A single-quoted string literal.
    Str(String),
    /// A bare word, treated as an enum (or gender) value.
    Word(String),
}

/// One `param op operand` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub param: String,
    pub op: ConstraintOp,
    pub operand: Operand,
}

/// A full constraint: every comparison must hold.
pub type ConstraintAst = Vec<Comparison>;

pub fn parse_constraint(input: &str) -> Result<ConstraintAst, GrammarError> {
    let mut comparisons = Vec::new();

    for part in split_comparisons(input) {
        let part = part.trim();
        if part.is_empty() {
            return Err(GrammarError::new("empty comparison in constraint"));
        }
        comparisons.push(parse_comparison(part)?);
    }

    Ok(comparisons)
}

/// Split a constraint into comparisons at commas, skipping commas inside
/// single-quoted string operands.
fn split_comparisons(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, ch) in input.char_indices() {
        match ch {
            '\'' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);

    parts
}

fn parse_comparison(input: &str) -> Result<Comparison, GrammarError> {
    let op_start = input
        .find(|c| matches!(c, '=' | '!' | '<' | '>'))
        .ok_or_else(|| {
            GrammarError::new(format!("expected a comparison operator in '{input}'"))
        })?;

    let param = input[..op_start].trim();
    if param.is_empty() || !is_ident(param) {
        return Err(GrammarError::new(format!(
            "expected a parameter name before the operator in '{input}'"
        )));
    }

    let rest = &input[op_start..];
    let (op, operand_text) = split_operator(rest)
        .ok_or_else(|| GrammarError::new(format!("invalid comparison operator in '{input}'")))?;

    let operand = parse_operand(operand_text.trim())?;

    if op.is_ordering() && !matches!(operand, Operand::Number(_)) {
        return Err(GrammarError::new(format!(
            "ordering comparison '{op}' requires a number in '{input}'"
        )));
    }

    Ok(Comparison {
        param: param.to_string(),
        op,
        operand,
    })
}

/// Split the operator off the front of `rest`, longest token first.
fn split_operator(rest: &str) -> Option<(ConstraintOp, &str)> {
    for (token, op) in [
        ("==", ConstraintOp::Eq),
        ("!=", ConstraintOp::Neq),
        ("<=", ConstraintOp::Lte),
        (">=", ConstraintOp::Gte),
        ("=", ConstraintOp::Eq),
        ("<", ConstraintOp::Lt),
        (">", ConstraintOp::Gt),
    ] {
        if let Some(operand) = rest.strip_prefix(token) {
            return Some((op, operand));
        }
    }
    None
}

fn parse_operand(text: &str) -> Result<Operand, GrammarError> {
    if text.is_empty() {
        return Err(GrammarError::new("missing operand in comparison"));
    }

    if let Some(inner) = text.strip_prefix('\'') {
        let Some(value) = inner.strip_suffix('\'') else {
            return Err(GrammarError::new(format!(
                "unterminated string operand '{text}'"
            )));
        };
        return Ok(Operand::Str(value.to_string()));
    }

    if text.starts_with('-') || text.starts_with(|c: char| c.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .map(Operand::Number)
            .map_err(|_| GrammarError::new(format!("invalid number operand '{text}'")));
    }

    if is_ident(text) {
        return Ok(Operand::Word(text.to_string()));
    }

    Err(GrammarError::new(format!("invalid operand '{text}'")))
}

fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
