//! Parser for translation text.
//!
//! Translation text is literal characters with `{name}` interpolations and
//! `{name(arg, ...)}` function invocations. Doubled braces (`{{`, `}}`)
//! escape literal braces. Arguments are parameter names, single-quoted
//! strings, or integer literals, never arbitrary expressions.

use super::GrammarError;

/// One segment of parsed translation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextNode {
    /// A run of literal characters, emitted verbatim (encoded at render time).
    Literal(String),
    /// `{name}`: render the parameter's value.
    Interpolation(String),
    /// `{name(arg, ...)}`: invoke a runtime-supplied function.
    Call { name: String, args: Vec<CallArg> },
}

/// An argument to a function invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Param(String),
    Str(String),
    Number(i64),
}

/// Parsed translation text, in authored order.
pub type TextAst = Vec<TextNode>;

pub fn parse_text(input: &str) -> Result<TextAst, GrammarError> {
    let mut nodes = Vec::new();
    let mut literal = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(GrammarError::new("unmatched '}' (escape it as '}}')"));
            }
            '{' => {
                if !literal.is_empty() {
                    nodes.push(TextNode::Literal(std::mem::take(&mut literal)));
                }
                nodes.push(parse_placeholder(&mut chars)?);
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        nodes.push(TextNode::Literal(literal));
    }

    Ok(nodes)
}

/// Parse the inside of a `{...}` placeholder, consuming the closing brace.
fn parse_placeholder(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<TextNode, GrammarError> {
    skip_spaces(chars);
    let name = read_ident(chars)
        .ok_or_else(|| GrammarError::new("expected a parameter or function name after '{'"))?;
    skip_spaces(chars);

    match chars.next() {
        Some('}') => Ok(TextNode::Interpolation(name)),
        Some('(') => {
            let args = parse_args(chars)?;
            skip_spaces(chars);
            match chars.next() {
                Some('}') => Ok(TextNode::Call { name, args }),
                _ => Err(GrammarError::new(format!(
                    "unclosed invocation of '{name}' (missing '}}')"
                ))),
            }
        }
        _ => Err(GrammarError::new(format!(
            "unclosed placeholder '{{{name}' (missing '}}')"
        ))),
    }
}

/// Parse a comma-separated argument list, consuming the closing parenthesis.
fn parse_args(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Vec<CallArg>, GrammarError> {
    let mut args = Vec::new();

    skip_spaces(chars);
    if chars.peek() == Some(&')') {
        chars.next();
        return Ok(args);
    }

    loop {
        skip_spaces(chars);
        args.push(parse_arg(chars)?);
        skip_spaces(chars);
        match chars.next() {
            Some(',') => continue,
            Some(')') => return Ok(args),
            _ => return Err(GrammarError::new("expected ',' or ')' in argument list")),
        }
    }
}

fn parse_arg(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<CallArg, GrammarError> {
    match chars.peek() {
        Some('\'') => {
            chars.next();
            let mut value = String::new();
            for ch in chars.by_ref() {
                if ch == '\'' {
                    return Ok(CallArg::Str(value));
                }
                value.push(ch);
            }
            Err(GrammarError::new("unterminated string argument"))
        }
        Some(c) if c.is_ascii_digit() || *c == '-' => {
            let mut digits = String::new();
            if chars.peek() == Some(&'-') {
                digits.push('-');
                chars.next();
            }
            while let Some(c) = chars.peek() {
                if c.is_ascii_digit() {
                    digits.push(*c);
                    chars.next();
                } else {
                    break;
                }
            }
            digits
                .parse::<i64>()
                .map(CallArg::Number)
                .map_err(|_| GrammarError::new(format!("invalid number argument '{digits}'")))
        }
        _ => read_ident(chars)
            .map(CallArg::Param)
            .ok_or_else(|| GrammarError::new("expected an argument")),
    }
}

fn skip_spaces(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| *c == ' ') {
        chars.next();
    }
}

/// Read an identifier: `[A-Za-z_][A-Za-z0-9_]*`.
fn read_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(c) = chars.peek() {
        let ok = c.is_ascii_alphanumeric() || *c == '_';
        let starts_ok = c.is_ascii_alphabetic() || *c == '_';
        if (ident.is_empty() && starts_ok) || (!ident.is_empty() && ok) {
            ident.push(*c);
            chars.next();
        } else {
            break;
        }
    }
    if ident.is_empty() { None } else { Some(ident) }
}
