//! Renders emitted modules the way a runtime consumer would.
//!
//! The emitted grammar is small: a property is either a string literal or a
//! `function(vars, fns, ctx)` whose body is a first-match if-chain of
//! comparisons over `vars`, returning concatenations of encoded literals and
//! variable accesses. Interpreting that here checks what the generated code
//! renders for concrete variable bindings, not just its source text.

use std::collections::HashMap;

use anyhow::Result;
use pretty_assertions::assert_eq;

use super::CliTest;

/// A runtime variable binding.
#[derive(Debug, Clone, PartialEq)]
enum JsValue {
    Str(String),
    Num(i64),
}

fn str_val(s: &str) -> JsValue {
    JsValue::Str(s.to_string())
}

/// Look up a key in an emitted module and evaluate it against `vars`.
fn render(module: &str, key: &str, vars: &HashMap<&str, JsValue>) -> String {
    let needle = format!(
        "    {}: ",
        serde_json::to_string(key).expect("key serializes")
    );
    let start = module.find(&needle).expect("key not present in module") + needle.len();
    let rest = &module[start..];

    if let Some(body) = rest.strip_prefix("function(vars, fns, ctx) {\n") {
        let end = body.find("\n    },").expect("unterminated function");
        eval_body(&body[..end], vars)
    } else {
        let end = rest.find(",\n").expect("unterminated property");
        serde_json::from_str(&rest[..end]).expect("string property")
    }
}

fn eval_body(body: &str, vars: &HashMap<&str, JsValue>) -> String {
    let mut lines = body.lines();
    while let Some(line) = lines.next() {
        let line = line.trim_start();
        if let Some(cond) = line.strip_prefix("if (").and_then(|l| l.strip_suffix(") {")) {
            let ret = lines.next().expect("branch body").trim_start();
            let expr = ret
                .strip_prefix("return ")
                .and_then(|l| l.strip_suffix(';'))
                .expect("branch returns an expression");
            lines.next(); // closing brace
            if cond.split(" && ").all(|cmp| eval_comparison(cmp, vars)) {
                return eval_expr(expr, vars);
            }
        } else if let Some(expr) = line.strip_prefix("return ").and_then(|l| l.strip_suffix(';')) {
            return eval_expr(expr, vars);
        } else if line.starts_with("throw new Error(") {
            panic!("no branch matched: {line}");
        } else {
            panic!("unrecognized statement: {line}");
        }
    }
    panic!("function body had no return");
}

fn eval_comparison(cmp: &str, vars: &HashMap<&str, JsValue>) -> bool {
    let (name, rest) = var_access(cmp);
    let rest = rest.strip_prefix(' ').expect("operator follows the variable");
    let (op, operand) = rest.split_once(' ').expect("comparison has an operand");
    let value = &vars[name.as_str()];

    if operand.starts_with('"') {
        let (expected, _) = scan_string(operand);
        let JsValue::Str(actual) = value else {
            return op == "!==";
        };
        match op {
            "===" => *actual == expected,
            "!==" => *actual != expected,
            other => panic!("string comparison with '{other}'"),
        }
    } else {
        let expected: i64 = operand.parse().expect("numeric operand");
        let JsValue::Num(actual) = value else {
            return op == "!==";
        };
        match op {
            "===" => *actual == expected,
            "!==" => *actual != expected,
            "<" => *actual < expected,
            "<=" => *actual <= expected,
            ">" => *actual > expected,
            ">=" => *actual >= expected,
            other => panic!("unknown operator '{other}'"),
        }
    }
}

fn eval_expr(expr: &str, vars: &HashMap<&str, JsValue>) -> String {
    let mut out = String::new();
    let mut rest = expr;
    loop {
        let after = eval_term(rest, &mut out, vars);
        match after.strip_prefix(" + ") {
            Some(next) => rest = next,
            None => {
                assert!(after.is_empty(), "trailing text in expression: {after}");
                return out;
            }
        }
    }
}

/// Evaluate one concatenation term, returning the unconsumed remainder.
fn eval_term<'a>(term: &'a str, out: &mut String, vars: &HashMap<&str, JsValue>) -> &'a str {
    if let Some(rest) = term.strip_prefix("ctx.encode(") {
        let rest = if rest.starts_with('"') {
            let (text, rest) = scan_string(rest);
            out.push_str(&text);
            rest
        } else {
            let (name, rest) = var_access(rest);
            out.push_str(&as_string(&vars[name.as_str()]));
            rest
        };
        rest.strip_prefix(')').expect("unclosed encode")
    } else if let Some(rest) = term.strip_prefix("String(") {
        let (name, rest) = var_access(rest);
        out.push_str(&as_string(&vars[name.as_str()]));
        rest.strip_prefix(')').expect("unclosed String")
    } else if let Some(rest) = term.strip_prefix("encodeIfString(ctx, ") {
        let (name, rest) = var_access(rest);
        out.push_str(&as_string(&vars[name.as_str()]));
        rest.strip_prefix(')').expect("unclosed encodeIfString")
    } else if term.starts_with('"') {
        let (text, rest) = scan_string(term);
        out.push_str(&text);
        rest
    } else {
        panic!("unrecognized term: {term}");
    }
}

/// Consume a `vars["name"]` access, returning the name and the remainder.
fn var_access(input: &str) -> (String, &str) {
    let rest = input.strip_prefix("vars[").expect("variable access");
    let (name, rest) = scan_string(rest);
    (name, rest.strip_prefix(']').expect("unclosed variable access"))
}

fn as_string(value: &JsValue) -> String {
    match value {
        JsValue::Str(s) => s.clone(),
        JsValue::Num(n) => n.to_string(),
    }
}

/// Consume one double-quoted literal, returning its decoded value and the
/// remainder.
fn scan_string(input: &str) -> (String, &str) {
    assert!(input.starts_with('"'), "expected a string literal in: {input}");
    let bytes = input.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                let (literal, rest) = input.split_at(i + 1);
                let decoded = serde_json::from_str(literal).expect("valid string literal");
                return (decoded, rest);
            }
            _ => i += 1,
        }
    }
    panic!("unterminated string literal in: {input}");
}

/// Compile a seeded project and return the emitted `en.js`.
fn compiled_en_module() -> Result<String> {
    let test = CliTest::new()?;
    test.write_file(
        "i18n/meta.yml",
        "greeting.hello:\n  parameters:\n    name:\n      type: string\n",
    )?;
    test.write_file(
        "i18n/en.yml",
        "greeting.hello: \"Hello, {name}!\"\ncart.items:\n  \"count == 1\": one item\n  \"count != 1\": \"{count} items\"\nplain: Just text\n",
    )?;

    let output = test.command().args(["i18n", "out"]).output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    test.read_file("out/en.js")
}

#[test]
fn emitted_greeting_renders_with_a_bound_name() -> Result<()> {
    let en = compiled_en_module()?;
    let vars = HashMap::from([("name", str_val("Ann"))]);
    assert_eq!(render(&en, "greeting.hello", &vars), "Hello, Ann!");
    Ok(())
}

#[test]
fn emitted_branches_select_by_bound_count() -> Result<()> {
    let en = compiled_en_module()?;
    assert_eq!(
        render(&en, "cart.items", &HashMap::from([("count", JsValue::Num(1))])),
        "one item"
    );
    assert_eq!(
        render(&en, "cart.items", &HashMap::from([("count", JsValue::Num(5))])),
        "5 items"
    );
    Ok(())
}

#[test]
fn plain_properties_render_as_their_text() -> Result<()> {
    let en = compiled_en_module()?;
    assert_eq!(render(&en, "plain", &HashMap::new()), "Just text");
    Ok(())
}
