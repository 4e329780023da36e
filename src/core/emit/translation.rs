//! Code generation for a single translation.
//!
//! A translation becomes either a plain string literal (simple text with no
//! placeholders) or a render function `function(vars, fns, ctx)`. The frozen
//! registry entry steers encoding: numbers stringify without encoding, enum
//! and gender values encode directly, everything else goes through the
//! shared `encodeIfString` helper since it may be a safe string.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::core::parsers::constraint::{Comparison, ConstraintAst, Operand};
use crate::core::parsers::text::{CallArg, TextAst, TextNode};
use crate::core::registry::{ParamType, TypeMap};
use crate::core::translation::TranslationBody;

use super::context::{EmissionContext, Helper};

/// Emit the JS expression for one translation body.
///
/// `used` collects the helpers this module must import; the shared context
/// deduplicates them batch-wide for the helper module itself.
pub fn emit_translation(
    body: &TranslationBody,
    key: &str,
    map: &TypeMap,
    ctx: &EmissionContext,
    used: &mut BTreeSet<Helper>,
) -> String {
    match body {
        TranslationBody::Simple(text) => {
            if let Some(literal) = literal_only(text) {
                // A plain string property; the runtime consumer encodes it.
                return js_string(&literal);
            }
            let concat = emit_text(text, map, ctx, used);
            format!(
                "function(vars, fns, ctx) {{\n        return {concat};\n    }}"
            )
        }
        TranslationBody::Branched(branches) => {
            let mut out = String::from("function(vars, fns, ctx) {\n");
            for branch in branches {
                let condition = emit_constraint(&branch.constraint);
                let concat = emit_text(&branch.text, map, ctx, used);
                let _ = write!(
                    out,
                    "        if ({condition}) {{\n            return {concat};\n        }}\n"
                );
            }
            let _ = write!(
                out,
                "        throw new Error({});\n    }}",
                js_string(&format!("no matching branch for key: {key}"))
            );
            out
        }
    }
}

/// The concatenated text as one literal, if it has no placeholders.
fn literal_only(text: &TextAst) -> Option<String> {
    let mut combined = String::new();
    for node in text {
        match node {
            TextNode::Literal(s) => combined.push_str(s),
            _ => return None,
        }
    }
    Some(combined)
}

fn emit_text(
    text: &TextAst,
    map: &TypeMap,
    ctx: &EmissionContext,
    used: &mut BTreeSet<Helper>,
) -> String {
    if text.is_empty() {
        return "\"\"".to_string();
    }

    let parts: Vec<String> = text
        .iter()
        .map(|node| match node {
            TextNode::Literal(s) => format!("ctx.encode({})", js_string(s)),
            TextNode::Interpolation(param) => emit_interpolation(param, map, ctx, used),
            TextNode::Call { name, args } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|arg| match arg {
                        CallArg::Param(p) => format!("vars[{}]", js_string(p)),
                        CallArg::Str(s) => js_string(s),
                        CallArg::Number(n) => n.to_string(),
                    })
                    .collect();
                let call = format!(
                    "fns[{}](ctx{}{})",
                    js_string(name),
                    if args.is_empty() { "" } else { ", " },
                    args.join(", ")
                );
                used.insert(Helper::EncodeIfString);
                format!("{}(ctx, {call})", ctx.require(Helper::EncodeIfString))
            }
        })
        .collect();

    parts.join(" + ")
}

fn emit_interpolation(
    param: &str,
    map: &TypeMap,
    ctx: &EmissionContext,
    used: &mut BTreeSet<Helper>,
) -> String {
    let access = format!("vars[{}]", js_string(param));
    match map.get(param) {
        // Numbers render without encoding.
        ParamType::Number => format!("String({access})"),
        // Enum and gender values are plain authored words.
        ParamType::Enum | ParamType::Gender => format!("ctx.encode({access})"),
        ParamType::String | ParamType::NumberOrString | ParamType::Unknown => {
            used.insert(Helper::EncodeIfString);
            format!("{}(ctx, {access})", ctx.require(Helper::EncodeIfString))
        }
    }
}

/// Emit a constraint as a JS condition; comparisons join with `&&`.
fn emit_constraint(constraint: &ConstraintAst) -> String {
    constraint
        .iter()
        .map(emit_comparison)
        .collect::<Vec<_>>()
        .join(" && ")
}

fn emit_comparison(comparison: &Comparison) -> String {
    let operand = match &comparison.operand {
        Operand::Number(n) => n.to_string(),
        // Enum words and quoted strings both compare as runtime strings.
        Operand::Str(s) | Operand::Word(s) => js_string(s),
    };
    format!(
        "vars[{}] {} {}",
        js_string(&comparison.param),
        comparison.op.js_token(),
        operand
    )
}

/// Escape a string as a JS double-quoted literal (JSON is a JS subset).
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s).expect("string serialization is infallible")
}
