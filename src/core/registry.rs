//! Per-key parameter type records and the registry that owns them.
//!
//! Every translation key has one [`TypeMap`]: a record of each parameter's
//! semantic type, formed from authoritative `meta.yml` declarations plus
//! usages inferred during joint analysis. The [`TypeRegistry`] is an arena of
//! per-key entries, each behind its own mutex so analysis can fan out across
//! distinct keys while mutation of any single key stays serialized.
//!
//! The registry is mutable until the batch freezes, then read-only. Mutating
//! a frozen entry is a programming fault and panics; it is never a user error.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Mutex;

/// Semantic type of one translation parameter.
///
/// Matches the six tokens accepted in `meta.yml` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamType {
    Number,
    String,
    NumberOrString,
    Enum,
    Gender,
    Unknown,
}

impl ParamType {
    /// Parse a declaration token. Returns `None` for anything outside the
    /// six recognized tokens; the meta loader turns that into a ConfigError.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token {
            "number" => Some(ParamType::Number),
            "string" => Some(ParamType::String),
            "number-or-string" => Some(ParamType::NumberOrString),
            "enum" => Some(ParamType::Enum),
            "gender" => Some(ParamType::Gender),
            "unknown" => Some(ParamType::Unknown),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::NumberOrString => "number-or-string",
            ParamType::Enum => "enum",
            ParamType::Gender => "gender",
            ParamType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// How a parameter's recorded type came to be.
///
/// The split keeps the final registry state independent of the order usages
/// are observed: declarations always win, hard usages always win over soft
/// ones, and hard usages join commutatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeOrigin {
    /// Authoritative `meta.yml` declaration. Never widened.
    Declared,
    /// Inferred from a constraint comparison. Joins with later hard usages.
    Inferred,
    /// Inferred from interpolation only (a printable context). Replaced by
    /// any hard usage.
    Soft,
}

/// One usage of a parameter observed during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeUsage {
    /// The parameter is rendered as text (`{name}` or a function argument).
    /// Compatible with every type; defaults an unseen parameter to
    /// `number-or-string`.
    Printable,
    /// The parameter is compared in a constraint, pinning a concrete type.
    Exact(ParamType),
}

/// An irreconcilable pair of usages for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageConflict {
    pub param: String,
    pub existing: ParamType,
    pub incoming: ParamType,
}

#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    ty: ParamType,
    origin: TypeOrigin,
}

/// Per-key record of parameter name → semantic type.
#[derive(Debug, Default)]
pub struct TypeMap {
    params: BTreeMap<String, ParamEntry>,
    frozen: bool,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an authoritative declaration for a parameter.
    pub fn declare(&mut self, param: impl Into<String>, ty: ParamType) {
        assert!(!self.frozen, "TypeMap::declare called after freeze");
        self.params.insert(
            param.into(),
            ParamEntry {
                ty,
                origin: TypeOrigin::Declared,
            },
        );
    }

    /// Merge one observed usage into the record.
    ///
    /// Merge rule: an explicit declaration wins (an incompatible hard usage
    /// is a conflict); conflicting hard usages widen where the lattice allows
    /// it and fail otherwise; printable usage never widens a known type.
    pub fn add_usage(&mut self, param: &str, usage: TypeUsage) -> Result<(), UsageConflict> {
        assert!(!self.frozen, "TypeMap::add_usage called after freeze");

        let Some(entry) = self.params.get_mut(param) else {
            let entry = match usage {
                TypeUsage::Printable => ParamEntry {
                    ty: ParamType::NumberOrString,
                    origin: TypeOrigin::Soft,
                },
                TypeUsage::Exact(ty) => ParamEntry {
                    ty,
                    origin: TypeOrigin::Inferred,
                },
            };
            self.params.insert(param.to_string(), entry);
            return Ok(());
        };

        let TypeUsage::Exact(incoming) = usage else {
            // Printable contexts accept every type as-is.
            return Ok(());
        };

        match entry.origin {
            TypeOrigin::Declared => {
                if declared_accepts(entry.ty, incoming) {
                    Ok(())
                } else {
                    Err(UsageConflict {
                        param: param.to_string(),
                        existing: entry.ty,
                        incoming,
                    })
                }
            }
            TypeOrigin::Inferred => match join(entry.ty, incoming) {
                Some(widened) => {
                    entry.ty = widened;
                    Ok(())
                }
                None => Err(UsageConflict {
                    param: param.to_string(),
                    existing: entry.ty,
                    incoming,
                }),
            },
            TypeOrigin::Soft => {
                entry.ty = incoming;
                entry.origin = TypeOrigin::Inferred;
                Ok(())
            }
        }
    }

    /// The recorded type of a parameter; unseen parameters are `unknown`.
    pub fn get(&self, param: &str) -> ParamType {
        self.params
            .get(param)
            .map(|e| e.ty)
            .unwrap_or(ParamType::Unknown)
    }

    pub fn contains(&self, param: &str) -> bool {
        self.params.contains_key(param)
    }

    /// Iterate parameters in name order.
    pub fn params(&self) -> impl Iterator<Item = (&str, ParamType)> {
        self.params.iter().map(|(name, e)| (name.as_str(), e.ty))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// Least upper bound of two hard-inferred types, or `None` when the pair is
/// irreconcilable (e.g. a numeric value vs an enum-branch selector).
fn join(a: ParamType, b: ParamType) -> Option<ParamType> {
    use ParamType::*;
    if a == b {
        return Some(a);
    }
    match (a, b) {
        (Unknown, other) | (other, Unknown) => Some(other),
        (Gender, Enum) | (Enum, Gender) => Some(Enum),
        (Number | String | NumberOrString, Number | String | NumberOrString) => {
            Some(NumberOrString)
        }
        _ => None,
    }
}

/// Whether a declared type admits a hard usage without widening.
fn declared_accepts(declared: ParamType, usage: ParamType) -> bool {
    use ParamType::*;
    declared == usage
        || declared == Unknown
        || matches!((declared, usage), (NumberOrString, Number | String))
        || matches!((declared, usage), (Gender | Enum, Enum))
}

/// Arena of per-key type maps.
///
/// Built single-threaded (declarations, then one entry per aggregated key),
/// shared immutably across the parallel analysis fan-out. Cross-key access is
/// lock-free; intra-key mutation is serialized by each entry's mutex.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, Mutex<TypeMap>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration, creating the key's entry if needed.
    pub fn declare(&mut self, key: &str, param: impl Into<String>, ty: ParamType) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .get_mut()
            .expect("type map lock poisoned")
            .declare(param, ty);
    }

    /// Ensure an entry exists for a key, creating an empty map if absent.
    pub fn ensure(&mut self, key: &str) {
        self.entries.entry(key.to_string()).or_default();
    }

    /// The entry for a key, if one was declared or ensured.
    pub fn entry(&self, key: &str) -> Option<&Mutex<TypeMap>> {
        self.entries.get(key)
    }

    /// Freeze every entry. After this point any mutation attempt panics.
    pub fn freeze(&self) {
        for entry in self.entries.values() {
            entry.lock().expect("type map lock poisoned").freeze();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
