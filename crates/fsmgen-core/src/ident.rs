//! Identifier derivation
//!
//! State and event names are free-form strings; the generated code refers to
//! them through constants such as `STATE_IDLE` and `EVENT_START`. Derivation
//! works on Unicode scalar values and is total: every input, including the
//! empty string, yields an identifier.

use std::fmt;

/// The two constant domains of a generated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    /// `STATE_*` constants
    State,
    /// `EVENT_*` constants
    Event,
}

impl ConstantKind {
    /// Prefix shared by every constant of this kind
    pub fn prefix(self) -> &'static str {
        match self {
            ConstantKind::State => "STATE",
            ConstantKind::Event => "EVENT",
        }
    }
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantKind::State => write!(f, "state"),
            ConstantKind::Event => write!(f, "event"),
        }
    }
}

/// Derive the constant identifier for a state or event name.
///
/// The result is `<PREFIX>_<BODY>` where the body is the upper-cased name,
/// with `_` at camel-case boundaries and in place of any character that is
/// not alphanumeric. The empty name has an empty body (`STATE_`).
///
/// Distinct names can derive the same identifier (`a-b` and `a_b`); callers
/// have to check for collisions.
pub fn derive_constant_name(kind: ConstantKind, raw: &str) -> String {
    let mut out = String::with_capacity(kind.prefix().len() + 1 + raw.len());
    out.push_str(kind.prefix());
    out.push('_');

    let mut prev: Option<char> = None;
    for c in raw.chars() {
        if c.is_alphanumeric() {
            let boundary = prev.is_some_and(|p| p.is_lowercase() || p.is_numeric());
            if c.is_uppercase() && boundary {
                out.push('_');
            }
            out.extend(c.to_uppercase());
        } else {
            out.push('_');
        }
        prev = Some(c);
    }

    if is_valid_identifier(&out) {
        return out;
    }

    // Alphanumeric but not XID, e.g. superscript digits.
    let mut escaped = String::with_capacity(out.len() * 2);
    for c in out.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push_str(&format!("U{:X}", c as u32));
        }
    }
    escaped
}

/// Whether `s` can be used verbatim as a Rust identifier.
///
/// Keywords are rejected.
pub fn is_valid_identifier(s: &str) -> bool {
    syn::parse_str::<syn::Ident>(s).is_ok()
}
