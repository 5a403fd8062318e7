//! Literal-or-script rule values.

/// Prefix marking a rule value as a script expression.
pub const SCRIPT_PREFIX: &str = "@js:";

/// A rule-supplied string, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue<'a> {
    /// Used as-is.
    Literal(&'a str),
    /// Script source with the prefix stripped.
    Script(&'a str),
}

impl<'a> RuleValue<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(SCRIPT_PREFIX) {
            Some(script) => RuleValue::Script(script),
            None => RuleValue::Literal(raw),
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, RuleValue::Script(_))
    }
}
