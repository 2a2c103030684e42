use keel_core::{query::Combine, stmt::Value};

/// A rendered predicate and its bound parameters, in placeholder order.
///
/// Placeholders are written as `?` and numbered, where the flavor needs it,
/// when the whole statement is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub text: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn new(text: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// A predicate that never matches.
    pub fn always_false() -> Self {
        Self::new("1=0", vec![])
    }
}

impl Combine for SqlFragment {
    fn or(mut self, other: Self) -> Self {
        self.params.extend(other.params);
        SqlFragment {
            text: format!("({} OR {})", self.text, other.text),
            params: self.params,
        }
    }
}
