/// Logical connector between two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One accumulated predicate with the connector that joins it to the
/// conditions before it. The first condition has no connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<F> {
    pub connector: Option<Connector>,
    pub fragment: F,
}

/// Predicates that can be merged into a disjunction.
pub trait Combine: Sized {
    /// Returns `(self OR other)`.
    fn or(self, other: Self) -> Self;
}

/// Conditions, pending connector and limit accumulated by one query
/// builder.
///
/// `F` is the backend's predicate form: a rendered SQL fragment, or a
/// [`Filter`](super::Filter) for stores without a query language.
#[derive(Debug, Clone)]
pub struct QueryState<F> {
    conditions: Vec<Condition<F>>,
    pending: Connector,
    limit: Option<usize>,
}

impl<F> Default for QueryState<F> {
    fn default() -> Self {
        Self {
            conditions: vec![],
            pending: Connector::And,
            limit: None,
        }
    }
}

impl<F: Combine> QueryState<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate.
    ///
    /// With `OR` pending the predicate is absorbed into the previous
    /// condition, which becomes `(previous OR predicate)`. Otherwise it is
    /// appended with `AND`. Either way the pending connector resets to
    /// `AND`.
    pub fn push(&mut self, fragment: F) {
        let pending = std::mem::take(&mut self.pending);

        match (self.conditions.pop(), pending) {
            (None, _) => self.conditions.push(Condition {
                connector: None,
                fragment,
            }),
            (Some(previous), Connector::Or) => self.conditions.push(Condition {
                connector: previous.connector,
                fragment: previous.fragment.or(fragment),
            }),
            (Some(previous), Connector::And) => {
                self.conditions.push(previous);
                self.conditions.push(Condition {
                    connector: Some(Connector::And),
                    fragment,
                });
            }
        }
    }

    /// Sets the connector used by the next [`push`](Self::push).
    pub fn and(&mut self) {
        self.pending = Connector::And;
    }

    /// Sets the connector used by the next [`push`](Self::push).
    pub fn or(&mut self) {
        self.pending = Connector::Or;
    }

    /// Stores a positive limit. Zero or negative input clears it.
    pub fn limit(&mut self, n: i64) {
        self.limit = usize::try_from(n).ok().filter(|n| *n > 0);
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn pending(&self) -> Connector {
        self.pending
    }

    pub fn into_conditions(self) -> Vec<Condition<F>> {
        self.conditions
    }
}
