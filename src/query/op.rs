//! Closed comparison vocabulary shared by the parser and the evaluator.

use std::fmt;

/// A comparison operator accepted in query parameters.
///
/// The set is closed: the parser refuses anything else, and the evaluator
/// dispatches exhaustively, so the two cannot drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    /// Equality (the default when no operator is given).
    Eq,
    /// Inequality.
    Ne,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Membership in a comma-separated list.
    In,
}

impl Operator {
    /// Parses a query-string operator token. Returns `None` for anything
    /// outside the closed vocabulary.
    pub fn parse(token: &str) -> Option<Operator> {
        match token {
            "eq" => Some(Operator::Eq),
            "ne" => Some(Operator::Ne),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "in" => Some(Operator::In),
            _ => None,
        }
    }

    /// The canonical token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::In => "in",
        }
    }

    /// All operators, in token order. Used when scanning objects for
    /// operator keys.
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::In,
    ];
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
