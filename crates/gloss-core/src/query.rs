use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GlossError;

/// How multiple search terms combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Every term must match.
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    /// At least one term must match.
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl Operator {
    pub fn toggled(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Operator {
    type Err = GlossError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Self::Or)
        } else {
            Err(GlossError::InvalidOperator(s.to_string()))
        }
    }
}

/// Split a raw query into non-empty, trimmed terms.
pub fn tokenize(raw_query: &str) -> Vec<String> {
    raw_query.split_whitespace().map(str::to_string).collect()
}
