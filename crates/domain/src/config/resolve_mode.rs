use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a query is spread over the configured backends.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// One backend at a time, in declared order.
    #[default]
    InOrder,

    /// One backend at a time, order shuffled per query.
    Random,

    /// All backends at once, first successful answer wins.
    Concurrent,
}

impl ResolveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InOrder => "InOrder",
            Self::Random => "Random",
            Self::Concurrent => "Concurrent",
        }
    }
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "InOrder" => Ok(Self::InOrder),
            "Random" => Ok(Self::Random),
            "Concurrent" => Ok(Self::Concurrent),
            other => Err(format!(
                "unknown resolve mode '{}' (expected InOrder, Random or Concurrent)",
                other
            )),
        }
    }
}
