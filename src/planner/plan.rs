//! Invocation plan types.
//!
//! An invocation plan is the ordered list of initialization calls the
//! planner produces. Entries keep the argument order of the target method's
//! signature and are meant to be replayed safely.

use serde::{Deserialize, Serialize};

/// Method invoked on every configured channel.
pub const INITIALIZE: &str = "initialize";

/// A single argument of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Argument {
    /// A literal parameter value.
    Literal(String),
    /// The address of a resolved deployment record.
    Address(String),
    /// An ordered list of arguments.
    List(Vec<Argument>),
}

/// One planned invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationPlanEntry {
    /// Target record name.
    pub target: String,
    /// Method to invoke.
    pub method: String,
    /// Arguments in signature order.
    pub args: Vec<Argument>,
}

/// Ordered sequence of planned invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationPlan {
    /// Entries in execution order.
    pub entries: Vec<InvocationPlanEntry>,
}

impl Argument {
    /// Creates a literal argument.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates an address argument.
    #[must_use]
    pub fn address(value: impl Into<String>) -> Self {
        Self::Address(value.into())
    }

    /// Converts the argument into the plain JSON value a transaction
    /// encoder expects: strings for scalars, arrays for lists.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Literal(v) | Self::Address(v) => serde_json::Value::String(v.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl InvocationPlanEntry {
    /// Creates an `initialize` invocation on `target`.
    #[must_use]
    pub fn initialize(target: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            target: target.into(),
            method: String::from(INITIALIZE),
            args,
        }
    }

    /// Returns the progress line logged before the invocation runs.
    #[must_use]
    pub fn description(&self) -> String {
        format!("Configuring {}", self.target)
    }

    /// Returns the arguments as plain JSON values.
    #[must_use]
    pub fn json_args(&self) -> Vec<serde_json::Value> {
        self.args.iter().map(Argument::to_json).collect()
    }
}

impl InvocationPlan {
    /// Creates a plan from entries in execution order.
    #[must_use]
    pub const fn new(entries: Vec<InvocationPlanEntry>) -> Self {
        Self { entries }
    }

    /// Returns true if the plan has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over entries in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, InvocationPlanEntry> {
        self.entries.iter()
    }

    /// Returns target record names in execution order.
    #[must_use]
    pub fn targets(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.target.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a InvocationPlan {
    type Item = &'a InvocationPlanEntry;
    type IntoIter = std::slice::Iter<'a, InvocationPlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "\"{v}\""),
            Self::Address(v) => write!(f, "{v}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl std::fmt::Display for InvocationPlanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}(", self.target, self.method)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

impl std::fmt::Display for InvocationPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "No invocations planned");
        }

        writeln!(f, "Invocation Plan ({} entries):", self.entries.len())?;
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "  {}. {entry}", i + 1)?;
        }
        Ok(())
    }
}
