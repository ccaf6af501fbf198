//! Typed command lines.
//!
//! A [`Command`] is a sequence of [`Action`]s rendered as
//! `Name(arg,arg) Name(arg)`. Arguments are made protocol-safe when they are
//! added, so rendering never fails.

use std::fmt;

use crate::error::Result;
use crate::quote::{is_bare, quote};

/// One action invocation, e.g. `MoveCursor(3,7)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: &'static str,
    args: Vec<String>,
}

impl Action {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Add an argument whose textual form never needs quoting.
    ///
    /// Use [`Action::text`] for anything that might.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        debug_assert!(is_bare(&value), "argument {value:?} needs quoting");
        self.args.push(value);
        self
    }

    /// Add a free-text argument, quoting it as needed.
    pub fn text(mut self, text: &str, quote_backslashes: bool) -> Result<Self> {
        self.args.push(quote(text, quote_backslashes)?);
        Ok(self)
    }

    /// Add an argument that is already in wire form.
    pub(crate) fn encoded(mut self, encoded: String) -> Self {
        self.args.push(encoded);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(","))
    }
}

/// A full command line: one or more actions executed in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    actions: Vec<Action>,
}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Append all actions of `other`.
    pub fn extend(&mut self, other: Command) {
        self.actions.extend(other.actions);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        Self {
            actions: vec![action],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{action}")?;
        }
        Ok(())
    }
}
