//! Playbook invocation data structures.
//!
//! Defines the request handed to the runner, the ordered extra-variable
//! list, and the command line built from them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::VarParseError;

/// Default external playbook runner.
pub const DEFAULT_TOOL: &str = "ansible-playbook";

/// Ordered list of `key=value` overrides passed to the playbook run.
///
/// Order is preserved so the command line is deterministic. Setting a key
/// that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraVars(Vec<(String, String)>);

impl ExtraVars {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing the value of an existing key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Builder-style variant of [`ExtraVars::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Merge another list on top of this one.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a list of `key=value` assignments.
    pub fn parse_assignments<I, S>(assignments: I) -> Result<Self, VarParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vars = Self::new();
        for assignment in assignments {
            let ExtraVar { key, value } = assignment.as_ref().parse()?;
            vars.set(key, value);
        }
        Ok(vars)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraVars {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut vars = Self::new();
        for (key, value) in iter {
            vars.set(key, value);
        }
        vars
    }
}

/// A single `key=value` assignment as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraVar {
    pub key: String,
    pub value: String,
}

impl FromStr for ExtraVar {
    type Err = VarParseError;

    /// Splits on the first `=`. The value may be empty or contain `=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) =
            s.split_once('=').ok_or_else(|| VarParseError::MissingSeparator(s.to_string()))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(VarParseError::EmptyKey(s.to_string()));
        }

        Ok(Self { key: key.to_string(), value: value.to_string() })
    }
}

/// Everything needed to run one playbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Playbook path or identifier, interpreted by the external tool
    pub playbook: String,

    /// Inventory host or group to target
    pub host: String,

    /// Extra variables, in command-line order
    pub extra_vars: ExtraVars,

    /// Binary of the external playbook runner
    pub tool: String,
}

impl InvocationRequest {
    /// Create a request with no extra variables and the default tool.
    pub fn new(playbook: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            playbook: playbook.into(),
            host: host.into(),
            extra_vars: ExtraVars::new(),
            tool: DEFAULT_TOOL.to_string(),
        }
    }

    /// Set the extra variables.
    #[must_use]
    pub fn with_extra_vars(mut self, extra_vars: ExtraVars) -> Self {
        self.extra_vars = extra_vars;
        self
    }

    /// Override the playbook runner binary.
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Build the command line for this request.
    pub fn command_line(&self) -> CommandLine {
        let mut tokens = Vec::with_capacity(4 + self.extra_vars.len() * 2);
        tokens.push(self.tool.clone());
        tokens.push(self.playbook.clone());
        tokens.push("-i".to_string());
        tokens.push(self.host.clone());

        for (key, value) in self.extra_vars.iter() {
            tokens.push("-e".to_string());
            tokens.push(format!("{key}={value}"));
        }

        CommandLine { tokens }
    }
}

/// Ordered tokens of an external invocation. The first token is the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Build a command line from raw tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { tokens: tokens.into_iter().map(Into::into).collect() }
    }

    /// The program to launch.
    pub fn program(&self) -> &str {
        self.tokens.first().map_or("", String::as_str)
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether `flag` appears immediately followed by `value`.
    pub fn has_pair(&self, flag: &str, value: &str) -> bool {
        self.tokens.windows(2).any(|pair| pair[0] == flag && pair[1] == value)
    }
}

impl fmt::Display for CommandLine {
    /// Renders the tokens as a copy-pasteable shell line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.tokens.iter().map(|t| shell_quote(t)).collect();
        f.write_str(&rendered.join(" "))
    }
}

/// Quote a token for display if the shell would split or expand it.
fn shell_quote(token: &str) -> String {
    const SAFE: &[char] = &['-', '_', '.', '/', '=', ':', ',', '+', '@', '%'];

    if !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric() || SAFE.contains(&c)) {
        return token.to_string();
    }

    format!("'{}'", token.replace('\'', r"'\''"))
}
