//! Strongly-typed compiler and runtime flags.
//!
//! A `FlagSequence` is the unit that gets mirrored between compile and
//! execute tasks, so equality is defined over the full ordered token list.
//! Two sequences with the same tokens in a different order are different
//! sequences.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::util::Name;

/// A single command-line token (e.g. `--enable-preview`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagToken(Name);

impl FlagToken {
    /// Create a new flag token.
    pub fn new(token: impl AsRef<str>) -> Self {
        FlagToken(Name::new(token))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FlagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FlagToken {
    fn from(s: &str) -> Self {
        FlagToken::new(s)
    }
}

impl From<String> for FlagToken {
    fn from(s: String) -> Self {
        FlagToken::new(s)
    }
}

/// An ordered sequence of flag tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSequence(Vec<FlagToken>);

impl FlagSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        FlagSequence(Vec::new())
    }

    /// Append a single token.
    pub fn push(&mut self, token: impl Into<FlagToken>) {
        self.0.push(token.into());
    }

    /// Append every token of another sequence, preserving its order.
    pub fn extend_from(&mut self, other: &FlagSequence) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Builder-style variant of [`FlagSequence::extend_from`].
    pub fn chain(mut self, other: &FlagSequence) -> Self {
        self.extend_from(other);
        self
    }

    /// Render the sequence as owned strings, ready for a command line.
    pub fn to_args(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_string()).collect()
    }

    /// Index of the first position where `self` and `other` differ, if any.
    pub fn first_divergence(&self, other: &FlagSequence) -> Option<usize> {
        let common = self.0.len().min(other.0.len());
        (0..common)
            .find(|&i| self.0[i] != other.0[i])
            .or_else(|| (self.0.len() != other.0.len()).then_some(common))
    }
}

impl Deref for FlagSequence {
    type Target = [FlagToken];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Into<FlagToken>> FromIterator<T> for FlagSequence {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FlagSequence(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a FlagSequence {
    type Item = &'a FlagToken;
    type IntoIter = std::slice::Iter<'a, FlagToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FlagSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order_matters() {
        let a: FlagSequence = ["--enable-preview", "--add-modules", "X"].into_iter().collect();
        let b: FlagSequence = ["--add-modules", "X", "--enable-preview"].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a.first_divergence(&b), Some(0));
    }

    #[test]
    fn test_first_divergence_on_length() {
        let a: FlagSequence = ["--enable-preview"].into_iter().collect();
        let b = a.clone().chain(&["--add-modules"].into_iter().collect());
        assert_eq!(a.first_divergence(&b), Some(1));
        assert_eq!(a.first_divergence(&a.clone()), None);
    }

    #[test]
    fn test_display_and_args() {
        let seq: FlagSequence = ["--add-modules", "jdk.incubator.concurrent"].into_iter().collect();
        assert_eq!(seq.to_string(), "--add-modules jdk.incubator.concurrent");
        assert_eq!(seq.to_args(), vec!["--add-modules", "jdk.incubator.concurrent"]);
        assert_eq!(seq[1].as_str(), "jdk.incubator.concurrent");
    }

    #[test]
    fn test_serde_transparent() {
        let seq: FlagSequence = ["-Xlint", "--enable-preview"].into_iter().collect();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"["-Xlint","--enable-preview"]"#);
    }
}
