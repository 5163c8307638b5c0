//! Hashing utilities for configuration fingerprints.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
///
/// Components are separated so that `["ab", "c"]` and `["a", "bc"]` hash
/// differently.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add a list of strings, length-prefixed so adjacent lists cannot
    /// run into each other.
    pub fn update_strs<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> &mut Self {
        let items: Vec<&str> = items.into_iter().collect();
        self.hasher.update((items.len() as u64).to_le_bytes());
        for s in items {
            self.update_str(s);
        }
        self
    }

    /// Add an optional string component.
    pub fn update_opt(&mut self, opt: Option<&str>) -> &mut Self {
        match opt {
            Some(s) => {
                self.hasher.update(b"\x01");
                self.update_str(s);
            }
            None => {
                self.hasher.update(b"\x00");
            }
        }
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(self) -> String {
        let mut full = self.finish();
        full.truncate(16);
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_full_sha256_hex() {
        let mut fp = Fingerprint::new();
        fp.update_str("hello");
        let digest = fp.finish();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let make = || {
            let mut fp = Fingerprint::new();
            fp.update_str("java-lib").update_strs(["--enable-preview"]);
            fp.finish()
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn test_fingerprint_separates_components() {
        let mut a = Fingerprint::new();
        a.update_strs(["--add-modules", "X"]).update_strs(Vec::<&str>::new());
        let mut b = Fingerprint::new();
        b.update_strs(["--add-modules"]).update_strs(["X"]);
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_fingerprint_option_marker() {
        let mut a = Fingerprint::new();
        a.update_opt(None);
        let mut b = Fingerprint::new();
        b.update_opt(Some(""));
        assert_ne!(a.finish_short(), b.finish_short());
    }
}
