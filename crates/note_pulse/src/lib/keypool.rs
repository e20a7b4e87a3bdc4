use std::fmt;
use std::sync::Mutex;

use crate::error::Error;

/// An opaque API key authorizing calls to one external provider account.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        ApiKey(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        ApiKey(key.to_string())
    }
}

// Keys are secrets; keep them out of logs and error output.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

struct KeyUsage {
    key: ApiKey,
    count: u64,
}

/// Pool of interchangeable API keys for one external provider.
///
/// Every draw dispenses the least-used key, with ties broken by insertion
/// order, so equally-used keys rotate round-robin. Counts only ever grow
/// and live for the process lifetime; the pool is never resized.
pub struct ApiKeyPool {
    entries: Mutex<Vec<KeyUsage>>,
}

impl ApiKeyPool {
    pub fn new<I, K>(keys: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = K>,
        K: Into<ApiKey>,
    {
        let entries: Vec<KeyUsage> = keys
            .into_iter()
            .map(|key| KeyUsage {
                key: key.into(),
                count: 0,
            })
            .collect();

        if entries.is_empty() {
            return Err(Error::EmptyKeyPool);
        }

        Ok(Self {
            entries: Mutex::new(entries),
        })
    }

    /// Dispenses the least-used key and counts the draw against it.
    ///
    /// The scan-select-increment sequence runs under the pool lock so
    /// concurrent requests cannot both observe the same minimum.
    pub fn next_key(&self) -> ApiKey {
        let mut entries = self.entries.lock().expect("key pool lock poisoned");
        // min_by_key returns the first minimal entry, which preserves
        // insertion order on ties
        let entry = entries
            .iter_mut()
            .min_by_key(|entry| entry.count)
            .expect("pool is constructed non-empty");
        entry.count += 1;
        entry.key.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("key pool lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current usage counts in insertion order.
    pub fn usage_counts(&self) -> Vec<u64> {
        self.entries
            .lock()
            .expect("key pool lock poisoned")
            .iter()
            .map(|entry| entry.count)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_list_is_a_configuration_error() {
        let result = ApiKeyPool::new(Vec::<String>::new());
        assert!(matches!(result, Err(Error::EmptyKeyPool)));
    }

    #[test]
    fn draws_rotate_in_insertion_order_on_ties() {
        let pool = ApiKeyPool::new(["a", "b", "c"]).unwrap();
        let drawn: Vec<String> = (0..6)
            .map(|_| pool.next_key().as_str().to_string())
            .collect();
        assert_eq!(drawn, ["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn least_used_key_is_preferred() {
        let pool = ApiKeyPool::new(["a", "b"]).unwrap();
        pool.next_key(); // a -> 1
        pool.next_key(); // b -> 1
        pool.next_key(); // a -> 2
        assert_eq!(pool.next_key().as_str(), "b");
    }

    #[test]
    fn usage_spread_never_exceeds_one() {
        let pool = ApiKeyPool::new(["a", "b", "c"]).unwrap();
        for draws in 1..=20u64 {
            pool.next_key();
            let counts = pool.usage_counts();
            let max = *counts.iter().max().unwrap();
            let min = *counts.iter().min().unwrap();
            assert!(
                max - min <= 1,
                "after {draws} draws counts drifted apart: {counts:?}"
            );
            if draws % 3 == 0 {
                assert_eq!(
                    max, min,
                    "counts should equalize at multiples of the pool size"
                );
            }
        }
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let key = ApiKey::from("sk-very-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(****)");
    }
}
