/// Returns `true` once `now` has reached `expires_at`.
///
/// Both the read path and the sweep decide expiration through this function,
/// so an item is never visible to one and reclaimed by the other at the same
/// instant.
#[inline]
pub fn is_expired(expires_at: i64, now: i64) -> bool {
    expires_at <= now
}

/// A serialized payload with its absolute expiration time (epoch seconds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    payload: Box<[u8]>,
    expires_at: i64,
}

impl Item {
    /// Creates a new item from serialized bytes and an expiration timestamp
    pub fn new(payload: impl Into<Box<[u8]>>, expires_at: i64) -> Self {
        Self {
            payload: payload.into(),
            expires_at,
        }
    }

    /// Returns the serialized payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the expiration time in epoch seconds
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Checks if this item has expired as of `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        is_expired(self.expires_at, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_not_expired() {
        let item = Item::new(b"{\"text\":\"hi\"}".to_vec(), 1_060);

        assert_eq!(item.payload(), b"{\"text\":\"hi\"}");
        assert_eq!(item.expires_at(), 1_060);
        assert!(!item.is_expired_at(1_059));
    }

    #[test]
    fn test_item_expires_at_exact_deadline() {
        let item = Item::new(Vec::new(), 1_060);

        assert!(item.is_expired_at(1_060));
        assert!(item.is_expired_at(1_061));
    }

    #[test]
    fn test_is_expired_boundaries() {
        assert!(!is_expired(10, 9));
        assert!(is_expired(10, 10));
        assert!(is_expired(i64::MIN, 0));
        assert!(!is_expired(i64::MAX, 0));
    }
}
