use rand::distr::Alphanumeric;
use rand::Rng;

use crate::config::DEFAULT_ID_LENGTH;
use crate::error::GeneratorError;

/// Source of candidate identifiers for new items.
///
/// Implementations should return short, printable strings with a low chance
/// of repeating. The store handles the collisions that do happen.
///
/// Plain closures work too:
///
/// ```rust
/// use pastebox_core::{GeneratorError, IdGenerator};
///
/// let fixed = || Ok::<_, GeneratorError>("abc123".to_string());
/// assert_eq!(fixed.generate_id().unwrap(), "abc123");
/// ```
pub trait IdGenerator: Send + Sync {
    /// Produces one candidate identifier
    fn generate_id(&self) -> Result<String, GeneratorError>;
}

impl<F> IdGenerator for F
where
    F: Fn() -> Result<String, GeneratorError> + Send + Sync,
{
    fn generate_id(&self) -> Result<String, GeneratorError> {
        self()
    }
}

/// Alphanumeric identifiers drawn from the thread-local CSPRNG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    /// Creates a generator producing identifiers of `length` characters
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Returns the configured identifier length
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate_id(&self) -> Result<String, GeneratorError> {
        if self.length == 0 {
            return Err("identifier length must be greater than zero".into());
        }

        Ok(rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_are_alphanumeric_with_configured_length() {
        let generator = RandomIdGenerator::new(12);
        let id = generator.generate_id().unwrap();

        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_default_length() {
        let id = RandomIdGenerator::default().generate_id().unwrap();
        assert_eq!(id.len(), DEFAULT_ID_LENGTH);
    }

    #[test]
    fn test_zero_length_is_rejected() {
        let err = RandomIdGenerator::new(0).generate_id().unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_random_ids_rarely_repeat() {
        let generator = RandomIdGenerator::default();
        let ids: HashSet<String> = (0..1000)
            .map(|_| generator.generate_id().unwrap())
            .collect();

        // 62^8 possible ids; a repeat among 1000 draws is practically impossible
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_closure_is_a_generator() {
        let failing = || -> Result<String, GeneratorError> { Err("no entropy".into()) };
        assert_eq!(failing.generate_id().unwrap_err().to_string(), "no entropy");
    }
}
