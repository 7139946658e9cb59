/// Wall-clock time source in epoch seconds
pub trait Clock: Send + Sync {
    /// Returns the current time as seconds since the Unix epoch
    fn now(&self) -> i64;
}

/// [`Clock`] backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    /// Clock that only moves when told to
    #[derive(Debug, Clone)]
    pub(crate) struct ManualClock(Arc<AtomicI64>);

    impl ManualClock {
        pub(crate) fn new(start: i64) -> Self {
            Self(Arc::new(AtomicI64::new(start)))
        }

        pub(crate) fn set(&self, now: i64) {
            self.0.store(now, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn test_manual_clock_moves_only_when_set() {
        let clock = testing::ManualClock::new(1_000);
        assert_eq!(clock.now(), 1_000);

        let shared = clock.clone();
        shared.set(1_061);
        assert_eq!(clock.now(), 1_061);
    }
}
