//! Per-email activity accumulation over one log snapshot.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::Observation;

/// Last-seen timestamps per email and address, rebuilt from a full scan of
/// the current source log snapshot
///
/// The snapshot is cycle-scoped: it is rebuilt from scratch every poll so
/// it always reflects the current on-disk log, however much was appended
/// between polls.
#[derive(Debug, Default)]
pub struct ActivitySnapshot {
    entries: HashMap<String, HashMap<String, NaiveDateTime>>,
    reference_time: Option<NaiveDateTime>,
}

impl ActivitySnapshot {
    /// Accumulate observations from one scan
    ///
    /// Each (email, address) pair keeps the maximum timestamp seen for it;
    /// the merge is commutative, so input ordering does not affect the
    /// result.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut snapshot = Self::default();
        for observation in observations {
            snapshot.record(observation);
        }
        snapshot
    }

    fn record(&mut self, observation: Observation) {
        let Observation {
            email,
            address,
            timestamp,
        } = observation;

        let slot = self
            .entries
            .entry(email)
            .or_default()
            .entry(address)
            .or_insert(timestamp);
        if timestamp > *slot {
            *slot = timestamp;
        }

        if self.reference_time.is_none_or(|current| timestamp > current) {
            self.reference_time = Some(timestamp);
        }
    }

    /// The newest timestamp across all observations in this scan, if any
    ///
    /// `None` means the scan produced no observations: no evaluation and
    /// no retention decision follow from it.
    pub fn reference_time(&self) -> Option<NaiveDateTime> {
        self.reference_time
    }

    /// Iterate over per-email address maps
    pub fn identities(&self) -> impl Iterator<Item = (&String, &HashMap<String, NaiveDateTime>)> {
        self.entries.iter()
    }

    /// Last-seen map for one email, if it was observed this scan
    pub fn addresses_for(&self, email: &str) -> Option<&HashMap<String, NaiveDateTime>> {
        self.entries.get(email)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, second)
            .unwrap()
    }

    fn obs(email: &str, address: &str, second: u32) -> Observation {
        Observation {
            email: email.to_string(),
            address: address.to_string(),
            timestamp: ts(second),
        }
    }

    #[test]
    fn test_empty_scan_has_no_reference_time() {
        let snapshot = ActivitySnapshot::from_observations([]);
        assert!(snapshot.reference_time().is_none());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_max_merge_keeps_latest_per_pair() {
        let snapshot = ActivitySnapshot::from_observations([
            obs("a@x.com", "203.0.113.7", 30),
            obs("a@x.com", "203.0.113.7", 10),
            obs("a@x.com", "203.0.113.7", 20),
        ]);

        let addresses = snapshot.addresses_for("a@x.com").unwrap();
        assert_eq!(addresses["203.0.113.7"], ts(30));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let forward = ActivitySnapshot::from_observations([
            obs("a@x.com", "203.0.113.7", 10),
            obs("a@x.com", "198.51.100.2", 40),
            obs("b@y.com", "203.0.113.7", 25),
        ]);
        let reversed = ActivitySnapshot::from_observations([
            obs("b@y.com", "203.0.113.7", 25),
            obs("a@x.com", "198.51.100.2", 40),
            obs("a@x.com", "203.0.113.7", 10),
        ]);

        assert_eq!(forward.reference_time(), reversed.reference_time());
        assert_eq!(
            forward.addresses_for("a@x.com"),
            reversed.addresses_for("a@x.com")
        );
        assert_eq!(
            forward.addresses_for("b@y.com"),
            reversed.addresses_for("b@y.com")
        );
    }

    #[test]
    fn test_reference_time_is_global_max() {
        let snapshot = ActivitySnapshot::from_observations([
            obs("a@x.com", "203.0.113.7", 10),
            obs("b@y.com", "198.51.100.2", 55),
            obs("a@x.com", "192.0.2.9", 40),
        ]);
        assert_eq!(snapshot.reference_time(), Some(ts(55)));
    }
}
