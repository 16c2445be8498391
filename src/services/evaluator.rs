//! Concurrent-address evaluation against the quota.

use std::collections::HashMap;

use chrono::NaiveDateTime;

/// How long after its last observation an address still counts as holding
/// a live session, relative to the newest observation in the snapshot
pub const ACTIVE_WINDOW_SECONDS: i64 = 60;

/// Outcome of evaluating one email's activity against the quota
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Concurrently active addresses, sorted ascending
    pub active: Vec<String>,
    /// Active addresses over quota, in sorted order
    pub excess: Vec<String>,
}

impl Evaluation {
    pub fn is_violation(&self) -> bool {
        !self.excess.is_empty()
    }
}

/// Addresses whose last observation falls within the active window of the
/// reference time, sorted ascending by address value
///
/// Sorting by address keeps victim selection deterministic: with an
/// unchanged active set, the same `limit` addresses survive every cycle.
pub fn active_addresses(
    last_seen: &HashMap<String, NaiveDateTime>,
    reference_time: NaiveDateTime,
) -> Vec<String> {
    let mut active: Vec<String> = last_seen
        .iter()
        .filter(|(_, seen)| (reference_time - **seen).num_seconds() <= ACTIVE_WINDOW_SECONDS)
        .map(|(address, _)| address.clone())
        .collect();
    active.sort();
    active
}

/// Evaluate one email's last-seen map against the quota
///
/// The first `limit` active addresses in sorted order are allowed; every
/// remaining one is a candidate violation. With `limit == 0` every active
/// address is a candidate.
pub fn evaluate(
    last_seen: &HashMap<String, NaiveDateTime>,
    reference_time: NaiveDateTime,
    limit: usize,
) -> Evaluation {
    let active = active_addresses(last_seen, reference_time);
    let excess = if active.len() > limit {
        active[limit..].to_vec()
    } else {
        Vec::new()
    };
    Evaluation { active, excess }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, minute, second)
            .unwrap()
    }

    fn last_seen(entries: &[(&str, NaiveDateTime)]) -> HashMap<String, NaiveDateTime> {
        entries
            .iter()
            .map(|(address, seen)| (address.to_string(), *seen))
            .collect()
    }

    #[test]
    fn test_within_quota_yields_no_excess() {
        let map = last_seen(&[("203.0.113.7", ts(5, 0)), ("198.51.100.2", ts(5, 10))]);
        let evaluation = evaluate(&map, ts(5, 10), 2);
        assert_eq!(evaluation.active.len(), 2);
        assert!(!evaluation.is_violation());
    }

    #[test]
    fn test_excess_are_lexicographically_largest() {
        let map = last_seen(&[
            ("10.0.0.3", ts(5, 0)),
            ("10.0.0.1", ts(5, 5)),
            ("10.0.0.2", ts(5, 9)),
        ]);
        let evaluation = evaluate(&map, ts(5, 10), 1);

        assert_eq!(evaluation.active, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        // The smallest `limit` addresses always win, regardless of recency
        assert_eq!(evaluation.excess, vec!["10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn test_excess_count_is_active_minus_limit() {
        let map = last_seen(&[
            ("10.0.0.1", ts(5, 0)),
            ("10.0.0.2", ts(5, 1)),
            ("10.0.0.3", ts(5, 2)),
            ("10.0.0.4", ts(5, 3)),
        ]);
        let evaluation = evaluate(&map, ts(5, 10), 2);
        assert_eq!(evaluation.excess.len(), evaluation.active.len() - 2);
    }

    #[test]
    fn test_stale_addresses_are_excluded() {
        // C last seen 90s before the reference time: out of the window
        let map = last_seen(&[
            ("10.0.0.1", ts(5, 55)),
            ("10.0.0.2", ts(5, 58)),
            ("10.0.0.3", ts(4, 30)),
        ]);
        let evaluation = evaluate(&map, ts(6, 0), 1);

        assert_eq!(evaluation.active, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(evaluation.excess, vec!["10.0.0.2"]);
    }

    #[test]
    fn test_exactly_sixty_seconds_is_still_active() {
        let map = last_seen(&[("10.0.0.1", ts(5, 0))]);
        let evaluation = evaluate(&map, ts(6, 0), 1);
        assert_eq!(evaluation.active, vec!["10.0.0.1"]);
    }

    #[test]
    fn test_many_stale_addresses_never_violate() {
        // One live session plus a pile of stale addresses stays legal
        let map = last_seen(&[
            ("10.0.0.1", ts(5, 59)),
            ("10.0.0.2", ts(1, 0)),
            ("10.0.0.3", ts(2, 0)),
            ("10.0.0.4", ts(3, 0)),
        ]);
        let evaluation = evaluate(&map, ts(6, 0), 1);
        assert!(!evaluation.is_violation());
    }

    #[test]
    fn test_zero_limit_marks_all_active_as_excess() {
        let map = last_seen(&[("10.0.0.1", ts(5, 58)), ("10.0.0.2", ts(5, 59))]);
        let evaluation = evaluate(&map, ts(6, 0), 0);
        assert_eq!(evaluation.excess, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let map = last_seen(&[("10.0.0.1", ts(5, 58)), ("10.0.0.2", ts(5, 59))]);
        let first = evaluate(&map, ts(6, 0), 1);
        let second = evaluate(&map, ts(6, 0), 1);
        assert_eq!(first, second);
    }
}
