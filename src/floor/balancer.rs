//! Server suggestion
//!
//! A pure function from the on-duty servers, their loads and the rotation
//! mode to the server who should get the next table. Identical input always
//! yields the same answer.

use super::roster::RotationMode;

/// One server as seen by the balancer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub name: &'a str,

    /// Seated plus dirty tables assigned to the server
    pub load: usize,

    /// Sequence number of the server's last seating, `None` if never seated
    pub last_seated: Option<u64>,
}

/// Pick the next server, or `None` when nobody is on duty
pub fn suggest(candidates: &[Candidate<'_>], mode: RotationMode) -> Option<String> {
    let best = match mode {
        // `None < Some(_)`, so servers never seated come first
        RotationMode::RoundRobin => candidates
            .iter()
            .min_by(|a, b| (a.last_seated, a.load, a.name).cmp(&(b.last_seated, b.load, b.name))),
        RotationMode::LeastLoaded => candidates
            .iter()
            .min_by(|a, b| (a.load, a.name).cmp(&(b.load, b.name))),
    };

    best.map(|c| c.name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn candidate(name: &str, load: usize, last_seated: Option<u64>) -> Candidate<'_> {
        Candidate {
            name,
            load,
            last_seated,
        }
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(suggest(&[], RotationMode::LeastLoaded), None);
        assert_eq!(suggest(&[], RotationMode::RoundRobin), None);
    }

    #[test]
    fn test_least_loaded_picks_idle_server() {
        let servers = [candidate("A", 2, Some(1)), candidate("B", 0, Some(2))];
        assert_eq!(suggest(&servers, RotationMode::LeastLoaded).as_deref(), Some("B"));
    }

    #[test]
    fn test_least_loaded_ties_break_by_name() {
        let servers = [candidate("Zoe", 1, None), candidate("Ana", 1, Some(5))];
        assert_eq!(suggest(&servers, RotationMode::LeastLoaded).as_deref(), Some("Ana"));
    }

    #[test]
    fn test_round_robin_prefers_never_seated() {
        let servers = [candidate("Ana", 0, Some(3)), candidate("Ben", 4, None)];
        assert_eq!(suggest(&servers, RotationMode::RoundRobin).as_deref(), Some("Ben"));
    }

    #[test]
    fn test_round_robin_oldest_seating_first() {
        let servers = [
            candidate("Ana", 0, Some(7)),
            candidate("Ben", 3, Some(2)),
            candidate("Cy", 1, Some(5)),
        ];
        assert_eq!(suggest(&servers, RotationMode::RoundRobin).as_deref(), Some("Ben"));
    }

    #[test]
    fn test_round_robin_ties_break_by_load_then_name() {
        let servers = [
            candidate("Cy", 2, None),
            candidate("Ben", 1, None),
            candidate("Ana", 1, None),
        ];
        assert_eq!(suggest(&servers, RotationMode::RoundRobin).as_deref(), Some("Ana"));
    }

    fn arb_candidates() -> impl Strategy<Value = BTreeMap<String, (usize, Option<u64>)>> {
        prop::collection::btree_map("[A-Z][a-z]{0,5}", (0usize..10, prop::option::of(0u64..50)), 0..8)
    }

    proptest! {
        #[test]
        fn prop_suggest_is_deterministic(raw in arb_candidates(), round_robin in any::<bool>()) {
            let servers: Vec<Candidate> = raw.iter().map(|(n, (l, s))| candidate(n, *l, *s)).collect();
            let mode = if round_robin { RotationMode::RoundRobin } else { RotationMode::LeastLoaded };

            let first = suggest(&servers, mode);
            for _ in 0..3 {
                prop_assert_eq!(&suggest(&servers, mode), &first);
            }
            prop_assert_eq!(first.is_none(), servers.is_empty());
        }

        #[test]
        fn prop_least_loaded_is_minimal(raw in arb_candidates()) {
            let servers: Vec<Candidate> = raw.iter().map(|(n, (l, s))| candidate(n, *l, *s)).collect();

            if let Some(name) = suggest(&servers, RotationMode::LeastLoaded) {
                let chosen = servers.iter().find(|c| c.name == name).map(|c| c.load).unwrap();
                prop_assert!(servers.iter().all(|c| chosen <= c.load));
            }
        }
    }
}
