//! Tests for filter identifier assignment.

use std::collections::HashSet;
use std::thread;

use crate::config::FilterEntry;

use super::{FilterIdAllocator, IdsExhausted, USER_FILTER_ID, is_assignable, user_filter};

fn entry(id: i64, url: &str) -> FilterEntry {
    FilterEntry::new(id, url, "", true)
}

mod allocation {
    use super::*;

    #[test]
    fn next_is_strictly_increasing() {
        let ids = FilterIdAllocator::starting_at(10);
        let values: Vec<i64> = (0..100).map(|_| ids.next().unwrap()).collect();

        assert_eq!(values[0], 10);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn never_returns_reserved_id() {
        for first in [-5, 0, 1] {
            let ids = FilterIdAllocator::starting_at(first);
            assert!(ids.next().unwrap() > USER_FILTER_ID);
        }
    }

    #[test]
    fn clock_seed_is_positive() {
        let ids = FilterIdAllocator::from_clock();
        assert!(ids.peek() > 1_600_000_000);
    }

    #[test]
    fn peek_does_not_consume() {
        let ids = FilterIdAllocator::starting_at(5);
        assert_eq!(ids.peek(), 5);
        assert_eq!(ids.peek(), 5);
        assert_eq!(ids.next(), Ok(5));
        assert_eq!(ids.peek(), 6);
    }

    #[test]
    fn counter_stops_at_max_instead_of_wrapping() {
        let ids = FilterIdAllocator::starting_at(i64::MAX - 1);

        assert_eq!(ids.next(), Ok(i64::MAX - 1));
        assert_eq!(ids.next(), Err(IdsExhausted));
        assert_eq!(ids.next(), Err(IdsExhausted));
        assert_eq!(ids.peek(), i64::MAX);
    }

    #[test]
    fn assignable_range_excludes_reserved_negative_and_max() {
        assert!(!is_assignable(i64::MIN));
        assert!(!is_assignable(-7));
        assert!(!is_assignable(USER_FILTER_ID));
        assert!(is_assignable(1));
        assert!(is_assignable(i64::MAX - 1));
        assert!(!is_assignable(i64::MAX));
    }

    #[test]
    fn concurrent_callers_get_distinct_ids() {
        let ids = FilterIdAllocator::starting_at(1);
        let per_thread = 500;

        let results: Vec<Vec<i64>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (0..per_thread).map(|_| ids.next().unwrap()).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut all = HashSet::new();
        for values in &results {
            assert!(values.windows(2).all(|w| w[0] < w[1]));
            for &v in values {
                assert!(v > 0);
                assert!(all.insert(v), "duplicate id {v}");
            }
        }
        assert_eq!(all.len(), 8 * per_thread);
    }
}

mod seeding {
    use super::*;

    #[test]
    fn next_exceeds_every_seeded_id() {
        let ids = FilterIdAllocator::starting_at(1);
        let filters = vec![entry(3, "a"), entry(900, "b"), entry(17, "c")];

        ids.seed(&filters);

        let next = ids.next().unwrap();
        assert!(filters.iter().all(|f| next > f.id));
        assert_eq!(next, 901);
    }

    #[test]
    fn seed_equal_to_counter_advances() {
        let ids = FilterIdAllocator::starting_at(10);
        ids.seed(&[entry(10, "a")]);
        assert_eq!(ids.next(), Ok(11));
    }

    #[test]
    fn seed_never_decreases() {
        let ids = FilterIdAllocator::starting_at(1000);
        ids.seed(&[entry(5, "a"), entry(999, "b")]);
        assert_eq!(ids.peek(), 1000);
    }

    #[test]
    fn seed_skips_ids_that_cannot_be_advanced_past() {
        let ids = FilterIdAllocator::starting_at(100);
        ids.seed(&[entry(i64::MAX, "a"), entry(-7, "b")]);

        assert_eq!(ids.peek(), 100);
        assert_eq!(ids.next(), Ok(100));
    }

    #[test]
    fn seed_is_idempotent() {
        let ids = FilterIdAllocator::starting_at(1);
        let filters = vec![entry(41, "a")];

        ids.seed(&filters);
        ids.seed(&filters);

        assert_eq!(ids.peek(), 42);
    }
}

mod conflicts {
    use super::*;

    #[test]
    fn reserved_and_repeated_ids_are_replaced() {
        let ids = FilterIdAllocator::starting_at(1);
        let mut filters = vec![entry(0, "a"), entry(7, "b"), entry(7, "c"), entry(9, "d")];
        ids.seed(&filters);

        let changed = ids.reassign_conflicts(&mut filters).unwrap();

        assert_eq!(changed, 2);
        assert_eq!(filters[1].id, 7);
        assert_eq!(filters[3].id, 9);
        let unique: HashSet<i64> = filters.iter().map(|f| f.id).collect();
        assert_eq!(unique.len(), 4);
        assert!(filters.iter().all(|f| f.id > 0));
    }

    #[test]
    fn negative_and_max_ids_are_replaced() {
        let ids = FilterIdAllocator::starting_at(1);
        let mut filters = vec![entry(-7, "a"), entry(i64::MAX, "b"), entry(3, "c")];
        ids.seed(&filters);

        let changed = ids.reassign_conflicts(&mut filters).unwrap();

        assert_eq!(changed, 2);
        assert_eq!(filters[0].id, 4);
        assert_eq!(filters[1].id, 5);
        assert_eq!(filters[2].id, 3);
        assert_eq!(ids.next(), Ok(6));
    }

    #[test]
    fn exhausted_counter_fails_repair() {
        let ids = FilterIdAllocator::starting_at(i64::MAX);
        let mut filters = vec![entry(0, "a")];

        assert_eq!(ids.reassign_conflicts(&mut filters), Err(IdsExhausted));
    }

    #[test]
    fn clean_list_is_untouched() {
        let ids = FilterIdAllocator::starting_at(100);
        let mut filters = vec![entry(1, "a"), entry(2, "b")];

        assert_eq!(ids.reassign_conflicts(&mut filters), Ok(0));
        assert_eq!(ids.peek(), 100);
    }
}

mod user_rules_filter {
    use super::*;

    #[test]
    fn rules_are_newline_terminated() {
        let rules = vec!["||a.example^".to_string(), "@@||b.example^".to_string()];
        let filter = user_filter(&rules);

        assert_eq!(filter.id, USER_FILTER_ID);
        assert!(filter.enabled);
        assert_eq!(filter.rules_count, 2);
        assert_eq!(
            filter.contents.as_deref(),
            Some(b"||a.example^\n@@||b.example^\n".as_slice())
        );
        assert!(filter.is_active());
    }

    #[test]
    fn no_rules_yields_inert_filter() {
        let filter = user_filter(&[]);

        assert!(filter.enabled);
        assert_eq!(filter.contents.as_deref(), Some(&b""[..]));
        assert!(!filter.is_active());
    }
}
