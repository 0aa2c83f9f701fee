use edge_engine::allocation::{AllocationTracker, TOTAL_BUDGET};
use edge_engine::clock::ManualClock;
use edge_engine::responses::TimingLog;
use edge_engine::scoring::{ScoreEngine, OUTLIER_CEILING, OUTLIER_FLOOR};
use edge_engine::session::AssessmentSession;
use proptest::prelude::*;
use sdk::catalog::Catalog;
use sdk::types::{Category, Choice, Stage};

fn category() -> impl Strategy<Value = Category> {
    (0..Category::ALL.len()).prop_map(|i| Category::ALL[i])
}

fn edits() -> impl Strategy<Value = Vec<(Category, i64)>> {
    proptest::collection::vec((category(), -20i64..140), 0..40)
}

proptest! {
    #[test]
    fn test_budget_is_conserved(steps in edits()) {
        let mut tracker = AllocationTracker::new();
        for (category, value) in steps {
            tracker.set_category(category, value);
            prop_assert_eq!(tracker.allocated() + tracker.remaining(), TOTAL_BUDGET);
            prop_assert!(tracker.remaining() <= TOTAL_BUDGET);
        }
    }

    #[test]
    fn test_rejected_change_is_a_no_op(
        steps in edits(),
        category in category(),
        value in prop_oneof![-1000i64..0, 101i64..1000],
    ) {
        let mut tracker = AllocationTracker::new();
        for (c, v) in steps {
            tracker.set_category(c, v);
        }
        let before = tracker.clone();

        prop_assert!(!tracker.set_category(category, value));
        prop_assert_eq!(tracker, before);
    }

    #[test]
    fn test_accepts_exactly_up_to_max(steps in edits(), category in category(), value in 0i64..=100) {
        let mut tracker = AllocationTracker::new();
        for (c, v) in steps {
            tracker.set_category(c, v);
        }
        let max = i64::from(tracker.max_for(category));

        prop_assert_eq!(tracker.set_category(category, value), value <= max);
    }

    #[test]
    fn test_advance_gated_on_spent_budget(steps in edits()) {
        let mut session = AssessmentSession::new(Catalog::builtin()).unwrap();
        session.advance().unwrap();
        for (category, value) in steps {
            session.set_category(category, value).unwrap();
        }
        let spent = session.allocation().remaining() == 0;

        prop_assert_eq!(session.advance().is_ok(), spent);
        let expected = if spent { Stage::Collide } else { Stage::Allocate };
        prop_assert_eq!(session.stage(), expected);
    }
}

proptest! {
    #[test]
    fn test_revisions_counted_and_timed(
        revise in proptest::collection::vec(any::<bool>(), 3),
        options in proptest::collection::vec(0usize..4, 6),
        gaps in proptest::collection::vec(1u64..5_000, 6),
    ) {
        let clock = ManualClock::new();
        let mut session =
            AssessmentSession::with_clock(Catalog::builtin(), Box::new(clock.clone())).unwrap();
        session.advance().unwrap();
        session.set_category(Category::Bench, 100).unwrap();
        session.advance().unwrap();

        let mut expected_revisions = 0;
        for i in 0..3 {
            clock.advance(gaps[i * 2]);
            session.record_scenario_answer(i, options[i * 2]).unwrap();
            // The last scenario closes the round, so it can never be revised
            if revise[i] && i < 2 {
                clock.advance(gaps[i * 2 + 1]);
                session.record_scenario_answer(i, options[i * 2 + 1]).unwrap();
                expected_revisions += 1;

                let key = format!("scenario_{}", i);
                prop_assert_eq!(session.responses().timing().get(&key), Some(gaps[i * 2 + 1]));
                prop_assert_eq!(session.responses().scenario_answers()[i], Some(options[i * 2 + 1]));
            }
        }

        prop_assert_eq!(session.stage(), Stage::Tradeoff);
        prop_assert_eq!(session.responses().revisions(), expected_revisions);
        prop_assert_eq!(session.responses().timing().len(), 3);
    }

    #[test]
    fn test_tradeoffs_fill_in_order(choices in proptest::collection::vec(any::<bool>(), 10)) {
        let mut session = AssessmentSession::new(Catalog::builtin()).unwrap();
        session.advance().unwrap();
        session.set_category(Category::Clarity, 100).unwrap();
        session.advance().unwrap();
        for i in 0..3 {
            session.record_scenario_answer(i, 0).unwrap();
        }

        for (j, pick_a) in choices.iter().enumerate() {
            prop_assert_eq!(session.responses().tradeoff_pointer(), j);
            let choice = if *pick_a { Choice::A } else { Choice::B };
            session.record_tradeoff_answer(j, choice).unwrap();
            prop_assert_eq!(session.responses().tradeoff_answers()[j], Some(choice));
        }

        prop_assert_eq!(session.stage(), Stage::Results);
        prop_assert!(session.results().is_some());
    }
}

proptest! {
    #[test]
    fn test_scores_bounded_and_deterministic(steps in edits(), revisions in 0u32..5) {
        let mut tracker = AllocationTracker::new();
        for (category, value) in steps {
            tracker.set_category(category, value);
        }
        let allocation = tracker.snapshot();
        let engine = ScoreEngine::new();
        let timing = TimingLog::new();

        let first = engine.compute(&allocation, &[Some(0)], &[Some(Choice::A)], &timing, revisions);
        let second = engine.compute(&allocation, &[Some(3)], &[Some(Choice::B)], &timing, revisions);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.outlier_probability >= OUTLIER_FLOOR);
        prop_assert!(first.outlier_probability <= OUTLIER_CEILING);
        for (_, score) in first.dimensions.iter() {
            prop_assert!((0.0..=100.0).contains(&score));
        }
        prop_assert_eq!(first.response_patterns.revisions, revisions);
    }
}
