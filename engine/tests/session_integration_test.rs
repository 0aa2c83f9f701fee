//! End-to-end tests driving an assessment session through every stage

use edge_engine::clock::ManualClock;
use edge_engine::responses::{ScenarioOutcome, TradeoffOutcome};
use edge_engine::scoring::ScoreEngine;
use edge_engine::session::{AssessmentSession, StageView};
use sdk::catalog::Catalog;
use sdk::errors::{EdgeErrorExt, EngineError};
use sdk::types::{Category, Choice, Stage};

fn session_with_clock() -> (AssessmentSession, ManualClock) {
    let clock = ManualClock::new();
    let session =
        AssessmentSession::with_clock(Catalog::builtin(), Box::new(clock.clone())).unwrap();
    (session, clock)
}

fn allocate(session: &mut AssessmentSession, pairs: &[(Category, i64)]) {
    for (category, value) in pairs {
        assert!(session.set_category(*category, *value).unwrap());
    }
}

#[test]
fn test_full_assessment_speed_and_customer() {
    let (mut session, clock) = session_with_clock();

    assert_eq!(session.advance().unwrap(), Stage::Allocate);
    allocate(
        &mut session,
        &[(Category::Speed, 50), (Category::Customer, 50)],
    );
    assert_eq!(session.advance().unwrap(), Stage::Collide);

    for i in 0..3 {
        clock.advance(1_000 + i as u64 * 500);
        session.record_scenario_answer(i, 1).unwrap();
    }
    assert_eq!(session.stage(), Stage::Tradeoff);

    for j in 0..10 {
        clock.advance(700);
        let choice = if j % 2 == 0 { Choice::A } else { Choice::B };
        session.record_tradeoff_answer(j, choice).unwrap();
    }
    assert_eq!(session.stage(), Stage::Results);

    let results = session.results().unwrap();
    assert!((results.vector_map.creativity - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(results.vector_map.community, 0.0);
    assert_eq!(results.vector_map.discipline, 0.0);
    assert_eq!(results.vector_map.advantage, 50.0);
    assert!((results.dimensions.cultural_alignment - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(results.dimensions.leadership_succession, 0.0);
    assert_eq!(results.outlier_probability, 5.0);

    let patterns = &results.response_patterns;
    assert_eq!(patterns.revisions, 0);
    assert_eq!(patterns.response_time.len(), 13);
    assert_eq!(patterns.response_time.get("scenario_0"), Some(1_000));
    assert_eq!(patterns.response_time.get("scenario_2"), Some(2_000));
    assert_eq!(patterns.response_time.get("tradeoff_9"), Some(700));

    assert!(matches!(session.view(), StageView::Results { .. }));
}

#[test]
fn test_results_match_pure_scoring() {
    let (mut session, _clock) = session_with_clock();
    session.advance().unwrap();
    allocate(
        &mut session,
        &[
            (Category::Bench, 30),
            (Category::Clarity, 30),
            (Category::Comp, 20),
            (Category::Change, 20),
        ],
    );
    session.advance().unwrap();
    for i in 0..3 {
        session.record_scenario_answer(i, 0).unwrap();
    }
    for j in 0..10 {
        session.record_tradeoff_answer(j, Choice::A).unwrap();
    }

    let responses = session.responses();
    let expected = ScoreEngine::new().compute(
        &session.allocation().snapshot(),
        responses.scenario_answers(),
        responses.tradeoff_answers(),
        responses.timing(),
        responses.revisions(),
    );
    assert_eq!(session.results(), Some(&expected));
    assert!((expected.outlier_probability - (1735.0 / 3.0) / 35.0).abs() < 1e-9);
}

#[test]
fn test_revision_flow() {
    let (mut session, clock) = session_with_clock();
    session.advance().unwrap();
    allocate(&mut session, &[(Category::Quality, 100)]);
    session.advance().unwrap();

    clock.advance(400);
    assert!(matches!(
        session.record_scenario_answer(0, 3).unwrap(),
        ScenarioOutcome::Advanced { next: 1 }
    ));

    clock.advance(250);
    assert_eq!(
        session.record_scenario_answer(0, 1).unwrap(),
        ScenarioOutcome::Revised
    );
    assert_eq!(session.responses().scenario_answers()[0], Some(1));
    assert_eq!(session.responses().scenario_pointer(), 1);
    assert_eq!(session.responses().timing().get("scenario_0"), Some(250));

    // Only the immediately preceding scenario stays open
    session.record_scenario_answer(1, 2).unwrap();
    let err = session.record_scenario_answer(0, 0).unwrap_err();
    assert!(matches!(err, EngineError::ScenarioIndex { index: 0, .. }));
    assert!(!err.is_recoverable());

    session.record_scenario_answer(2, 0).unwrap();
    assert_eq!(session.stage(), Stage::Tradeoff);
    assert!(session.record_scenario_answer(2, 1).is_err());
    assert_eq!(session.responses().revisions(), 1);
}

#[test]
fn test_stage_guards_leave_state_untouched() {
    let (mut session, _clock) = session_with_clock();

    assert!(matches!(
        session.set_category(Category::Speed, 10),
        Err(EngineError::StageMismatch {
            expected: Stage::Allocate,
            actual: Stage::Prime
        })
    ));
    assert!(session.record_tradeoff_answer(0, Choice::A).is_err());
    assert_eq!(session.stage(), Stage::Prime);

    session.advance().unwrap();
    allocate(&mut session, &[(Category::Rituals, 99)]);
    assert!(matches!(
        session.advance(),
        Err(EngineError::BudgetNotSpent { remaining: 1 })
    ));
    assert_eq!(session.stage(), Stage::Allocate);

    allocate(&mut session, &[(Category::Rituals, 100)]);
    session.advance().unwrap();
    assert!(matches!(
        session.advance(),
        Err(EngineError::NoManualAdvance(Stage::Collide))
    ));
    assert!(matches!(
        session.record_scenario_answer(0, 4),
        Err(EngineError::OptionOutOfRange { option: 4, count: 4, .. })
    ));
    assert_eq!(session.responses().scenario_pointer(), 0);
}

#[test]
fn test_tradeoff_order_enforced() {
    let (mut session, _clock) = session_with_clock();
    session.advance().unwrap();
    allocate(&mut session, &[(Category::Speed, 100)]);
    session.advance().unwrap();
    for i in 0..3 {
        session.record_scenario_answer(i, 0).unwrap();
    }

    assert!(matches!(
        session.record_tradeoff_answer(1, Choice::A),
        Err(EngineError::TradeoffIndex { index: 1, current: 0 })
    ));
    assert!(matches!(
        session.record_tradeoff_answer(0, Choice::B).unwrap(),
        TradeoffOutcome::Advanced { next: 1 }
    ));
    assert!(session.record_tradeoff_answer(0, Choice::A).is_err());
    assert_eq!(session.responses().tradeoff_answers()[0], Some(Choice::B));
}

#[test]
fn test_results_frozen_after_completion() {
    let (mut session, _clock) = session_with_clock();
    session.advance().unwrap();
    allocate(&mut session, &[(Category::Change, 100)]);
    session.advance().unwrap();
    for i in 0..3 {
        session.record_scenario_answer(i, 2).unwrap();
    }
    for j in 0..10 {
        session.record_tradeoff_answer(j, Choice::B).unwrap();
    }
    let before = session.results().cloned();

    assert!(session.advance().is_err());
    assert!(session.set_category(Category::Speed, 0).is_err());
    assert!(session.record_scenario_answer(0, 0).is_err());
    assert!(session.record_tradeoff_answer(9, Choice::A).is_err());

    assert_eq!(session.stage(), Stage::Results);
    assert_eq!(session.results().cloned(), before);
}

#[test]
fn test_sessions_have_distinct_ids() {
    let a = AssessmentSession::new(Catalog::builtin()).unwrap();
    let b = AssessmentSession::new(Catalog::builtin()).unwrap();
    assert_ne!(a.id(), b.id());
}
