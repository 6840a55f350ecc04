use chrono::Utc;
use finance_core::core::services::{
    movement_service::{SPLIT_AHORRO, SPLIT_INVERSION, SPLIT_PERSONALES},
    MovementService,
};
use finance_core::ledger::{round_cents, LedgerState, MovementKind, SplitTarget};

fn zeroed_state() -> LedgerState {
    LedgerState {
        ahorro: 0.0,
        personales: 0.0,
        inversion: 0.0,
        auto_split: true,
        history: Vec::new(),
    }
}

fn state_100() -> LedgerState {
    LedgerState {
        ahorro: 100.0,
        personales: 100.0,
        inversion: 100.0,
        auto_split: true,
        history: Vec::new(),
    }
}

#[test]
fn income_200_auto_splits_into_the_three_legs() {
    let mut state = state_100();
    MovementService::register(
        &mut state,
        "200",
        MovementKind::Income,
        SplitTarget::Auto,
        Utc::now(),
    )
    .unwrap();
    assert_eq!(state.ahorro, 120.0);
    assert_eq!(state.personales, 150.0);
    assert_eq!(state.inversion, 230.0);
}

#[test]
fn expense_50_ahorro_debits_only_that_bucket() {
    let mut state = state_100();
    state.ahorro = 120.0;
    MovementService::register(
        &mut state,
        "50",
        MovementKind::Expense,
        SplitTarget::Ahorro,
        Utc::now(),
    )
    .unwrap();
    assert_eq!(state.ahorro, 70.0);
    assert_eq!(state.personales, 100.0);
    assert_eq!(state.inversion, 100.0);
}

#[test]
fn auto_legs_follow_the_fixed_percentages() {
    for raw in ["0.01", "0.06", "1.11", "123.45", "987.65", "200"] {
        let mut state = zeroed_state();
        let movement = MovementService::register(
            &mut state,
            raw,
            MovementKind::Income,
            SplitTarget::Auto,
            Utc::now(),
        )
        .unwrap();
        let v = movement.value;
        assert_eq!(state.ahorro, round_cents(v * SPLIT_AHORRO), "ahorro leg for {raw}");
        assert_eq!(
            state.personales,
            round_cents(v * SPLIT_PERSONALES),
            "personales leg for {raw}"
        );
        assert_eq!(
            state.inversion,
            round_cents(v * SPLIT_INVERSION),
            "inversion leg for {raw}"
        );
    }
}

#[test]
fn every_bucket_stays_rounded_to_cents() {
    let mut state = zeroed_state();
    let samples = [
        ("19.99", SplitTarget::Auto),
        ("3.33", SplitTarget::Ahorro),
        ("0.07", SplitTarget::Auto),
        ("1234.56", SplitTarget::Inversion),
        ("-12.34", SplitTarget::Personales),
    ];
    for (raw, target) in samples {
        MovementService::register(&mut state, raw, MovementKind::Income, target, Utc::now())
            .unwrap();
        for bucket in [state.ahorro, state.personales, state.inversion] {
            assert_eq!(round_cents(bucket), bucket, "bucket drifted after {raw}");
        }
    }
}

#[test]
fn targeted_income_changes_exactly_one_bucket() {
    let mut state = state_100();
    MovementService::register(
        &mut state,
        "42",
        MovementKind::Income,
        SplitTarget::Personales,
        Utc::now(),
    )
    .unwrap();
    assert_eq!(state.ahorro, 100.0);
    assert_eq!(state.personales, 142.0);
    assert_eq!(state.inversion, 100.0);
}

#[test]
fn auto_income_changes_all_three_buckets() {
    let mut state = state_100();
    MovementService::register(
        &mut state,
        "100",
        MovementKind::Income,
        SplitTarget::Auto,
        Utc::now(),
    )
    .unwrap();
    assert_ne!(state.ahorro, 100.0);
    assert_ne!(state.personales, 100.0);
    assert_ne!(state.inversion, 100.0);
}

#[test]
fn rejected_amounts_leave_the_state_unchanged() {
    let mut state = state_100();
    let before = state.clone();
    for raw in ["abc", "0", "", "..", "--"] {
        assert!(MovementService::register(
            &mut state,
            raw,
            MovementKind::Income,
            SplitTarget::Auto,
            Utc::now(),
        )
        .is_err());
    }
    assert_eq!(state, before);
}

#[test]
fn history_is_capped_and_ordered_after_201_movements() {
    let mut state = zeroed_state();
    for i in 1..=201 {
        MovementService::register(
            &mut state,
            &i.to_string(),
            MovementKind::Income,
            SplitTarget::Ahorro,
            Utc::now(),
        )
        .unwrap();
    }
    assert_eq!(state.history.len(), 200);
    let values: Vec<f64> = state.history.iter().map(|m| m.value).collect();
    assert_eq!(values[0], 201.0);
    assert_eq!(values[199], 2.0);
    assert!(values.windows(2).all(|w| w[0] > w[1]));
}
