//! CHSH runs against the local statevector simulator.

use std::f64::consts::SQRT_2;

use qbell_adapter_sim::SimulatorBackend;
use qbell_chsh::{
    BasisSetting, ChshAngles, ChshConfig, ChshError, ChshExperiment, OutcomeDistribution,
    TSIRELSON_BOUND, analyze, create_chsh_inequality_circuits, get_chsh_results,
    run_chsh_inequality,
};
use qbell_hal::{Backend, BackendConfig, BackendFactory, HalError};
use serde_json::json;
use qbell_ir::QubitId;

#[tokio::test]
async fn test_exact_run_matches_prediction() {
    let backend = SimulatorBackend::new();
    let angles = ChshAngles::default();

    let circuits = create_chsh_inequality_circuits(QubitId(0), QubitId(1), &angles).unwrap();
    assert_eq!(circuits.len(), 4);

    let tasks = run_chsh_inequality(&circuits, &backend, 0).await.unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[1].setting(), Some(BasisSetting::ABPrime));

    let results = get_chsh_results(&tasks, false).await.unwrap();

    for (setting, predicted) in BasisSetting::ALL.into_iter().zip(angles.predicted_expectations()) {
        let measured = results.expectation(setting);
        assert!(
            (measured - predicted).abs() < 0.01,
            "{setting}: measured {measured}, predicted {predicted}"
        );
    }
    assert!((results.e_ab() - SQRT_2 / 2.0).abs() < 0.01);
    assert!((results.e_ab_prime() + SQRT_2 / 2.0).abs() < 0.01);
    assert!((results.chsh_value - TSIRELSON_BOUND).abs() < 0.01);
    assert!(results.is_violated(0.0));
}

#[tokio::test]
async fn test_exact_run_on_distant_qubits() {
    let backend = SimulatorBackend::new();
    let circuits =
        create_chsh_inequality_circuits(QubitId(3), QubitId(1), &ChshAngles::default()).unwrap();

    let tasks = run_chsh_inequality(&circuits, &backend, 0).await.unwrap();
    let results = get_chsh_results(&tasks, false).await.unwrap();

    assert!((results.chsh_value - TSIRELSON_BOUND).abs() < 1e-9);
}

#[tokio::test]
async fn test_sampled_run_still_violates() {
    let backend = SimulatorBackend::with_seed(2024);
    let circuits =
        create_chsh_inequality_circuits(QubitId(0), QubitId(1), &ChshAngles::default()).unwrap();

    let tasks = run_chsh_inequality(&circuits, &backend, 4000).await.unwrap();
    let results = get_chsh_results(&tasks, false).await.unwrap();

    for dist in &results.distributions {
        assert!((dist.total() - 1.0).abs() < 1e-9);
    }
    assert!(results.chsh_value > 2.5, "S = {}", results.chsh_value);
    assert!(results.is_violated(0.0));
}

#[tokio::test]
async fn test_wrong_task_count() {
    let backend = SimulatorBackend::new();
    let circuits =
        create_chsh_inequality_circuits(QubitId(0), QubitId(1), &ChshAngles::default()).unwrap();

    let tasks = run_chsh_inequality(&circuits[..3], &backend, 0).await.unwrap();
    let err = get_chsh_results(&tasks, false).await.unwrap_err();

    assert!(matches!(err, ChshError::TaskCount { expected: 4, got: 3 }));
}

#[tokio::test]
async fn test_oversized_circuit_rejected_before_submit() {
    let backend = SimulatorBackend::with_max_qubits(2);
    let circuits =
        create_chsh_inequality_circuits(QubitId(0), QubitId(4), &ChshAngles::default()).unwrap();

    let err = run_chsh_inequality(&circuits, &backend, 0).await.unwrap_err();
    assert!(matches!(err, HalError::InvalidCircuit(_)));
}

#[tokio::test]
async fn test_wide_pair_rejected_by_capped_simulator() {
    let config = BackendConfig::new("simulator").with_extra("max_qubits", json!(100));
    assert!(matches!(
        SimulatorBackend::from_config(config),
        Err(HalError::Configuration(_))
    ));

    let backend = SimulatorBackend::with_max_qubits(100);
    let circuits =
        create_chsh_inequality_circuits(QubitId(0), QubitId(70), &ChshAngles::default()).unwrap();

    let err = run_chsh_inequality(&circuits, &backend, 0).await.unwrap_err();
    assert!(matches!(err, HalError::InvalidCircuit(_)));
}

#[tokio::test]
async fn test_results_are_idempotent() {
    let backend = SimulatorBackend::new();
    let circuits =
        create_chsh_inequality_circuits(QubitId(0), QubitId(1), &ChshAngles::default()).unwrap();
    let tasks = run_chsh_inequality(&circuits, &backend, 0).await.unwrap();

    let first = get_chsh_results(&tasks, false).await.unwrap();
    let second = get_chsh_results(&tasks, false).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(analyze(&first.distributions).unwrap(), first);
}

#[test]
fn test_all_zero_outcomes_do_not_violate() {
    let d = OutcomeDistribution::new([1.0, 0.0, 0.0, 0.0]).unwrap();
    let results = analyze(&[d; 4]).unwrap();

    assert_eq!(results.chsh_value, 2.0);
    assert!(!results.is_violated(0.0));
}

#[tokio::test]
async fn test_experiment_from_yaml() {
    let config = ChshConfig::from_yaml_str("shots: 0\nverbose: false\ntolerance: 0.5\n").unwrap();
    let backend = SimulatorBackend::new();

    let results = ChshExperiment::new(config.clone()).run(&backend).await.unwrap();
    assert!(results.is_violated(config.tolerance));
    assert_eq!(backend.name(), "simulator");
}

#[tokio::test]
async fn test_experiment_with_aligned_angles() {
    let config = ChshConfig {
        angles: ChshAngles {
            a: 0.3,
            a_prime: 0.3,
            b: 0.3,
            b_prime: 0.3,
        },
        shots: 0,
        verbose: false,
        ..ChshConfig::default()
    };

    let results = ChshExperiment::new(config).run(&SimulatorBackend::new()).await.unwrap();

    assert!((results.chsh_value - 2.0).abs() < 1e-9);
    assert!(!results.is_violated(1e-6));
}

#[tokio::test]
async fn test_experiment_rejects_invalid_config() {
    let config = ChshConfig {
        qubit0: 1,
        qubit1: 1,
        ..ChshConfig::default()
    };
    let err = ChshExperiment::new(config)
        .run(&SimulatorBackend::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ChshError::Config(_)));
}
