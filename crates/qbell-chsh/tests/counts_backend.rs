//! Aggregation from shot counts, using a backend that reports no
//! probability values.

use std::sync::Mutex;

use async_trait::async_trait;
use qbell_chsh::{
    ChshAngles, ChshError, create_chsh_inequality_circuits, get_chsh_results, run_chsh_inequality,
};
use qbell_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus,
};
use qbell_ir::{Circuit, QubitId};

/// Replays canned counts, one entry per submitted circuit.
struct ReplayBackend {
    capabilities: Capabilities,
    canned: Vec<Counts>,
    submitted: Mutex<usize>,
}

impl ReplayBackend {
    fn new(canned: Vec<Counts>) -> Self {
        Self {
            capabilities: Capabilities::simulator(4),
            canned,
            submitted: Mutex::new(0),
        }
    }

    fn index(job_id: &JobId) -> HalResult<usize> {
        job_id
            .as_str()
            .parse()
            .map_err(|_| HalError::JobNotFound(job_id.0.clone()))
    }
}

#[async_trait]
impl Backend for ReplayBackend {
    fn name(&self) -> &str {
        "replay"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        let mut n = self.submitted.lock().unwrap();
        let id = JobId::new(n.to_string());
        *n += 1;
        Ok(id)
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        Ok(JobStatus::Completed)
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let counts = self.canned[Self::index(job_id)?].clone();
        let shots = counts.total_shots() as u32;
        Ok(ExecutionResult::new(counts, shots))
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

fn chsh_circuits() -> Vec<Circuit> {
    create_chsh_inequality_circuits(QubitId(0), QubitId(1), &ChshAngles::default()).unwrap()
}

#[tokio::test]
async fn test_all_zero_counts_reach_but_do_not_exceed_bound() {
    let backend = ReplayBackend::new(vec![Counts::from_pairs([("00", 1000u64)]); 4]);
    let circuits = chsh_circuits();

    let tasks = run_chsh_inequality(&circuits, &backend, 1000).await.unwrap();
    let results = get_chsh_results(&tasks, true).await.unwrap();

    assert_eq!(results.expectations, [1.0; 4]);
    assert_eq!(results.chsh_value, 2.0);
    assert!(!results.is_violated(0.0));
}

#[tokio::test]
async fn test_counts_are_normalised_by_shot_total() {
    let correlated = Counts::from_pairs([("00", 427u64), ("11", 426), ("01", 74), ("10", 73)]);
    let anti = Counts::from_pairs([("00", 74u64), ("11", 73), ("01", 427), ("10", 426)]);
    let backend = ReplayBackend::new(vec![
        correlated.clone(),
        anti,
        correlated.clone(),
        correlated,
    ]);
    let circuits = chsh_circuits();

    let tasks = run_chsh_inequality(&circuits, &backend, 1000).await.unwrap();
    let results = get_chsh_results(&tasks, false).await.unwrap();

    assert!((results.e_ab() - 0.706).abs() < 1e-12);
    assert!((results.e_ab_prime() + 0.706).abs() < 1e-12);
    assert!((results.chsh_value - 4.0 * 0.706).abs() < 1e-12);
    assert!(results.is_violated(0.0));
    assert_eq!(results.distributions[0].total(), 1000.0);
}

#[tokio::test]
async fn test_empty_counts_are_rejected() {
    let full = Counts::from_pairs([("00", 10u64)]);
    let backend = ReplayBackend::new(vec![full.clone(), full.clone(), Counts::new(), full]);
    let circuits = chsh_circuits();

    let tasks = run_chsh_inequality(&circuits, &backend, 10).await.unwrap();
    let err = get_chsh_results(&tasks, false).await.unwrap_err();

    assert!(matches!(err, ChshError::EmptyDistribution { .. }));
}
