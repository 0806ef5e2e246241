//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};

use qbell_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ResultTypeValue,
};
use qbell_ir::Circuit;

use crate::statevector::{Statevector, marginalize};

const DEFAULT_MAX_QUBITS: u32 = 20;

/// Widest register the dense statevector can hold (16 GiB of amplitudes).
pub const MAX_SIMULABLE_QUBITS: u32 = 30;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Jobs run to completion inside [`Backend::submit`]. With `shots = 0` the
/// circuit's result types are filled from the exact statevector; otherwise
/// `shots` outcomes are sampled into [`Counts`] and the result types report
/// the empirical frequencies.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Submitted jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Sampling source, seeded for reproducible runs when requested.
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, None)
    }

    /// Create a simulator with custom max qubits, capped at
    /// [`MAX_SIMULABLE_QUBITS`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            max_qubits.min(MAX_SIMULABLE_QUBITS),
            None,
        )
    }

    /// Create a simulator whose sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(BackendConfig::new("simulator"), DEFAULT_MAX_QUBITS, Some(seed))
    }

    fn build(config: BackendConfig, max_qubits: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            capabilities: Capabilities {
                name: config.name.clone(),
                ..Capabilities::simulator(max_qubits)
            },
            config,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(rng),
        }
    }

    fn check_shots(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the simulator limit of {}",
                self.capabilities.max_shots
            )));
        }
        if shots == 0 && circuit.result_types().is_empty() {
            return Err(HalError::InvalidShots(format!(
                "circuit '{}' requests exact execution but declares no result types",
                circuit.name()
            )));
        }
        Ok(())
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();

        debug!(
            "Starting simulation: {} qubits, {} instructions, {} shots",
            num_qubits,
            circuit.num_ops(),
            shots
        );

        let mut sv = Statevector::new(num_qubits);
        for inst in circuit.instructions() {
            sv.apply(inst);
        }

        let mut counts = Counts::new();
        let result_types = if shots == 0 {
            circuit
                .result_types()
                .iter()
                .map(|rt| ResultTypeValue {
                    result_type: rt.clone(),
                    value: sv.marginal(&rt.resolved_targets(num_qubits)),
                })
                .collect()
        } else {
            let histogram = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                sv.sample_histogram(shots, &mut *rng)
            };

            for (outcome, &n) in histogram.iter().enumerate() {
                if n > 0 {
                    counts.insert(sv.outcome_to_bitstring(outcome), n);
                }
            }

            circuit
                .result_types()
                .iter()
                .map(|rt| ResultTypeValue {
                    result_type: rt.clone(),
                    value: marginalize(&histogram, &rt.resolved_targets(num_qubits))
                        .into_iter()
                        .map(|n| n as f64 / f64::from(shots))
                        .collect(),
                })
                .collect()
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots)
            .with_result_types(result_types)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata(serde_json::json!({
                "backend": self.config.name,
                "method": if shots == 0 { "exact" } else { "sampled" },
            }))
    }

    fn with_job<T>(
        &self,
        job_id: &JobId,
        f: impl FnOnce(&mut SimJob) -> HalResult<T>,
    ) -> HalResult<T> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(job_id.as_str())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        f(sim_job)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        self.check_shots(circuit, shots)?;

        let job_id = JobId::generate();
        let job = Job::new(job_id.clone(), circuit.name(), shots).with_backend(self.name());

        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        }

        debug!("Submitted job: {}", job_id);

        self.with_job(&job_id, |sim_job| sim_job.job.transition(JobStatus::Running))?;
        let result = self.run_simulation(circuit, shots);
        self.with_job(&job_id, |sim_job| {
            sim_job.result = Some(result);
            sim_job.job.transition(JobStatus::Completed)
        })?;

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.with_job(job_id, |sim_job| Ok(sim_job.job.status.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.with_job(job_id, |sim_job| match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            _ => Err(HalError::JobNotCompleted(job_id.0.clone())),
        })
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.with_job(job_id, |sim_job| {
            if sim_job.job.status.is_terminal() {
                // Simulations finish at submit time; nothing left to stop.
                Ok(())
            } else {
                sim_job.job.transition(JobStatus::Cancelled)
            }
        })
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.get_u64("max_qubits")? {
            Some(v) if v <= u64::from(MAX_SIMULABLE_QUBITS) => v as u32,
            Some(v) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits {v} exceeds the simulable limit of {MAX_SIMULABLE_QUBITS}"
                )));
            }
            None => DEFAULT_MAX_QUBITS,
        };
        let seed = config.get_u64("seed")?;

        Ok(Self::build(config, max_qubits, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbell_ir::QubitId;
    use std::f64::consts::FRAC_PI_4;

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert!(caps.supports_exact);
        assert_eq!(caps.num_qubits, 20);
        assert!(backend.availability().await.unwrap().is_available);
    }

    #[tokio::test]
    async fn test_simulator_bell_state_sampled() {
        let backend = SimulatorBackend::with_seed(11);

        let circuit = Circuit::bell().unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();

        let status = backend.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);

        // Bell state should produce only 00 and 11
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);

        let probs = result.probabilities().unwrap();
        assert_eq!(probs.len(), 4);
        assert_eq!(probs[1] + probs[2], 0.0);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_simulator_exact_probabilities() {
        let backend = SimulatorBackend::new();

        let mut circuit = Circuit::with_size("rotated", 2);
        circuit
            .bell_singlet(QubitId(0), QubitId(1))
            .unwrap()
            .ry(FRAC_PI_4, QubitId(1))
            .unwrap()
            .probability([QubitId(0), QubitId(1)])
            .unwrap();

        let job_id = backend.submit(&circuit, 0).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        assert!(result.is_exact());
        assert!(result.counts.is_empty());
        let p = result.probabilities().unwrap();
        let same = p[0] + p[3];
        let diff = p[1] + p[2];
        assert!((same - diff - FRAC_PI_4.cos()).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_simulator_same_seed_same_counts() {
        let circuit = Circuit::bell().unwrap();

        let a = SimulatorBackend::with_seed(3);
        let b = SimulatorBackend::with_seed(3);
        let ra = a.wait(&a.submit(&circuit, 500).await.unwrap()).await.unwrap();
        let rb = b.wait(&b.submit(&circuit, 500).await.unwrap()).await.unwrap();

        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_exact_run_requires_result_types() {
        let backend = SimulatorBackend::new();

        let mut circuit = Circuit::with_size("bare", 2);
        circuit.h(QubitId(0)).unwrap();

        let result = backend.submit(&circuit, 0).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_too_many_shots() {
        let backend = SimulatorBackend::new();
        let result = backend.submit(&Circuit::bell().unwrap(), 100_001).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_max_qubits_capped_at_simulable_width() {
        let backend = SimulatorBackend::with_max_qubits(100);
        assert_eq!(backend.capabilities().num_qubits, MAX_SIMULABLE_QUBITS);

        let mut wide = Circuit::with_size("wide", 71);
        wide
            .bell_singlet(QubitId(0), QubitId(70))
            .unwrap()
            .probability([QubitId(0), QubitId(70)])
            .unwrap();
        let result = backend.submit(&wide, 0).await;
        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));

        let config = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!(100));
        assert!(matches!(
            SimulatorBackend::from_config(config),
            Err(HalError::Configuration(_))
        ));

        let widest = BackendConfig::new("sim")
            .with_extra("max_qubits", serde_json::json!(MAX_SIMULABLE_QUBITS));
        assert_eq!(
            SimulatorBackend::from_config(widest)
                .unwrap()
                .capabilities()
                .num_qubits,
            MAX_SIMULABLE_QUBITS
        );
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_after_completion_keeps_result() {
        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&Circuit::bell().unwrap(), 0).await.unwrap();

        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert!(backend.result(&job_id).await.is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("local-sim")
            .with_extra("max_qubits", serde_json::json!(4))
            .with_extra("seed", serde_json::json!(9));
        let backend = SimulatorBackend::from_config(config).unwrap();

        assert_eq!(backend.name(), "local-sim");
        assert_eq!(backend.capabilities().num_qubits, 4);
        assert_eq!(backend.capabilities().name, "local-sim");

        let bad = BackendConfig::new("x").with_extra("max_qubits", serde_json::json!(-1));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Configuration(_))
        ));
    }
}
