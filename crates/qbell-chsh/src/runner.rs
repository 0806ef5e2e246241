//! Submitting CHSH circuits and collecting their results.

use futures::future::try_join_all;
use tracing::{debug, info};

use qbell_hal::{Backend, Counts, ExecutionResult, HalError, HalResult, JobId};
use qbell_ir::{Circuit, QubitId};

use crate::analysis::{BasisSetting, ChshResults, OutcomeDistribution, analyze};
use crate::error::{ChshError, ChshResult};
use crate::report::ChshReport;

/// Handle to one submitted CHSH circuit.
pub struct QuantumTask<'a> {
    backend: &'a dyn Backend,
    job_id: JobId,
    setting: Option<BasisSetting>,
    qubits: [QubitId; 2],
}

impl QuantumTask<'_> {
    /// Job identifier on the backend.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Basis setting of this task, if it is one of the first four.
    pub fn setting(&self) -> Option<BasisSetting> {
        self.setting
    }

    /// The measured pair, party A first.
    pub fn qubits(&self) -> [QubitId; 2] {
        self.qubits
    }

    /// Wait for the job and return its result.
    pub async fn result(&self) -> HalResult<ExecutionResult> {
        self.backend.wait(&self.job_id).await
    }

    /// Wait for the job and reduce its result to the four outcomes of the
    /// measured pair.
    pub async fn distribution(&self) -> ChshResult<OutcomeDistribution> {
        let result = self.result().await?;
        distribution_from_result(&self.job_id, &result, self.qubits)
    }
}

impl std::fmt::Debug for QuantumTask<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantumTask")
            .field("backend", &self.backend.name())
            .field("job_id", &self.job_id)
            .field("setting", &self.setting)
            .field("qubits", &self.qubits)
            .finish()
    }
}

/// The two qubits a CHSH circuit reports probabilities for.
fn measured_pair(circuit: &Circuit) -> HalResult<[QubitId; 2]> {
    circuit
        .result_types()
        .first()
        .map(|rt| rt.resolved_targets(circuit.num_qubits()))
        .and_then(|targets| <[QubitId; 2]>::try_from(targets).ok())
        .ok_or_else(|| {
            HalError::InvalidCircuit(format!(
                "{}: expected a probability result type over two qubits",
                circuit.name()
            ))
        })
}

/// Submit each circuit to `backend` with `shots` shots.
///
/// Circuits are validated against the backend first. Tasks are returned in
/// the order of `circuits`; the first four are tagged with their basis
/// setting.
pub async fn run_chsh_inequality<'a>(
    circuits: &[Circuit],
    backend: &'a dyn Backend,
    shots: u32,
) -> HalResult<Vec<QuantumTask<'a>>> {
    let mut tasks = Vec::with_capacity(circuits.len());

    for (i, circuit) in circuits.iter().enumerate() {
        let qubits = measured_pair(circuit)?;
        backend
            .validate(circuit)
            .await?
            .into_result(circuit.name())?;

        let job_id = backend.submit(circuit, shots).await?;
        debug!(circuit = circuit.name(), %job_id, shots, "submitted CHSH circuit");

        tasks.push(QuantumTask {
            backend,
            job_id,
            setting: BasisSetting::ALL.get(i).copied(),
            qubits,
        });
    }

    Ok(tasks)
}

/// Reduce an execution result to the four outcomes of `qubits`.
///
/// Uses the probability result-type value when the backend reported one,
/// and the shot counts otherwise.
pub fn distribution_from_result(
    job_id: &JobId,
    result: &ExecutionResult,
    qubits: [QubitId; 2],
) -> ChshResult<OutcomeDistribution> {
    if let Some(values) = result.probabilities() {
        return OutcomeDistribution::from_probabilities(values).ok_or_else(|| {
            ChshError::MalformedDistribution {
                job: job_id.clone(),
                len: values.len(),
            }
        });
    }
    distribution_from_counts(job_id, &result.counts, qubits)
}

fn distribution_from_counts(
    job_id: &JobId,
    counts: &Counts,
    qubits: [QubitId; 2],
) -> ChshResult<OutcomeDistribution> {
    let mut weights = [0.0; 4];

    for (bitstring, &n) in counts.iter() {
        let bits = bitstring.as_bytes();
        let bit = |q: QubitId| match bits.get(q.index()) {
            Some(b'0') => Some(0),
            Some(b'1') => Some(1),
            _ => None,
        };
        let (Some(b0), Some(b1)) = (bit(qubits[0]), bit(qubits[1])) else {
            return Err(ChshError::MalformedDistribution {
                job: job_id.clone(),
                len: bits.len(),
            });
        };
        weights[(b0 << 1) | b1] += n as f64;
    }

    OutcomeDistribution::new(weights).ok_or_else(|| ChshError::MalformedDistribution {
        job: job_id.clone(),
        len: counts.len(),
    })
}

/// Collect the four task results and compute the CHSH statistic.
///
/// `tasks` must hold exactly one task per basis setting, in basis order.
/// All results are awaited concurrently. When `verbose` is set the report
/// is printed to stdout.
pub async fn get_chsh_results(
    tasks: &[QuantumTask<'_>],
    verbose: bool,
) -> ChshResult<ChshResults> {
    if tasks.len() != BasisSetting::ALL.len() {
        return Err(ChshError::TaskCount {
            expected: BasisSetting::ALL.len(),
            got: tasks.len(),
        });
    }

    let distributions: [OutcomeDistribution; 4] =
        try_join_all(tasks.iter().map(|task| task.distribution()))
            .await?
            .try_into()
            .map_err(|ds: Vec<_>| ChshError::TaskCount {
                expected: BasisSetting::ALL.len(),
                got: ds.len(),
            })?;

    let results = analyze(&distributions)?;
    info!(
        chsh_value = results.chsh_value,
        violated = results.is_violated(0.0),
        "CHSH analysis complete"
    );

    if verbose {
        println!("{}", ChshReport::new(&results));
    }

    Ok(results)
}
