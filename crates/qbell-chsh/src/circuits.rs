//! Circuit construction for the four CHSH measurement settings.

use qbell_ir::{Circuit, IrError, IrResult, QubitId};

use crate::analysis::BasisSetting;
use crate::config::ChshAngles;

/// Prepare the Bell pair on `qubit0`, `qubit1` and rotate each qubit into
/// its measurement basis.
///
/// Each qubit gets `Ry(2·rotation)` when its rotation is non-zero. The
/// circuit declares probabilities over `[qubit0, qubit1]`, so outcome index
/// 1 means `qubit0 = 0`, `qubit1 = 1`.
///
/// Fails with [`IrError::QubitNotFound`] when either index is `u32::MAX`,
/// since no register can hold it.
pub fn bell_singlet_rotated_basis(
    qubit0: QubitId,
    qubit1: QubitId,
    rotation0: f64,
    rotation1: f64,
) -> IrResult<Circuit> {
    let highest = qubit0.max(qubit1);
    let size = highest.0.checked_add(1).ok_or(IrError::QubitNotFound {
        qubit: highest,
        gate_name: Some("bell_singlet".into()),
    })?;
    let mut circuit = Circuit::with_size("bell_singlet_rotated_basis", size);

    circuit.bell_singlet(qubit0, qubit1)?;
    if rotation0 != 0.0 {
        circuit.ry(2.0 * rotation0, qubit0)?;
    }
    if rotation1 != 0.0 {
        circuit.ry(2.0 * rotation1, qubit1)?;
    }
    circuit.probability([qubit0, qubit1])?;

    Ok(circuit)
}

/// Build the four CHSH circuits in basis order: (a,b), (a,b'), (a',b), (a',b').
pub fn create_chsh_inequality_circuits(
    qubit0: QubitId,
    qubit1: QubitId,
    angles: &ChshAngles,
) -> IrResult<Vec<Circuit>> {
    BasisSetting::ALL
        .iter()
        .map(|&setting| {
            let (theta_a, theta_b) = angles.for_setting(setting);
            let mut circuit = bell_singlet_rotated_basis(qubit0, qubit1, theta_a, theta_b)?;
            circuit.set_name(format!("chsh_{}", setting.slug()));
            Ok(circuit)
        })
        .collect()
}
