//! # UNM Noise
//!
//! Error channels, channel composition, and the noise model registry.
//!
//! ## Gantree Architecture
//!
//! ```text
//! unm_noise // L1+L2: Channel + Noise (완료)
//!     KrausOperator // 복소 행렬 (완료)
//!     ErrorChannel // CPTP 채널 (완료)
//!         compose(), expand(), pauli_mixture()
//!         superoperator(), approx_eq(), is_cptp()
//!     ChannelFactory // 채널 생성 (완료)
//!         depolarizing(), thermal_relaxation(), spam()
//!     ChannelComposer // D∘RD 합성 (완료)
//!     NoiseModel // 명령별 채널 레지스트리 (완료)
//!         register_error(), register_error_all_qubits()
//!         declare_basis_gates()
//!     GateTimeTable // 게이트 시간 (완료)
//!     CoherenceProfile // 큐비트별 T1/T2 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use unm_noise::prelude::*;
//!
//! // Depolarizing on top of relaxation for one `sx` gate (35 ns)
//! let depol = ChannelFactory::depolarizing(0.001, 1).unwrap();
//! let relax = ChannelFactory::thermal_relaxation(120e-6, 90e-6, 35e-9).unwrap();
//! let error = ChannelComposer::combine(&depol, &relax).unwrap();
//!
//! let mut model = NoiseModel::new(["sx", "cx"]);
//! model.register_error(error, "sx", &[0]).unwrap();
//! assert_eq!(model.num_local_errors(), 1);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Kraus operators (Gantree: L1_Channel → KrausOperator)
pub mod kraus;

/// Error channels (Gantree: L1_Channel → ErrorChannel)
pub mod channel;

/// Channel construction (Gantree: L2_Noise → ChannelFactory)
pub mod factory;

/// Channel composition (Gantree: L2_Noise → ChannelComposer)
pub mod composer;

/// Noise model registry (Gantree: L2_Noise → NoiseModel)
pub mod noise_model;

/// Gate timing tables (Gantree: L2_Noise → GateTimeTable)
pub mod gate_times;

/// Per-qubit coherence times (Gantree: L2_Noise → CoherenceProfile)
pub mod coherence;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::ErrorChannel;
pub use coherence::CoherenceProfile;
pub use composer::ChannelComposer;
pub use factory::{ChannelFactory, SpamChannel, SpamSubject};
pub use gate_times::{GateLengths, GateTimeTable};
pub use kraus::KrausOperator;
pub use noise_model::{InstructionKey, NoiseModel};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use unm_noise::prelude::*;
    //! ```

    pub use crate::channel::ErrorChannel;
    pub use crate::coherence::CoherenceProfile;
    pub use crate::composer::ChannelComposer;
    pub use crate::factory::{ChannelFactory, SpamChannel, SpamSubject};
    pub use crate::gate_times::{GateLengths, GateTimeTable};
    pub use crate::kraus::KrausOperator;
    pub use crate::noise_model::{InstructionKey, NoiseModel};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use unm_core::physics;

    #[test]
    fn test_composed_channels_differ_per_qubit() {
        // Same depolarizing probability, different T1/T2 -> different channels
        let profile =
            CoherenceProfile::new(vec![0, 1], vec![120e-6, 60e-6], vec![90e-6, 40e-6]).unwrap();
        let depol = ChannelFactory::depolarizing(0.001, 1).unwrap();
        let duration = physics::ns_to_s(35.0);

        let composed: Vec<ErrorChannel> = (0..profile.num_qubits())
            .map(|pos| {
                let (t1, t2) = profile.times_at(pos).unwrap();
                let relax = ChannelFactory::thermal_relaxation(t1, t2, duration).unwrap();
                ChannelComposer::combine(&depol, &relax).unwrap()
            })
            .collect();

        assert!(!composed[0].approx_eq(&composed[1], 1e-12));
    }

    #[test]
    fn test_two_qubit_registration_shape() {
        let depol = ChannelFactory::depolarizing(0.01, 2).unwrap();
        let relax =
            ChannelFactory::thermal_relaxation_pair((120e-6, 90e-6), (60e-6, 40e-6), 300e-9)
                .unwrap();
        let error = ChannelComposer::combine(&depol, &relax).unwrap();

        let mut model = NoiseModel::new(["cx"]);
        model.register_error(error, "cx", &[0, 1]).unwrap();
        assert_eq!(model.local_keys(), vec![("cx".to_string(), vec![0, 1])]);
    }

    #[test]
    fn test_spam_all_qubits() {
        let spam = ChannelFactory::spam(0.02, SpamSubject::Measurement).unwrap();
        let mut model = NoiseModel::new(["sx"]);
        model
            .register_error_all_qubits(spam.channel, spam.subject.instruction_label())
            .unwrap();
        assert!(model.error_for("measure", &[3]).is_some());
        assert_eq!(model.num_local_errors(), 0);
    }
}
