//! Channel composition
//!
//! Gantree: L2_Noise → ChannelComposer
//!
//! Per instruction, the effective channel is "relaxation/dephasing first,
//! depolarizing on top": p → D(RD(p)).

use crate::channel::ErrorChannel;
use unm_core::UnmResult;

/// Combines the depolarizing and relaxation effects of one instruction
/// Gantree: ChannelComposer // 채널 합성
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelComposer;

impl ChannelComposer {
    /// `depolarizing.compose(relaxation)`: relaxation is applied first
    /// Gantree: combine(D,RD) -> Result<ErrorChannel> // D∘RD
    ///
    /// Both channels must act on the same number of qubits. The result is a
    /// fresh channel; the inputs are left untouched.
    pub fn combine(
        depolarizing: &ErrorChannel,
        relaxation: &ErrorChannel,
    ) -> UnmResult<ErrorChannel> {
        depolarizing.compose(relaxation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ChannelFactory;
    use crate::kraus::KrausOperator;
    use approx::assert_relative_eq;

    #[test]
    fn test_combine_is_deterministic() {
        let d = ChannelFactory::depolarizing(0.001, 1).unwrap();
        let r = ChannelFactory::thermal_relaxation(120e-6, 90e-6, 35e-9).unwrap();

        let first = ChannelComposer::combine(&d, &r).unwrap();
        let second = ChannelComposer::combine(&d, &r).unwrap();
        assert_eq!(first, second);
        assert!(first.is_cptp(1e-12));
    }

    #[test]
    fn test_combine_is_not_commutative() {
        let d = ChannelFactory::depolarizing(0.1, 1).unwrap();
        let r = ChannelFactory::thermal_relaxation(50e-6, 40e-6, 1e-6).unwrap();

        let dr = ChannelComposer::combine(&d, &r).unwrap();
        let rd = ChannelComposer::combine(&r, &d).unwrap();
        assert!(!dr.approx_eq(&rd, 1e-9));
    }

    #[test]
    fn test_combine_applies_relaxation_first() {
        // Full depolarization last leaves the maximally mixed state whatever
        // relaxation did before; the opposite order would leave it biased.
        let d = ChannelFactory::depolarizing(1.0, 1).unwrap();
        let r = ChannelFactory::thermal_relaxation(1e-6, 1e-6, 1e-6).unwrap();
        let excited = KrausOperator::real_2x2(0.0, 0.0, 0.0, 1.0);

        let rho = ChannelComposer::combine(&d, &r)
            .unwrap()
            .apply(&excited)
            .unwrap();
        assert_relative_eq!(rho.get(1, 1).re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_combine_two_qubit() {
        let d = ChannelFactory::depolarizing(0.01, 2).unwrap();
        let r = ChannelFactory::thermal_relaxation_pair((100e-6, 80e-6), (90e-6, 70e-6), 300e-9)
            .unwrap();
        let combined = ChannelComposer::combine(&d, &r).unwrap();
        assert_eq!(combined.num_qubits(), 2);
        assert!(combined.is_cptp(1e-9));
    }

    #[test]
    fn test_combine_rejects_arity_mismatch() {
        let d = ChannelFactory::depolarizing(0.01, 2).unwrap();
        let r = ChannelFactory::thermal_relaxation(100e-6, 80e-6, 35e-9).unwrap();
        assert!(ChannelComposer::combine(&d, &r).is_err());
    }
}
