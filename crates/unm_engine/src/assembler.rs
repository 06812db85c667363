//! Noise model assembly
//!
//! Gantree: L4_Engine → ModelAssembler
//!
//! Three ordered phases:
//! 1. gate channels: per (qubit, 1Q gate) and per unordered pair × 2Q gate
//! 2. SPAM channels, skipped for negative probabilities
//! 3. finalize: hand the model over, no further mutation
//!
//! Each phase is a no-op when called again after it completed. Calling a
//! phase before its predecessor is an [`UnmError::AssemblyOutOfOrder`].

use crate::config::NoiseBuildConfig;
use std::collections::HashSet;
use std::fmt;
use unm_core::physics;
use unm_core::{instructions, Probability, QubitId, QubitPair, UnmError, UnmResult};
use unm_noise::{
    ChannelComposer, ChannelFactory, CoherenceProfile, ErrorChannel, NoiseModel, SpamSubject,
};

/// Assembly progress
/// Gantree: AssemblyPhase // 조립 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssemblyPhase {
    /// Nothing installed yet
    Pending,
    /// Gate channels registered
    ChannelsInstalled,
    /// SPAM channels registered (or skipped)
    SpamInstalled,
}

impl AssemblyPhase {
    /// Short name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            AssemblyPhase::Pending => "pending",
            AssemblyPhase::ChannelsInstalled => "channels-installed",
            AssemblyPhase::SpamInstalled => "spam-installed",
        }
    }
}

impl fmt::Display for AssemblyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a build registered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    /// Number of `(1Q gate, [qubit])` entries
    pub single_qubit_entries: usize,
    /// Number of `(2Q gate, [a, b])` entries
    pub two_qubit_entries: usize,
    /// Unordered qubit pairs that received a channel, in registration order
    pub pairs: Vec<QubitPair>,
    /// Installed state-preparation flip probability
    pub state_preparation: Option<Probability>,
    /// Installed measurement flip probability
    pub measurement: Option<Probability>,
}

impl AssemblyReport {
    /// Number of SPAM channels installed
    pub fn spam_channels(&self) -> usize {
        usize::from(self.state_preparation.is_some()) + usize::from(self.measurement.is_some())
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} single-qubit, {} two-qubit ({} pairs), {} SPAM channel(s)",
            self.single_qubit_entries,
            self.two_qubit_entries,
            self.pairs.len(),
            self.spam_channels()
        )
    }
}

/// Finished model with its report
#[derive(Debug, Clone)]
pub struct AssembledModel {
    /// Read-only noise model
    pub model: NoiseModel,
    /// Registration summary
    pub report: AssemblyReport,
}

/// Builds a [`NoiseModel`] from coherence times and a configuration
/// Gantree: ModelAssembler // 모델 조립
pub struct ModelAssembler<'a> {
    config: &'a NoiseBuildConfig,
    profile: &'a CoherenceProfile,
    model: NoiseModel,
    phase: AssemblyPhase,
    report: AssemblyReport,
}

/// One pending registration
struct Registration {
    channel: ErrorChannel,
    label: String,
    qubits: Vec<QubitId>,
}

impl<'a> ModelAssembler<'a> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Validate inputs and start an empty model
    ///
    /// Fails with `DimensionMismatch` when the gate-time table does not match
    /// the qubit count or gate lists, before anything is registered.
    pub fn new(config: &'a NoiseBuildConfig, profile: &'a CoherenceProfile) -> UnmResult<Self> {
        config.validate()?;
        config.gate_times.validate(
            profile.num_qubits(),
            config.single_qubit_gates.len(),
            config.two_qubit_gates.len(),
        )?;

        Ok(Self {
            config,
            profile,
            model: NoiseModel::new(config.effective_basis_gates()),
            phase: AssemblyPhase::Pending,
            report: AssemblyReport::default(),
        })
    }

    /// Run all three phases
    /// Gantree: assemble(config,profile) -> Result<AssembledModel> // 전체 조립
    pub fn assemble(
        config: &'a NoiseBuildConfig,
        profile: &'a CoherenceProfile,
    ) -> UnmResult<AssembledModel> {
        let mut assembler = Self::new(config, profile)?;
        assembler.install_gate_channels()?;
        assembler.install_spam()?;
        assembler.finalize()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current phase
    pub fn phase(&self) -> AssemblyPhase {
        self.phase
    }

    /// Model as built so far
    pub fn model(&self) -> &NoiseModel {
        &self.model
    }

    // ========================================================================
    // Phase 1: Gate Channels
    // ========================================================================

    /// Register depolarizing and/or relaxation channels for every gate
    /// Gantree: install_gate_channels(&mut self) -> Result // 1단계
    ///
    /// With both families enabled the registered channel is
    /// `depolarizing ∘ relaxation`. All channels are built and their labels
    /// checked before the first registration, so a failure leaves the model
    /// untouched.
    pub fn install_gate_channels(&mut self) -> UnmResult<()> {
        if self.phase >= AssemblyPhase::ChannelsInstalled {
            return Ok(());
        }

        let mut pending = self.single_qubit_registrations()?;
        let single_qubit_entries = pending.len();
        let (two_qubit, pairs) = self.two_qubit_registrations()?;
        let two_qubit_entries = two_qubit.len();
        pending.extend(two_qubit);

        if let Some(unknown) = pending
            .iter()
            .find(|r| !self.model.is_known_instruction(&r.label))
        {
            return Err(UnmError::UnknownInstruction {
                label: unknown.label.clone(),
            });
        }
        for Registration {
            channel,
            label,
            qubits,
        } in pending
        {
            self.model.register_error(channel, &label, &qubits)?;
        }

        self.report.single_qubit_entries = single_qubit_entries;
        self.report.two_qubit_entries = two_qubit_entries;
        self.report.pairs = pairs;
        self.advance(AssemblyPhase::ChannelsInstalled);
        Ok(())
    }

    fn single_qubit_registrations(&self) -> UnmResult<Vec<Registration>> {
        let depolarizing = self.depolarizing_channel(self.config.depolarizing_prob_1q, 1)?;
        let mut pending = Vec::new();

        for (position, &qubit) in self.profile.qubits().iter().enumerate() {
            let (t1, t2) = self.coherence_at(position)?;
            for (gate_index, gate) in self.config.single_qubit_gates.iter().enumerate() {
                let relaxation = if self.config.relaxation {
                    let ns = self
                        .config
                        .gate_times
                        .single_qubit(position, gate_index)
                        .ok_or_else(|| missing_time(gate))?;
                    Some(ChannelFactory::thermal_relaxation(t1, t2, physics::ns_to_s(ns))?)
                } else {
                    None
                };
                if let Some(channel) = Self::effective(depolarizing.as_ref(), relaxation)? {
                    pending.push(Registration {
                        channel,
                        label: gate.clone(),
                        qubits: vec![qubit],
                    });
                }
            }
        }
        Ok(pending)
    }

    fn two_qubit_registrations(&self) -> UnmResult<(Vec<Registration>, Vec<QubitPair>)> {
        let depolarizing = self.depolarizing_channel(self.config.depolarizing_prob_2q, 2)?;
        let qubits = self.profile.qubits();
        let mut seen: HashSet<QubitPair> = HashSet::new();
        let mut pairs = Vec::new();
        let mut pending = Vec::new();

        for (pos_a, &a) in qubits.iter().enumerate() {
            for (pos_b, &b) in qubits.iter().enumerate() {
                if a == b || !seen.insert(QubitPair::new(a, b)) {
                    continue;
                }
                let queued = pending.len();
                let coherence_a = self.coherence_at(pos_a)?;
                let coherence_b = self.coherence_at(pos_b)?;
                for (gate_index, gate) in self.config.two_qubit_gates.iter().enumerate() {
                    let relaxation = if self.config.relaxation {
                        let ns = self
                            .config
                            .gate_times
                            .two_qubit(gate_index)
                            .ok_or_else(|| missing_time(gate))?;
                        Some(ChannelFactory::thermal_relaxation_pair(
                            coherence_a,
                            coherence_b,
                            physics::ns_to_s(ns),
                        )?)
                    } else {
                        None
                    };
                    if let Some(channel) = Self::effective(depolarizing.as_ref(), relaxation)? {
                        pending.push(Registration {
                            channel,
                            label: gate.clone(),
                            qubits: vec![a, b],
                        });
                    }
                }
                if pending.len() > queued {
                    pairs.push(QubitPair::new(a, b));
                }
            }
        }
        Ok((pending, pairs))
    }

    fn depolarizing_channel(
        &self,
        probability: f64,
        arity: usize,
    ) -> UnmResult<Option<ErrorChannel>> {
        self.config
            .depolarizing
            .then(|| ChannelFactory::depolarizing(probability, arity))
            .transpose()
    }

    fn coherence_at(&self, position: usize) -> UnmResult<(f64, f64)> {
        self.profile.times_at(position).ok_or_else(|| {
            UnmError::dimension("coherence times", position + 1, self.profile.num_qubits())
        })
    }

    /// Channel to register for one instruction, if any family is enabled
    fn effective(
        depolarizing: Option<&ErrorChannel>,
        relaxation: Option<ErrorChannel>,
    ) -> UnmResult<Option<ErrorChannel>> {
        match (depolarizing, relaxation) {
            (Some(d), Some(r)) => ChannelComposer::combine(d, &r).map(Some),
            (Some(d), None) => Ok(Some(d.clone())),
            (None, r) => Ok(r),
        }
    }

    // ========================================================================
    // Phase 2: SPAM
    // ========================================================================

    /// Register state-preparation and measurement flips on all qubits
    /// Gantree: install_spam(&mut self) -> Result // 2단계
    ///
    /// A negative probability skips that channel. Installing the
    /// state-preparation channel declares the marker label and adds the bit
    /// flip `x` to the basis gates.
    pub fn install_spam(&mut self) -> UnmResult<()> {
        match self.phase {
            AssemblyPhase::Pending => {
                return Err(self.out_of_order(AssemblyPhase::SpamInstalled))
            }
            AssemblyPhase::SpamInstalled => return Ok(()),
            AssemblyPhase::ChannelsInstalled => {}
        }

        let state_preparation = Probability::optional(self.config.state_preparation_error_prob)?
            .map(|p| {
                let subject = SpamSubject::StatePreparation {
                    label: self.config.state_preparation_label.clone(),
                };
                ChannelFactory::spam(p.value(), subject)
            })
            .transpose()?;
        let measurement = Probability::optional(self.config.measurement_error_prob)?
            .map(|p| ChannelFactory::spam(p.value(), SpamSubject::Measurement))
            .transpose()?;

        if let Some(spam) = state_preparation {
            self.model.declare_basis_gates([instructions::BIT_FLIP]);
            self.model.declare_marker_label(spam.subject.instruction_label());
            self.model
                .register_error_all_qubits(spam.channel, spam.subject.instruction_label())?;
            self.report.state_preparation = Some(spam.probability);
        }
        if let Some(spam) = measurement {
            self.model
                .register_error_all_qubits(spam.channel, spam.subject.instruction_label())?;
            self.report.measurement = Some(spam.probability);
        }

        self.advance(AssemblyPhase::SpamInstalled);
        Ok(())
    }

    // ========================================================================
    // Phase 3: Finalize
    // ========================================================================

    /// Hand over the finished model
    /// Gantree: finalize(self) -> Result<AssembledModel> // 3단계
    pub fn finalize(self) -> UnmResult<AssembledModel> {
        if self.phase != AssemblyPhase::SpamInstalled {
            return Err(UnmError::AssemblyOutOfOrder {
                requested: "finalized",
                current: self.phase.name(),
            });
        }
        log::info!("noise model assembled: {}", self.report);
        Ok(AssembledModel {
            model: self.model,
            report: self.report,
        })
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn advance(&mut self, next: AssemblyPhase) {
        log::debug!("assembly phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    fn out_of_order(&self, requested: AssemblyPhase) -> UnmError {
        UnmError::AssemblyOutOfOrder {
            requested: requested.name(),
            current: self.phase.name(),
        }
    }
}

fn missing_time(gate: &str) -> UnmError {
    UnmError::ConfigError(format!("no execution time for gate '{gate}'"))
}

// ============================================================================
// Tests
// ============================================================================
