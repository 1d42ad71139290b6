//! Per-pass reconciliation request

/// Context handed to every hook call within one reconciliation pass.
///
/// Carries the trigger source for the pass. Cancellation follows the normal
/// async rule — dropping the future returned by
/// [`ensure`](crate::handler::GenericOperand::ensure) cancels the in-flight
/// cluster call — and logging is ambient via `tracing`, so neither needs to
/// travel in the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileRequest {
    /// True when the operator initiated this pass itself (startup or periodic
    /// resync); false when it is reacting to an out-of-band change detected
    /// on a managed resource.
    pub hco_triggered: bool,
}

impl ReconcileRequest {
    /// A pass initiated by the operator's own logic
    pub fn controller_triggered() -> Self {
        Self { hco_triggered: true }
    }

    /// A pass reacting to an externally detected change
    pub fn externally_triggered() -> Self {
        Self { hco_triggered: false }
    }
}
