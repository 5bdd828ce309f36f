use tokio_util::sync::CancellationToken;

/// Cooperative stop request for one drive loop.
///
/// Raising it only keeps the *next* job from starting; the in-flight synthesis
/// call is left to settle. Each `start`/`continue` gets a fresh signal, so a
/// stale stop never leaks into a later run.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    token: CancellationToken,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.token.cancel();
    }

    pub fn is_raised(&self) -> bool {
        self.token.is_cancelled()
    }
}
