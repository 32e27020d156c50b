use hashbrown::HashSet;
use parking_lot::Mutex;
use telemetry_config::DEFAULT_MAX_EVENTS_PER_SESSION;

/// Admits telemetry ids at most once per session, up to a fixed budget.
///
/// The gate remembers the ids it admitted for the current RUM session. Whenever a different
/// session id is observed, including a transition to no session at all, the remembered ids are
/// discarded and the budget starts over.
#[derive(Debug)]
pub struct TelemetryGate {
    budget: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    current_session: Option<String>,
    // Uses hashbrown for the faster default hasher.
    seen: HashSet<String>,
}

impl TelemetryGate {
    /// Creates a gate with the default budget of [`DEFAULT_MAX_EVENTS_PER_SESSION`].
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_MAX_EVENTS_PER_SESSION)
    }

    /// Creates a gate admitting up to `budget` distinct ids per session.
    ///
    /// The budget is at least one. A budget of zero is raised to one.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
            inner: Mutex::default(),
        }
    }

    /// Returns `true` if `id` is admitted in the given session.
    ///
    /// An id is admitted if it has not been admitted in the session before and the session's
    /// budget is not exhausted. Admitting consumes one unit of the budget.
    pub fn admit(&self, id: &str, session_id: Option<&str>) -> bool {
        let mut inner = self.inner.lock();

        if inner.current_session.as_deref() != session_id {
            telemetry_log::trace!(
                "telemetry session changed, forgetting {} ids",
                inner.seen.len()
            );
            inner.current_session = session_id.map(str::to_owned);
            inner.seen.clear();
        }

        if inner.seen.len() >= self.budget || inner.seen.contains(id) {
            return false;
        }

        inner.seen.insert(id.to_owned())
    }

    /// Returns the session the admitted ids belong to.
    pub fn current_session(&self) -> Option<String> {
        self.inner.lock().current_session.clone()
    }

    /// Returns the number of ids admitted in the current session.
    pub fn len(&self) -> usize {
        self.inner.lock().seen.len()
    }

    /// Returns `true` if no id was admitted in the current session.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of ids admitted per session.
    pub fn budget(&self) -> usize {
        self.budget
    }
}

impl Default for TelemetryGate {
    fn default() -> Self {
        Self::new()
    }
}
