//! Lifecycle primitive for a single fetched resource.

/// Lifecycle phase of an asynchronous fetch, derived from the stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// One resource's slice of state: the last settled payload, whether a fetch
/// is in flight, and the last failure message.
///
/// Invariants: `loading` is true only strictly between `begin` and the next
/// settle; `error` is cleared on every `begin`; a failed fetch leaves the
/// previously stored `data` untouched (stale-while-error).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> ResourceState<T> {
    /// A new fetch attempt was dispatched.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// The fetch settled successfully.
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    /// The fetch settled with a failure; previous data is retained.
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Rejected
        } else if self.data.is_some() {
            Phase::Fulfilled
        } else {
            Phase::Idle
        }
    }
}
