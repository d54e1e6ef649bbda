use std::cell::Cell;

/// Identifies one `execute` call of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Decides whether a settled request may still write to state.
///
/// Every call takes a ticket from a monotonically increasing generation.
/// A result is applied only when its ticket is the latest one issued and
/// the owner has not been disposed, so a slow request can never overwrite
/// the result of a newer one and nothing is written after unmount.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: Cell<u64>,
    disposed: Cell<bool>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every request started before it.
    pub fn begin(&self) -> Ticket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        Ticket(next)
    }

    /// Supersede in-flight requests without starting a new one.
    pub fn invalidate(&self) {
        self.begin();
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.disposed.get() && self.generation.get() == ticket.0
    }

    pub fn is_live(&self) -> bool {
        !self.disposed.get()
    }

    pub fn dispose(&self) {
        self.disposed.set(true);
    }
}
