//! Drop form resubmissions while a request is already in flight.

use std::sync::atomic::{AtomicBool, Ordering};

/// At most one submission in flight per guard.
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    in_flight: AtomicBool,
}

impl SubmissionGuard {
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claim the guard for one submission. Returns `None` while another
    /// submission holds it; the claim is released when the ticket drops.
    pub fn try_begin(&self) -> Option<Submission<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Submission { guard: self })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one submission.
#[derive(Debug)]
#[must_use = "the submission ends as soon as the ticket is dropped"]
pub struct Submission<'a> {
    guard: &'a SubmissionGuard,
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::Release);
    }
}
