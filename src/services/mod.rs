//! Screen controllers for the kiosk

pub mod check_in;
pub mod check_out;
pub mod deliveries;
pub mod pagination;
pub mod receipt;
pub mod suggestions;

use std::time::Duration;

/// Where the kiosk goes after a successful action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigate {
    /// Printable receipt of the visitor just created
    Receipt { visitor_id: String },
    /// Back to the home screen once `after` has elapsed
    Home { after: Duration },
}

/// Exclusive borrow of a controller across an await. `release` runs when the
/// guard drops, including when the owning future is dropped mid-request, so
/// it must be safe to run after the matching `finish_*` transition.
pub(crate) struct InFlight<'a, C, F: FnOnce(&mut C)> {
    controller: &'a mut C,
    release: Option<F>,
}

impl<'a, C, F: FnOnce(&mut C)> InFlight<'a, C, F> {
    pub(crate) fn new(controller: &'a mut C, release: F) -> Self {
        Self {
            controller,
            release: Some(release),
        }
    }
}

impl<C, F: FnOnce(&mut C)> std::ops::Deref for InFlight<'_, C, F> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.controller
    }
}

impl<C, F: FnOnce(&mut C)> std::ops::DerefMut for InFlight<'_, C, F> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.controller
    }
}

impl<C, F: FnOnce(&mut C)> Drop for InFlight<'_, C, F> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(&mut *self.controller);
        }
    }
}
