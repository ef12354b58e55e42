//! Consent Dispatch
//!
//! Runs the callbacks a visitor has consented to.
//! The registry is an ordinary value owned by the caller; there is no
//! process-wide handler table.

mod handlers;

pub use handlers::{Callback, ConsentHandlers, Handler, Trigger};
