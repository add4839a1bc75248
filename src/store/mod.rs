//! State slices: per-operation fetch lifecycle over the REST backend.
//!
//! Each slice owns its snapshot behind a lock and exposes async operations
//! that drive the `idle → pending → {fulfilled, rejected}` lifecycle. State
//! transitions themselves are pure methods on the state types; the stores
//! only orchestrate I/O around them. Failures never escape a slice: they are
//! converted to user-facing messages and recorded in the slice's `error`
//! field.

pub mod financial;
mod resource;
pub mod session;

pub use financial::{FinancialState, FinancialStore};
pub use resource::{Phase, ResourceState};
pub use session::{SessionState, SessionStore};
