//! Application context and effect dispatch
//!
//! `AppContext` decides what an event means; `Dispatcher` carries the
//! resulting effects out against the transport, the motor and the screen.

pub mod context;
pub mod dispatcher;

pub use context::{AppContext, Effect, Effects, MAX_EFFECTS};
pub use dispatcher::{DispatchReport, Dispatcher};
