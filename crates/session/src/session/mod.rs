//! Session state and the state machine that drives it.

mod state;
mod store;

pub use state::{AuthState, Session, SessionId, SyncStatus};
pub use store::SessionStore;
