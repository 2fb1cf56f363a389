//! Auxiliary endpoints outside history search
//!
//! Each call spends its own retry budget and leaves the query state of the
//! session untouched.

mod agent_status;
mod visitor;

pub use agent_status::AgentStatus;
pub use visitor::Visitor;

/// Discovery name of the visitor monitoring service.
pub const MONITORING_SERVICE: &str = "smt";

/// Discovery name of the messaging history service, which also serves agent status.
pub const MESSAGING_SERVICE: &str = "msgHist";
