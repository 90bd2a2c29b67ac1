//! The agent loop: drives a model through repeated rounds of reasoning and
//! tool use, persisting every turn to the session log and compacting the
//! conversation when it grows past the configured budget.

mod agent;
pub mod events;

pub use agent::{
    Agent, AgentBuilder, AgentConfig, AgentInput, FollowUpProvider, GenerateOutcome,
};
pub use events::AgentEvent;
