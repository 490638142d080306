// deeper-core: Session state and device workflows behind the deeper-mcp tools.

pub mod access;
pub mod connectivity;
pub mod error;
pub mod filters;
pub mod instructions;
pub mod session;
pub mod system_info;
pub mod tools;

// ── Primary re-exports ──────────────────────────────────────────────
pub use connectivity::{TunnelHealth, TunnelReport};
pub use error::CoreError;
pub use instructions::INSTRUCTIONS;
pub use session::Session;
pub use system_info::SystemInfo;
pub use tools::{LoginDefaults, ToolDispatcher, ToolOutput, definitions};
