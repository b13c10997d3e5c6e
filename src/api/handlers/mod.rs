//! HTTP request handlers, split by surface.

pub mod bridge;
pub mod confirm;
pub mod health;

pub use bridge::{bridge_asset, bridge_action_status};
pub use confirm::confirm_page;
pub use health::{health_check, mcp_server_info};
