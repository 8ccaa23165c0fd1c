//! Tool registry: descriptors for listing, and name-based dispatch for calling.
//!
//! Protocol bindings (`mcp`, `routes`) reach the gateway through this module.

mod catalog;
mod definition;
mod router;

pub use catalog::{prompt_catalog, tool_catalog};
pub use definition::ToolDescriptor;
pub use router::{call_tool, get_prompt};
