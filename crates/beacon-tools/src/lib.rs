//! # beacon-tools
//!
//! Capability registry for invokable operations.
//!
//! - [`BeaconTool`]: trait implemented by every invokable operation
//! - [`ToolRegistry`]: central name → tool index
//! - [`ToolDescriptor`]: wire-format description advertised to callers
//! - [`arith::AddTool`]: built-in arithmetic example

#![deny(unsafe_code)]

pub mod arith;
pub mod descriptor;
pub mod errors;
pub mod registry;
pub mod traits;

pub use descriptor::{InputSchema, ToolDescriptor};
pub use errors::ToolError;
pub use registry::ToolRegistry;
pub use traits::BeaconTool;
