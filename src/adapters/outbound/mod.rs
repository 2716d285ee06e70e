/// Outbound adapters - Concrete implementations of outbound ports
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
pub mod text;
