/// Adapter implementations for hexagonal architecture
pub mod outbound;
