/// Port definitions for hexagonal architecture
///
/// Ports are interfaces between the application core and the outside world:
/// the core depends only on these traits, never on concrete adapters.
pub mod outbound;
