/// Domain layer: entities, value objects and pure services for package
/// trust analysis.
pub mod domain;
pub mod services;
