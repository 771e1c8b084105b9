//! Trace UML Studio library
//!
//! Turns Jaeger traces into PlantUML sequence, component and deployment
//! diagrams. The modules are public so the CLI and the integration tests
//! can drive each stage on its own.

pub mod aggregator;
pub mod commands;
pub mod diagram;
pub mod input;
pub mod model;
pub mod normalize;
pub mod output;
pub mod topology;
pub mod utils;
