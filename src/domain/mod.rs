// Domain layer: form models and ports. Adapters live under crate::adapters.

pub mod model;
pub mod ports;
