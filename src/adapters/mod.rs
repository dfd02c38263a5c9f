// Adapters layer: concrete implementations for external systems (http, csrf cookies).

pub mod csrf;
pub mod http;
