// Domain layer: wire models and the ports the screens talk through.

pub mod model;
pub mod ports;
