// Domain layer: plain records and the ports the engine depends on.

pub mod model;
pub mod ports;
