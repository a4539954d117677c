// Domain layer: card, spread and zodiac models plus the ports the engine talks through.

pub mod model;
pub mod ports;
