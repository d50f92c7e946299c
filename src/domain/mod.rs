// Domain layer: 核心資料模型與介面 (ports)

pub mod model;
pub mod ports;
