//! Track sensor drivers

pub mod ir;

pub use ir::IrSensorPair;
