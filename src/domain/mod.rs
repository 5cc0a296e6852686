//! Domain layer: value types, static lookup data, validation rules and the
//! ports the flows talk to.

pub mod amount;
pub mod currency;
pub mod event;
pub mod fields;
pub mod ports;
pub mod rates;
pub mod recipient;
