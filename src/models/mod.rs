pub mod backend;
pub mod cadence;
pub mod fee;
pub mod pack;
pub mod payment_method;
pub mod resolution;
