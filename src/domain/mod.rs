//! Library entities, the late-fee schedule, and the ports through which the
//! application reaches storage, payments and time.

pub mod book;
pub mod borrow;
pub mod fee;
pub mod patron;
pub mod payment;
pub mod ports;
