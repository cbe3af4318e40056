// src/domain/mod.rs

pub mod authz;
pub mod options;
pub mod passwords;
pub mod status;
pub mod timefmt;
pub mod uploads;
