//! Wire types shared by the activities client and the activities service.

pub mod domain;
pub mod error;
pub mod protocol;
