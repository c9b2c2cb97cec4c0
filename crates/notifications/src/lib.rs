//! Push notification delivery: fan-out dispatch and stale token cleanup

#[macro_use]
extern crate async_trait;

extern crate wavesexchange_log as log;

mod error;

pub mod cleanup;
pub mod dispatcher;
pub mod fcm_gateway;
pub mod gateway;
pub mod store;

pub use crate::error::{DispatchError, Error};
