//! Publish types, request construction, and dispatching.
//!
//! A publish goes through three steps:
//!
//! - `PublishParameters` + `DeliveryType` are validated into a `Dispatch`
//!   (one variant per strategy: FIFO, standard, SMS)
//! - the `Dispatch` is turned into a `PublishRequest`
//! - the `Dispatcher` hands the request to a `Publisher` and reports a boolean

mod dispatcher;
mod request;
mod types;

pub use dispatcher::{Dispatcher, DispatcherStats, DispatcherStatsSnapshot};
pub use request::{Dispatch, MessageStructure, PublishRequest, PublishTarget, SUBJECT_EMPTY};
pub use types::{
    DeliveryType, MultiProtocolPayload, PublishParameters, Strategy, UnknownDeliveryType,
};
