pub mod error;
pub mod exporter;
pub mod ident;
pub mod pack;

use serde::{Deserialize, Serialize};

pub use error::Error;
pub use exporter::{Credentials, Handler, Sender};
pub use ident::{normalize, InvalidIdentifier};
pub use pack::{PackedRecord, Routing};

pub type Time = u64;

/// One monitoring data point handed over by the upstream pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub host: String,
    pub service: String,
    pub metric: f64,
    pub time: Time,
}
