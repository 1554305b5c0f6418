mod model;
mod persistence;

pub use model::{ModelHandle, ModelLease};
pub use persistence::{persist_trim, RecordFormat, TrimRecord};
