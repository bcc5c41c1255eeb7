pub mod record;
pub mod sqlite;

pub use record::Record;
pub use sqlite::RecordStore;
