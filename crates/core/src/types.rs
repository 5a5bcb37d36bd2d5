/// Primary keys are PostgreSQL BIGSERIAL values.
pub type DbId = i64;

/// Every timestamp in the system is UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
