pub mod uuid;

pub use self::uuid::{UuidPair, ValidatedUuid};
