pub mod patch;
pub mod response;

pub use patch::deserialize_some;
pub use response::ApiResponse;
