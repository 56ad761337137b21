pub mod ids;
pub mod value;

pub use ids::{BandId, FunctionName, GroupInstanceId, GroupName};
pub use value::Value;
