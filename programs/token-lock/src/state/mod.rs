pub mod permission;
pub mod vault;

pub use permission::*;
pub use vault::*;
