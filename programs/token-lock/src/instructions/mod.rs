pub mod initialize;
pub mod deposit;
pub mod unlock;
pub mod cancel;

pub use initialize::*;
pub use deposit::*;
pub use unlock::*;
pub use cancel::*;
