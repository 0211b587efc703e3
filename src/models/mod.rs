pub mod context;
pub mod criteria;

pub use self::context::*;
pub use self::criteria::*;
