//! Command implementations.

pub mod compare;
pub mod config;
pub mod reduce;

pub use self::compare::execute_compare;
pub use self::config::execute_config;
pub use self::reduce::execute_reduce;
