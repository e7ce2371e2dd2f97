pub mod driver_manager;
pub mod error;
pub mod models;
pub mod transaction;
pub mod udbc;
pub mod udbc_sqlanywhere;
