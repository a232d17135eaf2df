//! MongoDB implementation of the admin command port.

pub mod admin;
pub mod mapping;

pub use admin::MongoAdmin;
