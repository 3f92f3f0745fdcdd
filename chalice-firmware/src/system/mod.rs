pub(crate) mod bluetooth;
pub(crate) mod config;
pub(crate) mod store;
