pub mod conf;
pub mod core;
pub mod io;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

#[cfg(feature = "testutil")]
pub mod testutil;
