//! Auth service clients

pub mod profile;

pub use profile::HttpProfileClient;
