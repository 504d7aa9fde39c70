pub mod load_profile_service;

pub use load_profile_service::{LoadProfileError, LoadProfileService};
