pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod paths;
pub mod profile;
pub mod profile_item;
pub mod profiles;
pub mod tree;
pub mod version;
pub mod viewport;

pub use error::{ConsoleError, Result};
