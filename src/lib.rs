pub mod config;
pub mod clock;
pub mod enums;
pub mod error;
pub mod db;
pub mod providers;
pub mod clients;
pub mod services;
pub mod api;
pub mod scheduler;
pub mod seed;

pub use config::Config;
pub use enums::{ Category, Priority, SourceKind };
pub use error::{ AppError, Result };
