//! Catalog services for characters, movies and genres.
//!
//! Services sit between callers and `cinecat_db` repositories. They trim and
//! validate input, reject duplicate names early, translate missing rows into
//! `NotFound` and emit structured `tracing` events.
//!
//! Any transport put in front of the services reports failures with
//! [`ServiceError::code`] and [`ServiceError::public_message`]; the latter
//! logs internal and database errors and never leaks their detail.

pub mod config;
pub mod error;
pub mod query;
pub mod services;

pub use config::{CatalogConfig, ConfigError};
pub use error::{ServiceError, ServiceResult};
pub use query::PageParams;
pub use services::{CharacterService, GenreService, MovieService};
