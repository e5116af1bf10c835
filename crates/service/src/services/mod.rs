//! Catalog use cases, one zero-sized service per entity.

mod character_service;
mod genre_service;
mod movie_service;

pub use character_service::CharacterService;
pub use genre_service::GenreService;
pub use movie_service::MovieService;
