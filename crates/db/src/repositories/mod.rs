//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Reads never return tombstoned
//! rows.

pub mod character_repo;
pub mod filtered_repo;
pub mod genre_repo;
pub mod movie_character_repo;
pub mod movie_repo;

pub use character_repo::CharacterRepo;
pub use filtered_repo::FilteredRepository;
pub use genre_repo::GenreRepo;
pub use movie_character_repo::MovieCharacterRepo;
pub use movie_repo::MovieRepo;
