#![allow(dead_code)]

use chrono::NaiveDate;
use cinecat_db::models::character::CreateCharacter;
use cinecat_db::models::genre::CreateGenre;
use cinecat_db::models::movie::CreateMovie;
use cinecat_service::CatalogConfig;

/// Build a test `CatalogConfig` with the documented defaults. The URL is
/// unused because `#[sqlx::test]` hands each test its own pool.
pub fn test_config() -> CatalogConfig {
    CatalogConfig {
        database_url: "postgres://localhost/cinecat_test".to_string(),
        max_connections: 5,
        default_page_size: 10,
        run_migrations: true,
    }
}

pub fn genre(name: &str) -> CreateGenre {
    CreateGenre {
        name: name.to_string(),
    }
}

pub fn character(name: &str, age: i32) -> CreateCharacter {
    CreateCharacter {
        name: name.to_string(),
        age,
        weight: 65.0,
        history: None,
        movie_ids: vec![],
    }
}

pub fn movie(title: &str, genre_id: i64, year: i32) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        creation_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
        rate: 4,
        genre_id,
        character_ids: vec![],
    }
}
