//! Integration tests for tombstones.
//!
//! A soft-deleted row must disappear from every read path (lookup by id,
//! lookup by name, listings, enriched relation ids) while its join rows are
//! kept, and must reappear unchanged after a restore.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use cinecat_core::criteria::{CharacterCriteria, MovieCriteria};
use cinecat_core::error::CoreError;
use cinecat_core::pagination::PageRequest;
use cinecat_db::models::character::CreateCharacter;
use cinecat_db::models::genre::CreateGenre;
use cinecat_db::models::movie::{CreateMovie, UpdateMovie};
use cinecat_db::repositories::{CharacterRepo, GenreRepo, MovieRepo};
use cinecat_db::DbError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_character(name: &str) -> CreateCharacter {
    CreateCharacter {
        name: name.to_string(),
        age: 12,
        weight: 40.0,
        history: None,
        movie_ids: vec![],
    }
}

fn new_genre(name: &str) -> CreateGenre {
    CreateGenre {
        name: name.to_string(),
    }
}

fn new_movie(title: &str, genre_id: i64) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        creation_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
        rate: 5,
        genre_id,
        character_ids: vec![],
    }
}

fn first_page() -> PageRequest {
    PageRequest::new(0, 10).unwrap()
}

// ---------------------------------------------------------------------------
// Test: deleted rows vanish from every read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_character_is_invisible(pool: PgPool) {
    let created = CharacterRepo::create(&pool, &new_character("Ghost"))
        .await
        .unwrap();
    let id = created.character.id;

    assert!(CharacterRepo::soft_delete(&pool, id).await.unwrap());

    assert!(CharacterRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(CharacterRepo::find_by_name(&pool, "Ghost").await.unwrap().is_none());
    assert!(CharacterRepo::find_by_id_with_movies(&pool, id)
        .await
        .unwrap()
        .is_none());

    let listing = CharacterRepo::list(&pool, &CharacterCriteria::default(), first_page())
        .await
        .unwrap();
    assert_eq!(listing.total_elements, 0);
    assert_eq!(listing.total_pages, 0);

    // The row itself is still there.
    let deleted: bool = sqlx::query_scalar("SELECT deleted FROM characters WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(deleted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_movie_and_genre_leave_listings(pool: PgPool) {
    let kept_genre = GenreRepo::create(&pool, &new_genre("Western")).await.unwrap();
    let gone_genre = GenreRepo::create(&pool, &new_genre("Serial")).await.unwrap();
    let kept = MovieRepo::create(&pool, &new_movie("Rio Bravo", kept_genre.id))
        .await
        .unwrap();
    let gone = MovieRepo::create(&pool, &new_movie("Rio Lobo", kept_genre.id))
        .await
        .unwrap();

    assert!(MovieRepo::soft_delete(&pool, gone.movie.id).await.unwrap());
    assert!(GenreRepo::soft_delete(&pool, gone_genre.id).await.unwrap());

    let movies = MovieRepo::list(&pool, &MovieCriteria::default(), first_page())
        .await
        .unwrap();
    let movie_ids: Vec<_> = movies.content.iter().map(|m| m.id).collect();
    assert_eq!(movie_ids, vec![kept.movie.id]);
    assert_eq!(movies.total_elements, 1);

    let by_title = MovieRepo::list(&pool, &MovieCriteria::default().with_title("Rio"), first_page())
        .await
        .unwrap();
    assert_eq!(by_title.total_elements, 1);
    assert!(MovieRepo::find_by_title(&pool, "Rio Lobo").await.unwrap().is_none());

    let genres = GenreRepo::list(&pool).await.unwrap();
    let genre_ids: Vec<_> = genres.iter().map(|g| g.id).collect();
    assert_eq!(genre_ids, vec![kept_genre.id]);
    assert!(GenreRepo::find_by_id(&pool, gone_genre.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_twice_reports_false(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("Thriller")).await.unwrap();
    let movie = MovieRepo::create(&pool, &new_movie("Se7en", genre.id))
        .await
        .unwrap();

    assert!(MovieRepo::soft_delete(&pool, movie.movie.id).await.unwrap());
    assert!(!MovieRepo::soft_delete(&pool, movie.movie.id).await.unwrap());
    assert!(!MovieRepo::soft_delete(&pool, 123_456).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_on_deleted_row_returns_none(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("Thriller")).await.unwrap();
    let movie = MovieRepo::create(&pool, &new_movie("Se7en", genre.id))
        .await
        .unwrap();
    MovieRepo::soft_delete(&pool, movie.movie.id).await.unwrap();

    let update = UpdateMovie {
        rate: Some(1),
        ..Default::default()
    };
    let result = MovieRepo::update(&pool, movie.movie.id, &update).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_brings_row_and_links_back(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("Fantasy")).await.unwrap();
    let movie = MovieRepo::create(&pool, &new_movie("Willow", genre.id))
        .await
        .unwrap();
    let mut input = new_character("Madmartigan");
    input.movie_ids = vec![movie.movie.id];
    let character = CharacterRepo::create(&pool, &input).await.unwrap();

    MovieRepo::soft_delete(&pool, movie.movie.id).await.unwrap();
    let hidden = CharacterRepo::find_by_id_with_movies(&pool, character.character.id)
        .await
        .unwrap()
        .unwrap();
    assert!(hidden.movie_ids.is_empty());

    assert!(MovieRepo::restore(&pool, movie.movie.id).await.unwrap());
    assert!(!MovieRepo::restore(&pool, movie.movie.id).await.unwrap());

    let restored = MovieRepo::find_by_id(&pool, movie.movie.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restored.title, "Willow");

    let visible = CharacterRepo::find_by_id_with_movies(&pool, character.character.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(visible.movie_ids, vec![movie.movie.id]);
}

// ---------------------------------------------------------------------------
// Test: names are only reserved by live rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_name_can_be_reused(pool: PgPool) {
    let old = GenreRepo::create(&pool, &new_genre("Musical")).await.unwrap();
    GenreRepo::soft_delete(&pool, old.id).await.unwrap();

    let new = GenreRepo::create(&pool, &new_genre("Musical")).await.unwrap();
    assert_ne!(old.id, new.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_live_name_is_already_exists(pool: PgPool) {
    CharacterRepo::create(&pool, &new_character("Twin"))
        .await
        .unwrap();
    let result = CharacterRepo::create(&pool, &new_character("Twin")).await;
    assert_matches!(
        result,
        Err(DbError::Core(CoreError::AlreadyExists { entity: "Character", ref name })) if name == "Twin"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_conflicting_name_is_already_exists(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("War")).await.unwrap();
    let original = MovieRepo::create(&pool, &new_movie("Platoon", genre.id))
        .await
        .unwrap();
    MovieRepo::soft_delete(&pool, original.movie.id).await.unwrap();
    MovieRepo::create(&pool, &new_movie("Platoon", genre.id))
        .await
        .unwrap();

    let result = MovieRepo::restore(&pool, original.movie.id).await;
    assert_matches!(
        result,
        Err(DbError::Core(CoreError::AlreadyExists { entity: "Movie", .. }))
    );
    assert!(MovieRepo::find_by_id(&pool, original.movie.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: a tombstoned genre detaches its movies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_genre_reads_as_absent_on_movies(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("Sports")).await.unwrap();
    let movie = MovieRepo::create(&pool, &new_movie("Rocky", genre.id))
        .await
        .unwrap();
    assert_eq!(movie.movie.genre_id, Some(genre.id));

    GenreRepo::soft_delete(&pool, genre.id).await.unwrap();

    let reloaded = MovieRepo::find_by_id(&pool, movie.movie.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.genre_id, None);

    let by_genre = MovieRepo::list(&pool, &MovieCriteria::default().with_genre(genre.id), first_page())
        .await
        .unwrap();
    assert_eq!(by_genre.total_elements, 0);

    let all = MovieRepo::list(&pool, &MovieCriteria::default(), first_page())
        .await
        .unwrap();
    assert_eq!(all.total_elements, 1);

    GenreRepo::restore(&pool, genre.id).await.unwrap();
    let reattached = MovieRepo::find_by_id(&pool, movie.movie.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reattached.genre_id, Some(genre.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_movie_cannot_reference_deleted_genre(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("Gone")).await.unwrap();
    GenreRepo::soft_delete(&pool, genre.id).await.unwrap();

    let result = MovieRepo::create(&pool, &new_movie("Nowhere", genre.id)).await;
    assert_matches!(
        result,
        Err(DbError::Core(CoreError::NotFound { entity: "Genre", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_genre_movie_ids_skip_deleted_movies(pool: PgPool) {
    let genre = GenreRepo::create(&pool, &new_genre("Horror")).await.unwrap();
    let kept = MovieRepo::create(&pool, &new_movie("Halloween", genre.id))
        .await
        .unwrap();
    let dropped = MovieRepo::create(&pool, &new_movie("Scream", genre.id))
        .await
        .unwrap();
    MovieRepo::soft_delete(&pool, dropped.movie.id).await.unwrap();

    let enriched = GenreRepo::find_by_id_with_movies(&pool, genre.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enriched.movie_ids, vec![kept.movie.id]);
}
