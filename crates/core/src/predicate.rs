//! Predicate builder for catalog listings.
//!
//! A [`Predicate`] is an ordered list of independent filter terms that are
//! ANDed together. Absent criteria contribute no term, so a single builder
//! covers every combination of filters. Terms are small tagged values: the
//! repository layer compiles them to SQL, and [`Predicate::matches`] gives
//! their reference semantics in memory.
//!
//! The soft-delete condition is deliberately not a term. It is applied by the
//! repository on every read and cannot be requested or removed via criteria.

use std::cmp::Ordering;

use crate::criteria::{non_blank, normalize_ids, validate_id, CharacterCriteria, MovieCriteria};
use crate::error::CoreError;
use crate::types::{Date, DbId};

/* --------------------------------------------------------------------------
Generic predicate
-------------------------------------------------------------------------- */

/// A single filter condition over some subject type.
pub trait Term {
    type Subject;

    /// Evaluate the condition against an in-memory subject.
    fn test(&self, subject: &Self::Subject) -> bool;

    /// Whether evaluating this term in SQL joins a to-many relation, which
    /// requires result de-duplication.
    fn fans_out(&self) -> bool {
        false
    }
}

/// Conjunction of terms plus a de-duplication flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate<T> {
    terms: Vec<T>,
    distinct: bool,
}

impl<T: Term> Predicate<T> {
    /// The empty conjunction: matches every (live) row.
    pub fn match_all() -> Self {
        Self {
            terms: Vec::new(),
            distinct: false,
        }
    }

    /// Append a term. Joining terms switch on `distinct`.
    pub fn and(mut self, term: T) -> Self {
        self.distinct |= term.fans_out();
        self.terms.push(term);
        self
    }

    /// Force result de-duplication regardless of terms.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn terms(&self) -> &[T] {
        &self.terms
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_match_all(&self) -> bool {
        self.terms.is_empty()
    }

    /// `true` when every term holds for `subject`.
    pub fn matches(&self, subject: &T::Subject) -> bool {
        self.terms.iter().all(|t| t.test(subject))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/* --------------------------------------------------------------------------
Characters
-------------------------------------------------------------------------- */

/// Filter terms available for characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterTerm {
    /// Case-insensitive substring match on the name.
    NameContains(String),
    /// Exact age.
    AgeEquals(i32),
    /// Related to at least one of these movies (sorted, unique).
    InAnyMovie(Vec<DbId>),
}

/// The fields a character term looks at.
#[derive(Debug, Clone, Default)]
pub struct CharacterSubject {
    pub name: String,
    pub age: i32,
    pub movie_ids: Vec<DbId>,
}

impl Term for CharacterTerm {
    type Subject = CharacterSubject;

    fn test(&self, subject: &CharacterSubject) -> bool {
        match self {
            CharacterTerm::NameContains(needle) => contains_ignore_case(&subject.name, needle),
            CharacterTerm::AgeEquals(age) => subject.age == *age,
            CharacterTerm::InAnyMovie(ids) => subject.movie_ids.iter().any(|m| ids.contains(m)),
        }
    }

    fn fans_out(&self) -> bool {
        matches!(self, CharacterTerm::InAnyMovie(_))
    }
}

/// Build the character predicate from sparse criteria.
///
/// Terms are emitted in the fixed order name, age, movies. Characters have
/// no implicit ordering.
pub fn build_character_predicate(
    criteria: &CharacterCriteria,
) -> Result<Predicate<CharacterTerm>, CoreError> {
    let mut predicate = Predicate::match_all();

    if let Some(name) = non_blank(criteria.name.as_deref()) {
        predicate = predicate.and(CharacterTerm::NameContains(name.to_string()));
    }

    if let Some(age) = criteria.age.filter(|a| *a > 0) {
        predicate = predicate.and(CharacterTerm::AgeEquals(age));
    }

    if let Some(ref ids) = criteria.movie_ids {
        let ids = normalize_ids("movie_ids", ids)?;
        if !ids.is_empty() {
            predicate = predicate.and(CharacterTerm::InAnyMovie(ids));
        }
    }

    Ok(predicate)
}

/* --------------------------------------------------------------------------
Movies
-------------------------------------------------------------------------- */

/// Filter terms available for movies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieTerm {
    /// Case-insensitive substring match on the title.
    TitleContains(String),
    /// Belongs to this (live) genre.
    GenreIs(DbId),
}

/// The fields a movie term or ordering looks at.
#[derive(Debug, Clone)]
pub struct MovieSubject {
    pub id: DbId,
    pub title: String,
    /// `None` when the genre is missing or tombstoned.
    pub genre_id: Option<DbId>,
    pub creation_date: Date,
}

impl Term for MovieTerm {
    type Subject = MovieSubject;

    fn test(&self, subject: &MovieSubject) -> bool {
        match self {
            MovieTerm::TitleContains(needle) => contains_ignore_case(&subject.title, needle),
            MovieTerm::GenreIs(id) => subject.genre_id == Some(*id),
        }
    }
}

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `"ASC"` in any case, blank or absent means ascending. Any other value
    /// means descending.
    pub fn from_param(param: Option<&str>) -> Self {
        match non_blank(param) {
            None => SortDirection::Asc,
            Some(p) if p.eq_ignore_ascii_case("ASC") => SortDirection::Asc,
            Some(_) => SortDirection::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sortable movie columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreationDate,
}

/// Ordering clause attached to every movie listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn by_creation_date(direction: SortDirection) -> Self {
        Self {
            key: SortKey::CreationDate,
            direction,
        }
    }

    /// Compare two movies. Ties on the key fall back to ascending id so
    /// pagination is stable.
    pub fn compare(&self, a: &MovieSubject, b: &MovieSubject) -> Ordering {
        let primary = match self.key {
            SortKey::CreationDate => a.creation_date.cmp(&b.creation_date),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

/// Build the movie predicate and its mandatory ordering.
///
/// Terms are emitted in the fixed order title, genre. The predicate is
/// always `distinct` and the ordering is always present, even without
/// filters.
pub fn build_movie_predicate(
    criteria: &MovieCriteria,
) -> Result<(Predicate<MovieTerm>, SortOrder), CoreError> {
    let mut predicate = Predicate::match_all().distinct();

    if let Some(title) = non_blank(criteria.title.as_deref()) {
        predicate = predicate.and(MovieTerm::TitleContains(title.to_string()));
    }

    if let Some(genre_id) = criteria.genre_id {
        validate_id("genre", genre_id)?;
        predicate = predicate.and(MovieTerm::GenreIs(genre_id));
    }

    let order = SortOrder::by_creation_date(SortDirection::from_param(criteria.order.as_deref()));
    Ok((predicate, order))
}
