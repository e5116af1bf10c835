//! Filter criteria for character and movie listings.
//!
//! Criteria objects are sparse: every field is optional and an absent field
//! contributes no filter term. Blank strings and empty id lists are treated
//! exactly like absent fields.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Optional filters for the character listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CharacterCriteria {
    /// Case-insensitive substring of the character name.
    pub name: Option<String>,
    /// Exact age. Values `<= 0` are ignored.
    pub age: Option<i32>,
    /// Character must appear in at least one of these movies.
    pub movie_ids: Option<Vec<DbId>>,
}

impl CharacterCriteria {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_movie_ids(mut self, movie_ids: Vec<DbId>) -> Self {
        self.movie_ids = Some(movie_ids);
        self
    }
}

/// Optional filters plus sort order for the movie listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MovieCriteria {
    /// Case-insensitive substring of the movie title.
    pub title: Option<String>,
    /// Movie must belong to this genre.
    #[serde(rename = "genre")]
    pub genre_id: Option<DbId>,
    /// `"ASC"` (any case, the default) or anything else for descending.
    pub order: Option<String>,
}

impl MovieCriteria {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_genre(mut self, genre_id: DbId) -> Self {
        self.genre_id = Some(genre_id);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/* --------------------------------------------------------------------------
Normalisation helpers
-------------------------------------------------------------------------- */

/// Trim a text filter, mapping blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reject a non-positive id.
pub fn validate_id(field: &str, id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::InvalidArgument(format!(
            "{field} must be a positive id, got {id}"
        )));
    }
    Ok(())
}

/// Reject any non-positive id in `ids`, then return the ids sorted and
/// de-duplicated.
pub fn normalize_ids(field: &str, ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    for &id in ids {
        validate_id(field, id)?;
    }
    let mut out = ids.to_vec();
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  Frank ")), Some("Frank"));
    }

    #[test]
    fn non_blank_maps_whitespace_to_none() {
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn normalize_ids_sorts_and_dedups() {
        assert_eq!(normalize_ids("movie_ids", &[3, 1, 3, 2]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn normalize_ids_rejects_non_positive() {
        assert_matches!(
            normalize_ids("movie_ids", &[1, 0]),
            Err(CoreError::InvalidArgument(msg)) if msg.contains("movie_ids")
        );
        assert_matches!(
            normalize_ids("movie_ids", &[-4]),
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[test]
    fn builders_set_fields() {
        let c = CharacterCriteria::default()
            .with_name("Tom")
            .with_age(27)
            .with_movie_ids(vec![5]);
        assert_eq!(c.name.as_deref(), Some("Tom"));
        assert_eq!(c.age, Some(27));
        assert_eq!(c.movie_ids, Some(vec![5]));

        let m = MovieCriteria::default().with_title("x").with_genre(2).with_order("desc");
        assert_eq!(m.genre_id, Some(2));
        assert_eq!(m.order.as_deref(), Some("desc"));
    }
}
