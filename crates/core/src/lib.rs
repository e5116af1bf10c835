//! Pure catalog logic with no I/O.
//!
//! Everything here is usable by the repository layer, the service layer and
//! tests alike: shared id types, the domain error, filter criteria and the
//! predicate builder, pagination math, and relation change sets.
//!
//! Predicates carry two evaluations of the same terms. `cinecat_db` compiles
//! them to SQL; [`predicate::Predicate::matches`] over
//! [`predicate::CharacterSubject`] / [`predicate::MovieSubject`], together
//! with [`predicate::SortOrder::compare`], evaluates them in memory. The
//! in-memory form is the reference the SQL compilation is checked against,
//! and lets callers filter already-loaded rows without a round trip.

pub mod criteria;
pub mod error;
pub mod pagination;
pub mod predicate;
pub mod relations;
pub mod types;
