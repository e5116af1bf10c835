//! Compilation of `cinecat_core::predicate` terms into SQL.
//!
//! Each term becomes one condition (and possibly one join) with positional
//! bind parameters, in the order the predicate lists its terms. The
//! soft-delete guard is always the first condition, and joined tables carry
//! their own live-row condition in the `ON` clause.

use cinecat_core::predicate::{CharacterTerm, MovieTerm, Predicate, SortKey, SortOrder};

use crate::soft_delete::SoftDeleteGuard;

/// Typed bind value for dynamically-built listing queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Int(i32),
    Text(String),
    BigIntArray(Vec<i64>),
}

/// SQL fragments for one filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    /// Root table with alias, e.g. `characters c`.
    pub from: &'static str,
    /// Join clauses, in order.
    pub joins: Vec<String>,
    /// `WHERE ...`, always including the live-row guard.
    pub where_clause: String,
    pub binds: Vec<BindValue>,
    pub distinct: bool,
    /// Index of the next free `$n` placeholder.
    pub next_bind_idx: u32,
}

impl CompiledFilter {
    /// `SELECT [DISTINCT] {columns} ... {order_by} LIMIT $n OFFSET $n+1`.
    pub fn select_page(&self, columns: &str, order_by: &str) -> String {
        format!(
            "SELECT {distinct}{columns} FROM {from}{joins} {where_clause} {order_by} \
             LIMIT ${limit} OFFSET ${offset}",
            distinct = if self.distinct { "DISTINCT " } else { "" },
            from = self.from,
            joins = self.join_sql(),
            where_clause = self.where_clause,
            limit = self.next_bind_idx,
            offset = self.next_bind_idx + 1,
        )
    }

    /// `SELECT COUNT(DISTINCT {key}) ...` over the full match.
    pub fn count(&self, key: &str) -> String {
        format!(
            "SELECT COUNT(DISTINCT {key})::BIGINT FROM {from}{joins} {where_clause}",
            from = self.from,
            joins = self.join_sql(),
            where_clause = self.where_clause,
        )
    }

    fn join_sql(&self) -> String {
        self.joins.iter().map(|j| format!(" {j}")).collect()
    }
}

/// Wrap a user substring as an `ILIKE` pattern, matching `%`, `_` and `\`
/// literally.
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Compile a character predicate against `characters c`.
pub fn compile_character_filter(predicate: &Predicate<CharacterTerm>) -> CompiledFilter {
    let mut joins = Vec::new();
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    let mut bind_idx = 1u32;

    for term in predicate.terms() {
        match term {
            CharacterTerm::NameContains(name) => {
                conditions.push(format!("c.name ILIKE ${bind_idx}"));
                binds.push(BindValue::Text(like_pattern(name)));
            }
            CharacterTerm::AgeEquals(age) => {
                conditions.push(format!("c.age = ${bind_idx}"));
                binds.push(BindValue::Int(*age));
            }
            CharacterTerm::InAnyMovie(ids) => {
                joins.push("INNER JOIN rel_movie_character rmc ON rmc.character_id = c.id".into());
                joins.push(format!(
                    "INNER JOIN movies fm ON fm.id = rmc.movie_id AND {}",
                    SoftDeleteGuard::live("fm")
                ));
                conditions.push(format!("rmc.movie_id = ANY(${bind_idx})"));
                binds.push(BindValue::BigIntArray(ids.clone()));
            }
        }
        bind_idx += 1;
    }

    CompiledFilter {
        from: "characters c",
        joins,
        where_clause: SoftDeleteGuard::where_clause("c", &conditions),
        binds,
        distinct: predicate.is_distinct(),
        next_bind_idx: bind_idx,
    }
}

/// Join that resolves a movie's genre. Tombstoned genres resolve to NULL.
pub fn movie_genre_join() -> String {
    format!(
        "LEFT JOIN genres g ON g.id = m.genre_id AND {}",
        SoftDeleteGuard::live("g")
    )
}

/// Compile a movie predicate against `movies m`.
///
/// The genre left join is always present because the selected `genre_id` is
/// read through it.
pub fn compile_movie_filter(predicate: &Predicate<MovieTerm>) -> CompiledFilter {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    let mut bind_idx = 1u32;

    for term in predicate.terms() {
        match term {
            MovieTerm::TitleContains(title) => {
                conditions.push(format!("m.title ILIKE ${bind_idx}"));
                binds.push(BindValue::Text(like_pattern(title)));
            }
            MovieTerm::GenreIs(genre_id) => {
                conditions.push(format!("g.id = ${bind_idx}"));
                binds.push(BindValue::BigInt(*genre_id));
            }
        }
        bind_idx += 1;
    }

    CompiledFilter {
        from: "movies m",
        joins: vec![movie_genre_join()],
        where_clause: SoftDeleteGuard::where_clause("m", &conditions),
        binds,
        distinct: predicate.is_distinct(),
        next_bind_idx: bind_idx,
    }
}

/// `ORDER BY` for a movie listing, with id as the stable tie-breaker.
pub fn movie_order_by(order: &SortOrder) -> String {
    let column = match order.key {
        SortKey::CreationDate => "m.creation_date",
    };
    format!("ORDER BY {column} {}, m.id ASC", order.direction.as_sql())
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub(crate) fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub(crate) fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::BigIntArray(v) => q = q.bind(v.as_slice()),
        }
    }
    q
}
