//! Typed filter for the admin user listing.

use std::str::FromStr;

use pagination::{PageRequest, Pagination};

use super::{UserStatus, UserSummary, UserValidationError};

/// Longest accepted search term, in characters.
pub const SEARCH_MAX: usize = 100;

/// Status restriction applied to the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No restriction.
    #[default]
    All,
    /// Only users with the given status.
    Only(UserStatus),
}

impl FromStr for StatusFilter {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

/// Case-insensitive literal substring matched against name or email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

/// Errors raised while building a [`SearchTerm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search must be at most {max} characters")]
pub struct SearchTermTooLong {
    /// Longest accepted term.
    pub max: usize,
}

impl SearchTerm {
    /// Trim the raw term; blank input means "no search".
    pub fn parse(raw: &str) -> Result<Option<Self>, SearchTermTooLong> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > SEARCH_MAX {
            return Err(SearchTermTooLong { max: SEARCH_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Raw term without any pattern syntax.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SQL `LIKE` pattern matching the term as a literal substring.
    ///
    /// `%`, `_` and `\` are escaped with a backslash, the default escape
    /// character for PostgreSQL `LIKE`/`ILIKE`.
    ///
    /// # Examples
    /// ```
    /// use landing_backend::domain::SearchTerm;
    ///
    /// let term = SearchTerm::parse("50%_off").unwrap().unwrap();
    /// assert_eq!(term.like_pattern(), "%50\\%\\_off%");
    /// ```
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// Validated listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListFilter {
    /// Page window.
    pub page: PageRequest,
    /// Optional substring search.
    pub search: Option<SearchTerm>,
    /// Status restriction.
    pub status: StatusFilter,
}

/// One page of the admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Users on this page, newest first.
    pub users: Vec<UserSummary>,
    /// Page envelope; `total` counts the whole filter.
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("all", StatusFilter::All)]
    #[case("active", StatusFilter::Only(UserStatus::Active))]
    #[case("banned", StatusFilter::Only(UserStatus::Banned))]
    fn parses_status_filter(#[case] raw: &str, #[case] expected: StatusFilter) {
        assert_eq!(raw.parse::<StatusFilter>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_status_filter() {
        assert!("ALL".parse::<StatusFilter>().is_err());
    }

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case(" ann ", Some("ann"))]
    fn blank_search_is_absent(#[case] raw: &str, #[case] expected: Option<&str>) {
        let term = SearchTerm::parse(raw).expect("valid term");
        assert_eq!(term.as_ref().map(SearchTerm::as_str), expected);
    }

    #[rstest]
    fn rejects_overlong_search() {
        let raw = "a".repeat(SEARCH_MAX + 1);
        assert_eq!(
            SearchTerm::parse(&raw),
            Err(SearchTermTooLong { max: SEARCH_MAX })
        );
    }

    #[rstest]
    #[case("ann", "%ann%")]
    #[case("a_b", "%a\\_b%")]
    #[case("100%", "%100\\%%")]
    #[case("c:\\dir", "%c:\\\\dir%")]
    fn like_pattern_escapes_metacharacters(#[case] raw: &str, #[case] expected: &str) {
        let term = SearchTerm::parse(raw)
            .expect("valid term")
            .expect("non-blank term");
        assert_eq!(term.like_pattern(), expected);
    }
}
