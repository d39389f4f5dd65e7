//! Shop catalogue read model and search criteria.

use serde::Serialize;
use utoipa::ToSchema;

use super::user::UserId;

/// Budget searches match shops up to the requested amount plus this buffer.
///
/// Inherited business rule: a shopper asking for a 2000-yen budget is shown
/// shops up to 3000 yen. Kept literal pending product clarification.
pub const BUDGET_BUFFER: i32 = 1000;

/// Stable shop identifier from the read-only catalogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema,
)]
#[serde(transparent)]
pub struct ShopId(i32);

impl ShopId {
    /// Wrap a raw catalogue id.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Access the raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ShopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ShopId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// Catalogue entry. Immutable from the application's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Catalogue identifier.
    pub shop_id: ShopId,
    /// Shop display name.
    pub shop_name: String,
    /// Single category tag.
    pub genre: String,
    /// Typical budget in integer currency units.
    pub budget: i32,
    /// Distance from the reference point in metres.
    pub distance: i32,
    /// Photo URL.
    pub photo_address: String,
    /// Street address.
    pub address: String,
    /// Map link.
    pub google_map_link: String,
}

/// Search result entry: a catalogue row plus the caller's favorite flag.
///
/// `is_favorite` is only meaningful when the search carried a user id; for
/// anonymous searches it is always `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopSearchHit {
    /// The matching catalogue entry.
    #[serde(flatten)]
    pub shop: Shop,
    /// Whether the searching user has favorited this shop.
    pub is_favorite: bool,
}

/// Distance filter buckets keyed by the legacy form codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceBand {
    /// Code `'2'`: within 500 m.
    Near,
    /// Code `'3'`: within 1000 m.
    Middle,
    /// Code `'4'`: within 3000 m.
    Far,
}

impl DistanceBand {
    /// Map a form code to a band. Unknown codes mean "no distance filter".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "2" => Some(Self::Near),
            "3" => Some(Self::Middle),
            "4" => Some(Self::Far),
            _ => None,
        }
    }

    /// Upper bound in metres for this band.
    pub const fn max_metres(self) -> i32 {
        match self {
            Self::Near => 500,
            Self::Middle => 1000,
            Self::Far => 3000,
        }
    }
}

/// Filter criteria for catalogue searches.
///
/// Absent fields are omitted from the predicate list entirely: a missing
/// genre filter matches all genres rather than `genre = ''`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopSearchCriteria {
    budget: Option<i32>,
    distance: Option<DistanceBand>,
    genres: Vec<String>,
    favorites_of: Option<UserId>,
}

impl ShopSearchCriteria {
    /// Criteria with no active predicates: matches the full catalogue.
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Restrict results to shops within the given budget (buffer applied).
    #[must_use]
    pub fn with_budget(mut self, budget: i32) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Restrict results to shops within the given distance band.
    #[must_use]
    pub fn with_distance(mut self, band: DistanceBand) -> Self {
        self.distance = Some(band);
        self
    }

    /// Restrict results to shops whose genre is one of `genres`.
    ///
    /// Blank entries are discarded; an empty list leaves the genre
    /// predicate inactive.
    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres
            .into_iter()
            .map(Into::into)
            .map(|genre| genre.trim().to_owned())
            .filter(|genre| !genre.is_empty())
            .collect();
        self
    }

    /// Parse a comma-separated genre string as sent by the legacy form.
    #[must_use]
    pub fn with_genre_list(self, raw: &str) -> Self {
        self.with_genres(raw.split(','))
    }

    /// Annotate results with the given user's favorites.
    #[must_use]
    pub fn with_favorites_of(mut self, user_id: UserId) -> Self {
        self.favorites_of = Some(user_id);
        self
    }

    /// Inclusive budget ceiling with [`BUDGET_BUFFER`] applied.
    pub fn budget_ceiling(&self) -> Option<i32> {
        self.budget.map(|budget| budget.saturating_add(BUDGET_BUFFER))
    }

    /// Active distance band, if any.
    pub const fn distance(&self) -> Option<DistanceBand> {
        self.distance
    }

    /// Active genre filter; empty means "all genres".
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// User whose favorites annotate the results, if authenticated.
    pub const fn favorites_of(&self) -> Option<UserId> {
        self.favorites_of
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2", Some(DistanceBand::Near))]
    #[case("3", Some(DistanceBand::Middle))]
    #[case("4", Some(DistanceBand::Far))]
    #[case("", None)]
    #[case("1", None)]
    #[case("anything", None)]
    fn distance_codes_map_to_bands(#[case] code: &str, #[case] expected: Option<DistanceBand>) {
        assert_eq!(DistanceBand::from_code(code), expected);
    }

    #[rstest]
    #[case(DistanceBand::Near, 500)]
    #[case(DistanceBand::Middle, 1000)]
    #[case(DistanceBand::Far, 3000)]
    fn bands_bound_distance_in_metres(#[case] band: DistanceBand, #[case] metres: i32) {
        assert_eq!(band.max_metres(), metres);
    }

    #[rstest]
    fn budget_ceiling_applies_the_buffer() {
        let criteria = ShopSearchCriteria::unfiltered().with_budget(2000);
        assert_eq!(criteria.budget_ceiling(), Some(3000));
    }

    #[rstest]
    fn unfiltered_criteria_have_no_predicates() {
        let criteria = ShopSearchCriteria::unfiltered();
        assert_eq!(criteria.budget_ceiling(), None);
        assert_eq!(criteria.distance(), None);
        assert!(criteria.genres().is_empty());
        assert_eq!(criteria.favorites_of(), None);
    }

    #[rstest]
    #[case("A,B", &["A", "B"])]
    #[case(" A , B ", &["A", "B"])]
    #[case("A,,B,", &["A", "B"])]
    #[case("", &[])]
    fn genre_lists_are_split_and_cleaned(#[case] raw: &str, #[case] expected: &[&str]) {
        let criteria = ShopSearchCriteria::unfiltered().with_genre_list(raw);
        assert_eq!(criteria.genres(), expected);
    }
}
