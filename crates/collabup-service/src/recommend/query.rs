//! Free-text query parsing into keyword categories.

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Skills,
    Domains,
    Locations,
    Companies,
    Institutes,
    Roles,
    Experience,
    Projects,
    General,
}

impl Category {
    /// Categories in the order tokens are tested against them.
    pub const ALL: [Self; 9] = [
        Self::Skills,
        Self::Domains,
        Self::Locations,
        Self::Companies,
        Self::Institutes,
        Self::Roles,
        Self::Experience,
        Self::Projects,
        Self::General,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skills => "skills",
            Self::Domains => "domains",
            Self::Locations => "locations",
            Self::Companies => "companies",
            Self::Institutes => "institutes",
            Self::Roles => "roles",
            Self::Experience => "experience",
            Self::Projects => "projects",
            Self::General => "general",
        }
    }

    /// Trigger words for the category. `General` has none and catches the rest.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Skills => &[
                "skill", "technology", "tech", "programming", "language", "framework", "tool",
                "expertise", "proficient", "know", "learn", "master",
            ],
            Self::Domains => &[
                "domain", "field", "area", "industry", "sector", "vertical", "category", "type",
                "kind",
            ],
            Self::Locations => &[
                "location", "place", "city", "remote", "onsite", "hybrid", "bangalore", "mumbai",
                "delhi", "hyderabad", "chennai", "pune",
            ],
            Self::Companies => &[
                "company",
                "startup",
                "organization",
                "firm",
                "enterprise",
                "corporate",
                "google",
                "microsoft",
                "amazon",
                "meta",
                "apple",
            ],
            Self::Institutes => &[
                "college",
                "university",
                "institute",
                "iit",
                "nit",
                "bits",
                "school",
                "academy",
            ],
            Self::Roles => &[
                "role",
                "position",
                "job",
                "title",
                "designation",
                "professor",
                "mentor",
                "student",
                "developer",
                "engineer",
            ],
            Self::Experience => &[
                "experience",
                "years",
                "senior",
                "junior",
                "fresher",
                "expert",
                "beginner",
                "intermediate",
                "advanced",
            ],
            Self::Projects => &[
                "project",
                "work",
                "build",
                "develop",
                "create",
                "implement",
                "design",
                "research",
                "study",
            ],
            Self::General => &[],
        }
    }

    fn claims(self, token: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| keyword.contains(token) || token.contains(keyword))
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Query tokens grouped by category, each group in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedTokens {
    buckets: [Vec<String>; 9],
}

impl CategorizedTokens {
    #[must_use]
    pub fn get(&self, category: Category) -> &[String] {
        &self.buckets[category.index()]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn tokens(&self) -> impl Iterator<Item = (Category, &str)> {
        Category::ALL.into_iter().flat_map(move |category| {
            self.get(category)
                .iter()
                .map(move |token| (category, token.as_str()))
        })
    }
}

impl Serialize for CategorizedTokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for category in Category::ALL {
            map.serialize_entry(category.as_str(), self.get(category))?;
        }
        map.end()
    }
}

/// ## Summary
/// Lowercases the query, splits it on `;`, `,` and whitespace, drops one-character
/// tokens and files each token under the first category whose keywords overlap it.
#[must_use]
pub fn parse_query(query: &str) -> CategorizedTokens {
    let mut parsed = CategorizedTokens::default();

    let lowered = query.to_lowercase();
    let tokens = lowered
        .split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .filter(|token| token.chars().count() > 1);

    for token in tokens {
        let category = Category::ALL
            .into_iter()
            .find(|category| category.claims(token))
            .unwrap_or(Category::General);
        parsed.buckets[category.index()].push(token.to_string());
    }

    parsed
}
