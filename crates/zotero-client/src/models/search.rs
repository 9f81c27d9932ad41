//! Search parameters for item queries.

/// Which fields a quick search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Match titles, creators and years (API default).
    #[default]
    TitleCreatorYear,
    /// Match all indexed fields including full text.
    Everything,
}

impl QueryMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TitleCreatorYear => "titleCreatorYear",
            Self::Everything => "everything",
        }
    }
}

/// Sort field for result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    DateModified,
    DateAdded,
    Title,
    Creator,
    Date,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateModified => "dateModified",
            Self::DateAdded => "dateAdded",
            Self::Title => "title",
            Self::Creator => "creator",
            Self::Date => "date",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for an item search.
///
/// The tag filter's boolean syntax (`||` for union, leading `-` for
/// exclusion) belongs to the service and is passed through verbatim.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub query_mode: QueryMode,
    pub item_type: Option<String>,
    pub tag: Option<String>,
    pub sort: SortField,
    pub direction: SortDirection,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl SearchParams {
    /// Search with default mode (title/creator/year), sorted by
    /// modification date descending.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    #[must_use]
    pub fn query_mode(mut self, mode: QueryMode) -> Self {
        self.query_mode = mode;
        self
    }

    #[must_use]
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: SortField, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    #[must_use]
    pub const fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}
