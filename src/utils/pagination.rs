use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    /// Unknown names fall back to `CreatedAt`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("updatedAt") | Some("updated_at") => SortField::UpdatedAt,
            Some("title") => SortField::Title,
            _ => SortField::CreatedAt,
        }
    }

    /// Stored document field name.
    pub fn field_name(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only an explicit `asc` sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(order) if order.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Raw listing query. Every field is kept as text so a malformed value
/// degrades to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort: SortField,
    pub order: SortOrder,
}

impl PageRequest {
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl From<&ListQuery> for PageRequest {
    fn from(query: &ListQuery) -> Self {
        PageRequest {
            page: positive_or(query.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(query.limit.as_deref(), DEFAULT_LIMIT),
            sort: SortField::parse(query.sort_by.as_deref()),
            order: SortOrder::parse(query.order.as_deref()),
        }
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(default)
}
