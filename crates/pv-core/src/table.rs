//! Client-side helpers behind the admin user table.
//!
//! The backend returns the complete user list; narrowing, ordering and
//! paging all happen here, on every render, in that order.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    user::{Role, UserRecord},
};

/// Rows shown per table page.
pub const ITEMS_PER_PAGE: usize = 10;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "username")]
    Username,
    #[serde(rename = "user_role")]
    Role,
    #[serde(rename = "created_at")]
    CreatedAt,
    #[serde(rename = "lastlogged_in")]
    LastLoggedIn,
}

impl SortField {
    /// Every column, in table order.
    pub const ALL: [Self; 4] = [
        Self::Username,
        Self::Role,
        Self::CreatedAt,
        Self::LastLoggedIn,
    ];

    /// Name of the backing field in the wire record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Role => "user_role",
            Self::CreatedAt => "created_at",
            Self::LastLoggedIn => "lastlogged_in",
        }
    }

    const fn is_timestamp(self) -> bool {
        matches!(self, Self::CreatedAt | Self::LastLoggedIn)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "username" => Ok(Self::Username),
            "role" | "user_role" => Ok(Self::Role),
            "created_at" | "created" => Ok(Self::CreatedAt),
            "lastlogged_in" | "last_logged_in" | "last_login" => Ok(Self::LastLoggedIn),
            _ => Err(CoreError::unknown("sort field", s)),
        }
    }
}

/// Direction applied to the sort comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(CoreError::unknown("sort direction", s)),
        }
    }
}

/// Current sort column and direction of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column header activation: the same column flips direction, a new
    /// column starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.reversed();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

impl Default for SortSpec {
    /// Newest accounts first.
    fn default() -> Self {
        Self::new(SortField::CreatedAt, SortDirection::Descending)
    }
}

/// Role select above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    #[default]
    All,
    Admin,
    Normal,
}

impl RoleFilter {
    pub const fn matches(self, role: Role) -> bool {
        match self {
            Self::All => true,
            Self::Admin => matches!(role, Role::Admin),
            Self::Normal => matches!(role, Role::Normal),
        }
    }
}

impl From<Role> for RoleFilter {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Normal => Self::Normal,
        }
    }
}

impl FromStr for RoleFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "admin" => Ok(Self::Admin),
            "normal" => Ok(Self::Normal),
            _ => Err(CoreError::unknown("role filter", s)),
        }
    }
}

/// Status select above the table; status follows `login_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Blocked,
}

impl StatusFilter {
    pub const fn matches(self, login_attempts: u32) -> bool {
        match self {
            Self::All => true,
            Self::Active => login_attempts == 0,
            Self::Blocked => login_attempts > 0,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            _ => Err(CoreError::unknown("status filter", s)),
        }
    }
}

/// Search box plus the two filter selects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub search_text: String,
    pub role: RoleFilter,
    pub status: StatusFilter,
}

impl FilterSpec {
    pub fn matches(&self, record: &UserRecord) -> bool {
        matches_search(record, &self.search_text.to_lowercase())
            && self.role.matches(record.role)
            && self.status.matches(record.login_attempts)
    }
}

/// `needle` must already be lowercased.
fn matches_search(record: &UserRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.username.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
}

/// Keep the records passing the search, role and status tests, in input order.
pub fn filter_users(
    records: &[UserRecord],
    search_text: &str,
    role: RoleFilter,
    status: StatusFilter,
) -> Vec<UserRecord> {
    let needle = search_text.to_lowercase();
    records
        .iter()
        .filter(|r| {
            matches_search(r, &needle) && role.matches(r.role) && status.matches(r.login_attempts)
        })
        .cloned()
        .collect()
}

/// Compare two records on one column, ascending.
pub fn compare_by(a: &UserRecord, b: &UserRecord, field: SortField) -> Ordering {
    if field.is_timestamp() {
        return match field {
            SortField::CreatedAt => a.created_instant().cmp(&b.created_instant()),
            _ => a.last_logged_in_instant().cmp(&b.last_logged_in_instant()),
        };
    }

    let text = |r: &UserRecord| match field {
        SortField::Role => r.role.as_str().to_string(),
        _ => r.username.to_lowercase(),
    };
    text(a).cmp(&text(b))
}

/// Return a sorted copy of `records`.
///
/// The sort is stable and `Descending` reverses the comparator rather than
/// the output, so records with equal keys keep their input order either way.
pub fn sort_users(
    records: &[UserRecord],
    field: SortField,
    direction: SortDirection,
) -> Vec<UserRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| direction.apply(compare_by(a, b, field)));
    sorted
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Records on this page, at most [`ITEMS_PER_PAGE`].
    pub items: Vec<T>,
    /// 1-based, always within `1..=total_pages`
    pub page: usize,
    /// At least 1, even for an empty list
    pub total_pages: usize,
    /// Records across all pages.
    pub total_items: usize,
}

impl<T> Page<T> {
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice out page `page` (1-based) of `ITEMS_PER_PAGE` items, clamping
/// out-of-range requests to the first or last page.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(ITEMS_PER_PAGE).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * ITEMS_PER_PAGE;
    let end = (start + ITEMS_PER_PAGE).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

/// UI state of the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTableView {
    pub filter: FilterSpec,
    pub sort: SortSpec,
    pub page: usize,
}

impl Default for UserTableView {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            page: 1,
        }
    }
}

impl UserTableView {
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
        self.page = 1;
    }

    pub const fn set_role_filter(&mut self, role: RoleFilter) {
        self.filter.role = role;
        self.page = 1;
    }

    pub const fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
        self.page = 1;
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub const fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Filtered and sorted records, before paging.
    pub fn visible(&self, records: &[UserRecord]) -> Vec<UserRecord> {
        let filtered = filter_users(
            records,
            &self.filter.search_text,
            self.filter.role,
            self.filter.status,
        );
        sort_users(&filtered, self.sort.field, self.sort.direction)
    }

    /// Filter, sort, then paginate.
    pub fn render(&self, records: &[UserRecord]) -> Page<UserRecord> {
        paginate(&self.visible(records), self.page)
    }
}
