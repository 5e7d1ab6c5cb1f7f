//! Sort state for server-side ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort direction, spelled the way the list endpoint expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    Ascend,
    /// Descending order (Z-A, 9-0).
    Descend,
}

impl SortOrder {
    /// Wire name of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascend => "ascend",
            SortOrder::Descend => "descend",
        }
    }

    /// Parses a wire name. Unknown values are treated as unsorted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ascend" | "asc" => Some(SortOrder::Ascend),
            "descend" | "desc" => Some(SortOrder::Descend),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The field and direction the grid is currently sorted by.
///
/// Either both parts are set or neither is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortState {
    field: Option<String>,
    order: Option<SortOrder>,
}

impl SortState {
    /// Unsorted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a sort state from optional parts; a missing part means unsorted.
    pub fn new(field: Option<String>, order: Option<SortOrder>) -> Self {
        match (field, order) {
            (Some(field), Some(order)) => Self {
                field: Some(field),
                order: Some(order),
            },
            _ => Self::none(),
        }
    }

    /// Ascending on `field`.
    pub fn ascend(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            order: Some(SortOrder::Ascend),
        }
    }

    /// Descending on `field`.
    pub fn descend(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            order: Some(SortOrder::Descend),
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    pub fn is_sorted(&self) -> bool {
        self.field.is_some()
    }

    /// The direction `field` is sorted in, if it is the sorted field.
    pub fn order_for(&self, field: &str) -> Option<SortOrder> {
        match self.field.as_deref() {
            Some(current) if current == field => self.order,
            _ => None,
        }
    }

    /// Next state after a header click on `field`.
    ///
    /// A different field starts ascending; the same field goes
    /// ascend → descend → unsorted.
    pub fn cycle(&self, field: &str) -> SortState {
        match self.order_for(field) {
            None => Self::ascend(field),
            Some(SortOrder::Ascend) => Self::descend(field),
            Some(SortOrder::Descend) => Self::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_same_field() {
        let sort = SortState::none().cycle("name");
        assert_eq!(sort, SortState::ascend("name"));

        let sort = sort.cycle("name");
        assert_eq!(sort, SortState::descend("name"));

        let sort = sort.cycle("name");
        assert_eq!(sort, SortState::none());
    }

    #[test]
    fn test_cycle_other_field_restarts_ascending() {
        let sort = SortState::descend("name").cycle("email");
        assert_eq!(sort.field(), Some("email"));
        assert_eq!(sort.order(), Some(SortOrder::Ascend));
    }

    #[test]
    fn test_new_requires_both_parts() {
        assert_eq!(
            SortState::new(Some("name".to_string()), None),
            SortState::none()
        );
        assert_eq!(SortState::new(None, Some(SortOrder::Ascend)), SortState::none());
    }

    #[test]
    fn test_parse() {
        assert_eq!(SortOrder::parse("ascend"), Some(SortOrder::Ascend));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Descend));
        assert_eq!(SortOrder::parse("sideways"), None);
    }
}
