//! Query parameter helpers.
//!
//! [`QueryParams`] collects URL query pairs from optional values; the option
//! types in this module encode list pagination and delete flags with it.

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append using a mapping function when the value is present.
    pub fn push_opt_with<T, F>(&mut self, key: &'static str, value: Option<T>, mut map: F)
    where
        F: FnMut(T) -> String,
    {
        if let Some(value) = value {
            self.pairs.push((key, map(value)));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}

/// Pagination options accepted by every list endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Number of records per page.
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Options requesting a single page of the given size.
    #[must_use]
    pub const fn first_page(per_page: u32) -> Self {
        Self {
            page: Some(1),
            per_page: Some(per_page),
        }
    }

    /// Convert the options into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("page", self.page);
        params.push_opt("per_page", self.per_page);
        params.into_pairs()
    }
}

/// Flags accepted by delete endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Remove the resource even if the server would normally refuse.
    pub force: Option<bool>,
}

impl DeleteOptions {
    /// Convert the options into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt_with("force", self.force, |force| {
            String::from(if force { "1" } else { "0" })
        });
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("name", Option::<String>::None);
        params.push_opt("page", Some(2u32));
        assert_eq!(params.into_pairs(), vec![("page", "2".to_string())]);
    }

    #[test]
    fn push_opt_with_applies_mapper() {
        let mut params = QueryParams::new();
        params.push_opt_with("limit", Some(5u32), |v| format!("{v:02}"));
        assert_eq!(params.into_pairs(), vec![("limit", "05".to_string())]);
    }

    #[test]
    fn list_options_pairs() {
        assert!(ListOptions::default().to_pairs().is_empty());
        assert_eq!(
            ListOptions::first_page(100).to_pairs(),
            vec![("page", "1".to_string()), ("per_page", "100".to_string())]
        );
    }

    #[test]
    fn delete_options_force_flag() {
        let options = DeleteOptions { force: Some(true) };
        assert_eq!(options.to_pairs(), vec![("force", "1".to_string())]);
        assert!(DeleteOptions::default().to_pairs().is_empty());
    }
}
