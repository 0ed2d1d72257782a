//! Search request model and client-input validation

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Years accepted for date filters. The upper end leaves room for the
/// exclusive `end + 1` bound.
pub const YEAR_RANGE: RangeInclusive<i32> = 1..=9998;

static SORT_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_@][A-Za-z0-9_@.]*$").expect("valid sort field pattern")
});

/// Structured keyword search over the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query
    pub term: String,
    /// Field to sort ascending by
    pub sort_by: Option<String>,
    pub content_type: Option<String>,
    pub provider_name: Option<String>,
    pub creator_name: Option<String>,
    pub data_coverage_start: Option<i32>,
    pub data_coverage_end: Option<i32>,
    pub published_start: Option<i32>,
    pub published_end: Option<i32>,
    /// Page number (1-indexed)
    pub page_number: u32,
    pub page_size: u32,
}

impl SearchRequest {
    /// Create a request for a term with every filter absent
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            sort_by: None,
            content_type: None,
            provider_name: None,
            creator_name: None,
            data_coverage_start: None,
            data_coverage_end: None,
            published_start: None,
            published_end: None,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_sort(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_name = Some(provider.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator_name = Some(creator.into());
        self
    }

    /// Restrict temporal coverage, either side optional
    pub fn with_coverage(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.data_coverage_start = start;
        self.data_coverage_end = end;
        self
    }

    /// Restrict publication years, either side optional
    pub fn with_published(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.published_start = start;
        self.published_end = end;
        self
    }

    pub fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }

    /// Number of records preceding the requested page
    pub fn skip(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Reject input that would compile into a malformed or silently wrong plan
    pub fn validate(&self, limits: &SearchLimits) -> Result<(), ValidationError> {
        if self.term.trim().is_empty() {
            return Err(ValidationError::EmptyTerm);
        }
        if self.page_number == 0 {
            return Err(ValidationError::NonPositive { field: "pageNumber" });
        }
        if self.page_size == 0 {
            return Err(ValidationError::NonPositive { field: "pageSize" });
        }
        if self.page_size > limits.max_page_size {
            return Err(ValidationError::PageSizeTooLarge {
                size: self.page_size,
                max: limits.max_page_size,
            });
        }

        let years = [
            ("publishedStart", self.published_start),
            ("publishedEnd", self.published_end),
            ("dataCoverageStart", self.data_coverage_start),
            ("dataCoverageEnd", self.data_coverage_end),
        ];
        for (field, year) in years {
            if let Some(year) = year {
                if !YEAR_RANGE.contains(&year) {
                    return Err(ValidationError::YearOutOfRange { field, year });
                }
            }
        }

        check_order(
            ("publishedStart", self.published_start),
            ("publishedEnd", self.published_end),
        )?;
        check_order(
            ("dataCoverageStart", self.data_coverage_start),
            ("dataCoverageEnd", self.data_coverage_end),
        )?;

        if let Some(ref field) = self.sort_by {
            if !SORT_FIELD_RE.is_match(field) {
                return Err(ValidationError::InvalidSortField(field.clone()));
            }
        }

        Ok(())
    }
}

fn check_order(
    (start_field, start): (&'static str, Option<i32>),
    (end_field, end): (&'static str, Option<i32>),
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::InvertedRange {
            start_field,
            end_field,
            start,
            end,
        }),
        _ => Ok(()),
    }
}

/// Service-wide bounds applied during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_page_size: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { max_page_size: 100 }
    }
}

/// Client-input errors found before compilation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("search term must not be empty")]
    EmptyTerm,

    #[error("{field} must be a positive integer")]
    NonPositive { field: &'static str },

    #[error("pageSize {size} exceeds the maximum of {max}")]
    PageSizeTooLarge { size: u32, max: u32 },

    #[error("{field} year {year} is outside the supported range")]
    YearOutOfRange { field: &'static str, year: i32 },

    #[error("{start_field} ({start}) is after {end_field} ({end})")]
    InvertedRange {
        start_field: &'static str,
        end_field: &'static str,
        start: i32,
        end: i32,
    },

    #[error("sortBy '{0}' is not a valid field path")]
    InvalidSortField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SearchLimits {
        SearchLimits::default()
    }

    #[test]
    fn test_defaults() {
        let request = SearchRequest::new("climate");
        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert!(request.sort_by.is_none());
        assert!(request.validate(&limits()).is_ok());
    }

    #[test]
    fn test_skip_arithmetic() {
        assert_eq!(SearchRequest::new("x").with_page(1, 30).skip(), 0);
        assert_eq!(SearchRequest::new("x").with_page(2, 10).skip(), 10);
        assert_eq!(SearchRequest::new("x").with_page(7, 25).skip(), 150);
        assert_eq!(
            SearchRequest::new("x").with_page(u32::MAX, u32::MAX).skip(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn test_rejects_blank_term() {
        let err = SearchRequest::new("   ").validate(&limits()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTerm);
    }

    #[test]
    fn test_rejects_zero_pagination() {
        let err = SearchRequest::new("x")
            .with_page(0, 10)
            .validate(&limits())
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositive { field: "pageNumber" });

        let err = SearchRequest::new("x")
            .with_page(1, 0)
            .validate(&limits())
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositive { field: "pageSize" });
    }

    #[test]
    fn test_rejects_oversized_page() {
        let err = SearchRequest::new("x")
            .with_page(1, 101)
            .validate(&limits())
            .unwrap_err();
        assert_eq!(err, ValidationError::PageSizeTooLarge { size: 101, max: 100 });
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let err = SearchRequest::new("x")
            .with_published(Some(2015), Some(2010))
            .validate(&limits())
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvertedRange { start_field: "publishedStart", .. }
        ));

        let err = SearchRequest::new("x")
            .with_coverage(Some(2000), Some(1990))
            .validate(&limits())
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvertedRange { start_field: "dataCoverageStart", .. }
        ));

        // A single year is a valid range
        assert!(SearchRequest::new("x")
            .with_published(Some(2015), Some(2015))
            .validate(&limits())
            .is_ok());
    }

    #[test]
    fn test_rejects_years_out_of_range() {
        let err = SearchRequest::new("x")
            .with_published(None, Some(9999))
            .validate(&limits())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::YearOutOfRange { field: "publishedEnd", year: 9999 }
        );

        let err = SearchRequest::new("x")
            .with_coverage(Some(-5), None)
            .validate(&limits())
            .unwrap_err();
        assert!(matches!(err, ValidationError::YearOutOfRange { .. }));
    }

    #[test]
    fn test_sort_field_paths() {
        for field in ["datePublished", "temporalCoverage.start", "@type", "provider.name"] {
            assert!(
                SearchRequest::new("x").with_sort(field).validate(&limits()).is_ok(),
                "{field} should be accepted"
            );
        }
        for field in ["", "$where", ".name", "name; drop", "a b"] {
            assert!(
                SearchRequest::new("x").with_sort(field).validate(&limits()).is_err(),
                "{field:?} should be rejected"
            );
        }
    }
}
