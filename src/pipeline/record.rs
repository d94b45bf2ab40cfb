use crate::pipeline::extractor::Extraction;
use crate::pipeline::fetcher::FailureReason;
use serde::Serialize;

/// Separator between addresses in the `emails` column
pub const EMAIL_SEPARATOR: &str = ", ";

/// The output unit: one per input URL, always present
///
/// Serializes to the columns `url,business,emails,domain`; the failure cause
/// is kept for summaries and logs only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    /// The URL exactly as given in the input
    pub url: String,

    /// Page title, or the domain when no title was found
    pub business: String,

    /// Distinct addresses joined with [`EMAIL_SEPARATOR`]
    pub emails: String,

    /// Resolved host of the URL, or the URL itself when it does not parse
    pub domain: String,

    #[serde(skip)]
    pub failure: Option<FailureReason>,
}

impl ResultRecord {
    /// Builds the record for a page that was fetched and extracted
    pub fn fetched(url: &str, domain: String, extraction: Extraction) -> Self {
        let business = extraction.title.unwrap_or_else(|| domain.clone());

        Self {
            url: url.to_string(),
            business,
            emails: extraction.emails.join(EMAIL_SEPARATOR),
            domain,
            failure: None,
        }
    }

    /// Builds the record for a URL whose fetch failed
    pub fn failed(url: &str, domain: String, reason: FailureReason) -> Self {
        Self {
            url: url.to_string(),
            business: domain.clone(),
            emails: String::new(),
            domain,
            failure: Some(reason),
        }
    }

    /// True when the page was fetched, even if no emails were found
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of addresses in the `emails` column
    pub fn email_count(&self) -> usize {
        if self.emails.is_empty() {
            0
        } else {
            self.emails.split(EMAIL_SEPARATOR).count()
        }
    }
}
