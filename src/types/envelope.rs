//! The backend's `{data, error, page, ...}` response convention.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error object carried inside an envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// String or numeric, whichever the backend sent.
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Envelope members that accompany `data`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wrapped<T> {
    pub data: T,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

/// A response that is either wrapped in `{data: ...}` or the bare resource.
///
/// # Example
/// ```
/// use uruti::types::Envelope;
///
/// let wrapped: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2],"total":2}"#)?;
/// let bare: Envelope<Vec<u32>> = serde_json::from_str("[1,2]")?;
/// assert_eq!(wrapped.into_data(), bare.into_data());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped(Wrapped<T>),
    Bare(T),
}

/// A list response with whatever pagination metadata the backend sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: T,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
}

impl<T: Default> Page<T> {
    /// A page with no items and no metadata.
    pub fn empty() -> Self {
        Self {
            items: T::default(),
            page: None,
            page_size: None,
            total: None,
            total_pages: None,
        }
    }
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> T {
        match self {
            Self::Wrapped(wrapped) => wrapped.data,
            Self::Bare(data) => data,
        }
    }

    pub fn error(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Wrapped(wrapped) => wrapped.error.as_ref(),
            Self::Bare(_) => None,
        }
    }

    pub fn into_page(self) -> Page<T> {
        match self {
            Self::Wrapped(wrapped) => Page {
                items: wrapped.data,
                page: wrapped.page,
                page_size: wrapped.page_size,
                total: wrapped.total,
                total_pages: wrapped.total_pages,
            },
            Self::Bare(items) => Page {
                items,
                page: None,
                page_size: None,
                total: None,
                total_pages: None,
            },
        }
    }
}
