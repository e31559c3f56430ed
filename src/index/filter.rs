//! Label filters for restricting which points may appear in search results.

use crate::types::Label;

/// Decides whether a label is eligible to appear in search results.
///
/// Called zero or more times per query, once per candidate that could still
/// enter the result set. Any `Fn(Label) -> bool` closure is a filter.
pub trait LabelFilter: Sync {
    /// Return true if `label` may be returned.
    fn allows(&self, label: Label) -> bool {
        let _ = label;
        true
    }
}

impl<F> LabelFilter for F
where
    F: Fn(Label) -> bool + Sync,
{
    #[inline]
    fn allows(&self, label: Label) -> bool {
        self(label)
    }
}

/// Filter that accepts every label.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl LabelFilter for AcceptAll {}

/// Filter that only accepts labels from a fixed set.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    labels: std::collections::HashSet<Label>,
}

impl AllowList {
    /// Create an allow-list from any collection of labels.
    pub fn new(labels: impl IntoIterator<Item = Label>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }
}

impl LabelFilter for AllowList {
    #[inline]
    fn allows(&self, label: Label) -> bool {
        self.labels.contains(&label)
    }
}
