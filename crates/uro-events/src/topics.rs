//! Message kind discriminators shared by every transport.

use std::fmt::{self, Display, Formatter};

/// Closed set of message kinds understood by this build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Theme (or other preference) chosen by the reader.
    UserPreference,
    /// A piece of content was opened.
    ContentViewed,
    /// A search was submitted from the header.
    SearchPerformed,
}

impl MessageKind {
    /// Every known kind, in declaration order.
    pub const ALL: [Self; 3] = [
        Self::UserPreference,
        Self::ContentViewed,
        Self::SearchPerformed,
    ];

    /// Wire discriminator stored in the envelope `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserPreference => "user-preference",
            Self::ContentViewed => "content-viewed",
            Self::SearchPerformed => "search-performed",
        }
    }

    /// Look up a kind by its wire discriminator.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl Display for MessageKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
