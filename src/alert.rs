//! Alert messages for reporting failures to users.

use maud::{Markup, html};

/// An alert message shown above page content.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something went wrong and the user should know about it.
    Error {
        /// The headline.
        message: String,
        /// What happened and how the user might fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as HTML.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                message,
                details,
            ),
        };

        html! {
            div role="alert" class=(style)
            {
                span class="font-medium" { (message) }

                @if !details.is_empty() {
                    " " (details)
                }
            }
        }
    }
}
