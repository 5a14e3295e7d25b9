//! Built-in example claims offered on an empty session

use serde::Serialize;

/// A ready-made claim to try
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ExampleQuery {
    pub title: &'static str,
    pub query: &'static str,
}

pub const EXAMPLE_QUERIES: [ExampleQuery; 3] = [
    ExampleQuery {
        title: "Government Schemes",
        query: "Is the VB-G RAM G scheme officially replacing MGNREGA?",
    },
    ExampleQuery {
        title: "Viral Rumors",
        query: "Fact check: New 500 rupee note with star symbol fake?",
    },
    ExampleQuery {
        title: "Economy & Tax",
        query: "Latest updates on UPI transaction tax implementation 2026",
    },
];

/// Look up an example by its 1-based position
pub fn example(number: usize) -> Option<&'static ExampleQuery> {
    number.checked_sub(1).and_then(|i| EXAMPLE_QUERIES.get(i))
}
