//! Fixed answers for common questions, used when the knowledge service is
//! unreachable.
//!
//! Matching is a case-insensitive substring test, in table order; the first
//! pattern found in the question wins.

use bylaw_core::BylawAnswer;

/// One entry of the canned answer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedAnswer {
    /// Lowercase phrase looked for in the question.
    pub pattern: &'static str,
    pub answer: &'static str,
    pub clause: &'static str,
    pub page: &'static str,
}

/// Canned answers, in match order.
pub const CANNED_ANSWERS: &[CannedAnswer] = &[
    CannedAnswer {
        pattern: "min stair width",
        answer: "The minimum stair width in residential buildings is 1.2 meters under BBMP 2019, \
                 which keeps evacuation routes safe and accessible. Check that every staircase \
                 in your design meets this width.",
        clause: "BBMP 2019, Clause 6.3.2",
        page: "45",
    },
    CannedAnswer {
        pattern: "car parking requirements",
        answer: "Commercial buildings typically need 1 parking space per 100 sqm of built area, \
                 and residential buildings 1 space per dwelling unit. Confirm the exact ratio \
                 for your zone.",
        clause: "BBMP 2019, Clause 6.2.1",
        page: "42",
    },
    CannedAnswer {
        pattern: "max floor area ratio",
        answer: "The maximum FAR depends on the zone: typically 1.25 for residential areas and \
                 up to 2.5 for commercial zones. Keep your project within the FAR permitted \
                 for its zone.",
        clause: "BBMP 2019, Table 5.4.1",
        page: "38",
    },
    CannedAnswer {
        pattern: "front setback for residential",
        answer: "Residential buildings need a front setback of at least 7 meters from the road \
                 boundary for light, ventilation and fire access. Verify the setback before \
                 construction starts.",
        clause: "BBMP 2019, Clause 5.1.1",
        page: "35",
    },
];

/// Answer given when nothing else is available.
pub const GENERIC_APOLOGY: &str = "I apologize, but I cannot access the bylaw document at the \
     moment. Please try again later or consult the BBMP 2019 bylaws directly for specific \
     requirements.";

impl CannedAnswer {
    /// The first entry whose pattern occurs in `question`, ignoring case.
    pub fn lookup(question: &str) -> Option<&'static CannedAnswer> {
        let question = question.to_lowercase();
        CANNED_ANSWERS
            .iter()
            .find(|entry| question.contains(entry.pattern))
    }

    pub fn to_answer(&self) -> BylawAnswer {
        BylawAnswer {
            answer: self.answer.to_string(),
            clause: Some(self.clause.to_string()),
            page: Some(self.page.to_string()),
        }
    }
}
