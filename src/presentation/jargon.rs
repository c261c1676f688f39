use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::models::NOT_AVAILABLE;

/// Medical terms and the plain-English gloss shown next to them.
pub const MEDICAL_TERMS: &[(&str, &str)] = &[
    ("myalgia", "muscle pain"),
    ("nausea", "feeling sick"),
    ("dyspepsia", "indigestion"),
    ("pruritus", "itching"),
    ("erythema", "skin redness"),
    ("edema", "swelling"),
    ("tachycardia", "fast heartbeat"),
    ("hypotension", "low blood pressure"),
    ("hypertension", "high blood pressure"),
    ("somnolence", "drowsiness"),
    ("contraindicated", "should not be used"),
    ("hepatic", "liver-related"),
    ("renal", "kidney-related"),
    ("anaphylaxis", "severe allergic reaction"),
    ("thrombosis", "blood clot"),
    ("arrhythmia", "irregular heartbeat"),
    ("dyspnea", "difficulty breathing"),
    ("flatulence", "gas"),
    ("alopecia", "hair loss"),
    ("vertigo", "dizziness"),
    ("insomnia", "difficulty sleeping"),
    ("pyrexia", "fever"),
    ("arthralgia", "joint pain"),
    ("rhinitis", "runny nose"),
    ("urticaria", "hives"),
    ("xerostomia", "dry mouth"),
    ("epistaxis", "nosebleed"),
    ("syncope", "fainting"),
    ("palpitations", "irregular heartbeat sensation"),
    ("diarrhea", "loose stools"),
    ("constipation", "difficulty passing stools"),
    ("vomiting", "throwing up"),
    ("headache", "head pain"),
    ("fatigue", "tiredness"),
    ("dysphagia", "difficulty swallowing"),
    ("tinnitus", "ringing in ears"),
    ("paresthesia", "tingling or numbness"),
    ("diaphoresis", "excessive sweating"),
    ("bradycardia", "slow heartbeat"),
];

/// Immutable term table compiled into a single whole-word matcher.
pub struct JargonTable {
    glosses: HashMap<String, String>,
    matcher: Option<Regex>,
}

impl JargonTable {
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let glosses: HashMap<String, String> = pairs
            .into_iter()
            .map(|(term, plain)| (term.to_lowercase(), plain.to_string()))
            .collect();

        // Longest first so no term shadows a longer one sharing its prefix
        let mut terms: Vec<&String> = glosses.keys().collect();
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let matcher = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            // Terms are escaped literals, so the pattern always compiles
            Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).ok()
        };

        Self { glosses, matcher }
    }

    pub fn len(&self) -> usize {
        self.glosses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glosses.is_empty()
    }

    pub fn gloss(&self, term: &str) -> Option<&str> {
        self.glosses.get(&term.to_lowercase()).map(String::as_str)
    }

    /// Appends ` (gloss)` after every whole-word occurrence of a known term.
    /// Blank text and the sentinel come back as the sentinel.
    pub fn simplify(&self, text: &str) -> String {
        if text.trim().is_empty() || text == NOT_AVAILABLE {
            return NOT_AVAILABLE.to_string();
        }

        let Some(matcher) = &self.matcher else {
            return text.to_string();
        };

        matcher
            .replace_all(text, |caps: &Captures| {
                let found = &caps[0];
                match self.gloss(found) {
                    Some(plain) => format!("{} ({})", found, plain),
                    None => found.to_string(),
                }
            })
            .into_owned()
    }
}

lazy_static! {
    static ref DEFAULT_TABLE: JargonTable = JargonTable::from_pairs(MEDICAL_TERMS.iter().copied());
}

pub fn default_table() -> &'static JargonTable {
    &DEFAULT_TABLE
}

pub fn simplify_jargon(text: &str) -> String {
    DEFAULT_TABLE.simplify(text)
}
