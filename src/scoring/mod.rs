//! GEO/AEO Readiness Scoring
//!
//! Grades a generated post document on how well answer engines and LLMs
//! can extract, trust, and cite it. The document is read as untyped JSON;
//! missing or mistyped fields lower the score instead of failing.
//!
//! # Rubric (100 points)
//!
//! | Category | Max | Earned by |
//! |---|---|---|
//! | A. Answer packaging | 25 | 3-5 TL;DR bullets (5), FAQ >= max(3, questions_to_win) (10), 1 H1 + 3 H2s (5), comparison table when required (5) |
//! | B. Entity coverage | 20 | >= 3 entities (5), all mentioned in body (5), >= 60% in glossary (5), >= 70% of key terms in body (5) |
//! | C. Structured data | 20 | BlogPosting (8), FAQPage when FAQ present (6), HowTo when how-to present (6) |
//! | D. Trust | 15 | disabled: flat 5; enabled: >= 3 refs (5), all `used_in` (3), half dated (2), baseline (5) |
//! | E. Metadata | 10 | meta_title (4), meta_description (4), canonical_url (1), language (1) |
//! | F. LLM extraction pack | 10 | summary (3), 3-7 takeaways (3), >= 2 recommended Q->A (4) |
//!
//! Entity and key-term presence is a case-insensitive, whole-word match
//! against the markdown body.
//!
//! # Example
//!
//! An empty document (`{}`) scores 35: A=5 (no table required),
//! B=5 (no key terms requested), C=20 (no structured data, FAQ or how-to
//! to check), D=5 (citations disabled), E=0, F=0.

mod fields;
mod matching;
mod readiness;
mod rubric;

pub use fields::{strings, truthy, Fields};
pub use matching::contains_word;
pub use readiness::{score, ReadinessScorer};
pub use rubric::{
    ANSWER_PACKAGING_MAX, ENTITY_COVERAGE_MAX, EXTRACTION_PACK_MAX, METADATA_MAX,
    SCHEMA_COMPLETENESS_MAX, TRUST_MAX,
};
