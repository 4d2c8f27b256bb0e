//! SafeComms Core - term corpus construction and text matching.
//!
//! This crate is the algorithmic heart of SafeComms: it expands a small
//! curated seed catalog into a large, deterministic term corpus (spelling
//! variants and common obfuscations included) and evaluates arbitrary
//! text against it.
//!
//! The corpus is built once at process start and is immutable afterward;
//! [`MatchEngine::evaluate`] is a pure function over that shared
//! read-only state and needs no synchronization.
//!
//! # Example
//!
//! ```
//! use safecomms_core::{Corpus, MatchEngine, SeedCatalog};
//!
//! let corpus = Corpus::build(&SeedCatalog::builtin()).unwrap();
//! let engine = MatchEngine::new(&corpus).unwrap();
//!
//! let verdict = engine.evaluate("hello team, have a nice day");
//! assert!(verdict.safe);
//!
//! let verdict = engine.evaluate("I will kill and bomb this.");
//! assert!(!verdict.safe);
//! ```

pub mod catalog;
pub mod corpus;
pub mod engine;
pub mod toxicity;
pub mod verdict;

pub use catalog::{CatalogError, Category, SeedCatalog};
pub use corpus::Corpus;
pub use engine::{EngineError, MatchEngine, TermKind};
pub use toxicity::{score_verdict, ToxicityClassifier, ToxicityScore, DEFAULT_THRESHOLD};
pub use verdict::{Verdict, VerdictCategory, REASON_CLEAN, REASON_FLAGGED};
