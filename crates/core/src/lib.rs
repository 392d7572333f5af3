//! Fuzzy substring scoring for `fzbook`.
//!
//! This crate holds the pure, allocation-light pieces of the search: the
//! [`split_paragraphs`] splitter, the [`score`] function that finds
//! the best approximate occurrence of a term inside one paragraph, and the
//! value types ([`MatchResult`], [`RankedMatch`], [`ResultSnapshot`]) that the
//! streaming crate passes around.
//!
//! Nothing here spawns threads or performs I/O. The threaded pipeline and the
//! incremental top-10 aggregation live in `fzbook-stream`.
//!
//! ```
//! use fzbook_core::{score, split_paragraphs};
//!
//! let paragraphs = split_paragraphs("the quick fox\n\nthe slow turtle");
//! assert_eq!(paragraphs, vec!["the quick fox", "the slow turtle"]);
//!
//! let best = score("QUICK", paragraphs[0]);
//! assert_eq!(&paragraphs[0][best.span.range()], "quick");
//! assert_eq!(best.similarity, 1.0);
//! ```

mod error;
mod model;
mod paragraphs;
mod scorer;

pub use error::SpanError;
pub use model::{MatchResult, MatchSpan, RankedMatch, ResultSnapshot, SpanScore};
pub use paragraphs::{PARAGRAPH_SEPARATOR, split_paragraphs};
pub use scorer::{MAX_SIMILARITY, score, score_paragraphs};
