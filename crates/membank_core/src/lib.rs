//! Pure text primitives shared by the membank maintenance commands:
//! frontmatter parsing, heading and title extraction, and idempotent
//! region replacement inside markdown documents.
//!
//! Nothing in this crate touches the filesystem or the clock; callers feed
//! in full document text and get text (or maps) back, which keeps the
//! determinism and idempotence properties unit-testable in isolation.

pub mod frontmatter;
pub mod heading;
pub mod region;
pub mod title;

pub use frontmatter::{body_after_frontmatter, parse_frontmatter};
pub use heading::parse_heading;
pub use region::replace_region;
pub use title::{extract_title, UNTITLED};
