//! Parse MAINTAINERS files, resolve which component owns a path and check
//! whether a revision's approvers cover every component it touches.
//!
//! ```
//! use maintainers_rs::{ChangedPathEntry, Engine, Identity, ReviewState};
//!
//! let engine = Engine::parse(
//!     "-----\nVLIB Library\nM: Dave Barach <dave@barachs.net>\nF: src/vlib/\n",
//! )
//! .unwrap();
//!
//! let owner = engine.resolve_ownership("src/vlib/buffer.c");
//! assert_eq!(owner.component.as_deref(), Some("VLIB Library"));
//!
//! let entries = vec![ChangedPathEntry::modified("src/vlib/buffer.c")];
//! let info = engine.evaluate_review(&entries, &[Identity::new("Dave Barach", "dave@barachs.net")]);
//! assert_eq!(info.state, ReviewState::AllComponentsReviewed);
//! ```

pub mod change;
pub mod component;
mod engine;
mod error;
pub mod index;
pub mod matcher;
pub mod parser;
pub mod report;
pub mod review;
pub mod source;

pub use change::{ChangeKind, ChangedPathEntry, RenameDriftWarning};
pub use component::{Component, Maintainer, PathPattern};
pub use engine::Engine;
pub use error::{Error, FormatError, Result, UnknownTitleError};
pub use index::{ComponentReviewInfo, ComponentState, OwnershipIndex};
pub use matcher::MatchLevel;
pub use review::{Identity, PatchsetReviewInfo, ReviewState};
