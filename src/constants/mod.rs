//! Endpoint constants
//!
//! The constants file records every endpoint name the API documents. It is
//! refreshed by the [`ConstantSynchronizer`] from either the documentation
//! repository's file tree or the specification embedded in the API's own
//! documentation page, and read by full updates.

mod file;
mod sync;

pub use file::ConstantsFile;
pub use sync::{
    endpoints_from_html, endpoints_from_tree, ConstantSynchronizer, DocTreeSource, SyncSettings,
    TreeEntry, TreeResponse,
};
