/*!
 * Working-session state kept between runs.
 *
 * - `history`: bounded list of recently opened projects
 */

pub mod history;

// Re-export main types
pub use history::{HistoryEntry, ProjectHistory};
