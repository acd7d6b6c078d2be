/*!
 * Translation pipeline: document model, window planning, prompt
 * construction, provider calls, and reassembly.
 */

pub mod batch;
pub mod document;
pub mod planner;
pub mod prompts;
pub mod reassembler;
pub mod service;

pub use batch::{BatchOutcome, BatchTranslator};
pub use document::{DocumentEntry, SubtitleDocument, Timecode};
pub use planner::{BatchPlanner, PlannerConfig, Window};
pub use reassembler::{ReassemblyReport, Reassembler};
pub use service::{TranslationService, WindowTranslation};
