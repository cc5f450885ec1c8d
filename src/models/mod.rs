pub mod investigation;
pub mod investigation_status;
pub mod progress;

pub use investigation::Investigation;
pub use investigation_status::{InvestigationStatus, StatusClass};
pub use progress::{apply_tool_status_to_document, Phase, ProgressState, ToolStatusRecord, ToolUpdate};
