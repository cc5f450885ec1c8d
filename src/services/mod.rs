pub mod polling;
pub mod progress_calculator;
pub mod progress_update;
pub mod registry;

pub use polling::*;
pub use progress_calculator::*;
pub use progress_update::*;
pub use registry::*;
