//! Core optimizer: combination explorer, candidate selector and report assembly.

pub mod candidate;
pub mod explorer;
pub mod monitor;
pub mod optimizer;
pub mod report;
pub mod selector;

pub use candidate::Candidate;
pub use explorer::{Exploration, SearchStats, explore, explore_with_monitor};
pub use monitor::{
    CompositeMonitor, InterruptMonitor, NoOpMonitor, SearchCommand, SearchMonitor,
    StateLimitMonitor, TimeLimitMonitor,
};
pub use optimizer::{Optimization, PackOptimizer, validate_order};
pub use report::{PackLine, PackReport};
pub use selector::{SelectionKey, select};
