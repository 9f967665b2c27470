pub mod engine;
pub mod error;
pub mod evaluate;
pub mod fragment;
pub mod operations;
pub mod orchestrate;
pub mod params;
pub mod results;
pub mod sequence;

pub use error::CoreError;
pub use evaluate::{PrimerCandidate, PrimerPair};
pub use fragment::{Fragment, FragmentPlanner};
pub use orchestrate::{DesignRun, FragmentOrchestrator, FragmentOutcome, FragmentReport, FragmentResult};
pub use params::{DesignParameters, ParamValue, SizeRange};
pub use results::{PairKey, ResultCollection, ResultEntry};
pub use sequence::{GeneWindow, ReferenceSequence};
