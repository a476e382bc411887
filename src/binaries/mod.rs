mod diagnostics;
mod resolver;

pub use diagnostics::{
    AttemptOutcome, BinaryErrorCode, BinaryResolutionAttempt, BinaryResolveDebugInfo,
    BinaryResolveError, CandidateSource,
};
pub use resolver::{
    first_non_empty_line, init_resource_dir, resolve_binary, resolve_binary_debug,
    resolve_binary_detailed,
};
