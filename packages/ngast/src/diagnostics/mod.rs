pub mod src {
    pub mod error;
    pub mod error_code;
    pub mod ngast_error;
    pub mod util;
}

pub use src::error::*;
pub use src::error_code::*;
pub use src::ngast_error::*;
pub use src::util::*;
pub use ts::{Diagnostic, DiagnosticCategory, DiagnosticMessageChain, DiagnosticRelatedInformation};
