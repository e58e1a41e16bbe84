//! Exit code constants for annotate-vcf.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Annotated VCF delivered |
//! | 1 | `INTERNAL` | Workspace, delivery or other internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `TOOLCHAIN` | snpEff or a suitable Java was not found |
//! | 4 | `INPUT_CONSISTENCY` | Coding table or contig checks failed |
//! | 5 | `ENGINE_FAILURE` | `snpEff build` or `snpEff ann` failed |
//! | 6 | `AUDIT_FAILURE` | The annotated VCF carries problem codes |

/// Exit codes matching the documented exit code table.
///
/// Use the named constants, or [`as_i32()`](Self::as_i32) to get the numeric
/// value for `std::process::exit()`.
///
/// ```rust
/// use annotate_vcf_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::AUDIT_FAILURE.as_i32(), 6);
/// assert_eq!(ExitCode::SUCCESS, ExitCode::from_i32(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - annotated VCF delivered
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration values
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Toolchain error - snpEff or Java could not be discovered
    pub const TOOLCHAIN: ExitCode = ExitCode(3);

    /// Input consistency - coding tables or contigs do not line up
    pub const INPUT_CONSISTENCY: ExitCode = ExitCode(4);

    /// Engine failure - a snpEff subprocess exited non-zero
    pub const ENGINE_FAILURE: ExitCode = ExitCode(5);

    /// Audit failure - the annotated output reports problems
    pub const AUDIT_FAILURE: ExitCode = ExitCode(6);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
