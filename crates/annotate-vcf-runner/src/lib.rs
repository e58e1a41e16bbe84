//! Child process execution for annotate-vcf
//!
//! Every external program (the Java runtime, snpEff through it) is launched
//! through a [`CommandSpec`] and a [`ProcessRunner`]. The spec carries argv as
//! discrete elements plus a [`StreamTarget`] for stdout and stderr, so the same
//! capability serves version probes (captured output), engine phases writing
//! to capture files, and verbose runs forwarding to the terminal.
//!
//! # Security Model
//!
//! Arguments are never joined into a shell string. No `sh -c` or `cmd /C`
//! is used anywhere in this crate.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;

pub use command_spec::{CommandSpec, StreamTarget};
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner, read_file_tail};
