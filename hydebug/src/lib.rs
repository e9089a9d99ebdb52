//! Diagnostic helpers shared by hyperion tooling.
//!
//! - [`DebugStreams`]: registry of named output sinks for debug dumps, built explicitly
//!   or from a [`DebugConfig`].
//! - [`StopWatch`]: wall-clock interval measurement.
//! - [`break_string`]: fixed-column line breaking for long dumps.
//!
//! Libraries in this workspace log through the `log` facade; the streams here are for
//! bulk diagnostic output that does not belong in a log.
//!
//! Example
//! ```
//! use hydebug::{DebugStreams, StopWatch};
//!
//! let streams = DebugStreams::with_line_width(16);
//! streams.add_stream("stats", std::io::sink()).unwrap();
//!
//! let mut sw = StopWatch::started();
//! sw.stop();
//! streams
//!     .write_line("stats", &format!("explored in {} us", sw.elapsed_us()))
//!     .unwrap();
//! assert!(streams.get_stream("other").is_err());
//! ```

pub mod conf;
pub mod error;
pub mod stopwatch;
pub mod streams;
pub mod text;

pub use conf::DebugConfig;
pub use error::{DebugError, DebugResult};
pub use stopwatch::StopWatch;
pub use streams::{DebugSink, DebugStream, DebugStreams};
pub use text::{break_string, broken};
