//! Named debug streams.
//!
//! A [`DebugStreams`] registry maps names to output sinks so that components can emit
//! diagnostics (solver queries, explored states, ...) to a destination chosen by the
//! embedder. The registry is an ordinary value: create one, register sinks, and hand it
//! (or the [`DebugStream`] handles it returns) to whoever needs to write.
//!
//! Registration is append-only. A name, once bound, keeps its sink for the lifetime of
//! the registry.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use log::debug;
use parking_lot::{Mutex, RwLock, RwLockUpgradableReadGuard};

use crate::conf::DebugConfig;
use crate::error::{DebugError, DebugResult};
use crate::text::broken;

/// Boxed output sink accepted by the registry.
pub type DebugSink = Box<dyn Write + Send>;

/// Cloneable handle to a registered sink.
///
/// Every write locks the sink, so handles may be shared between threads and whole
/// writes never interleave.
#[derive(Clone)]
pub struct DebugStream {
    name: Arc<str>,
    sink: Arc<Mutex<DebugSink>>,
}

impl DebugStream {
    fn new(name: &str, sink: DebugSink) -> Self {
        Self {
            name: Arc::from(name),
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write `text` followed by a newline, then flush.
    pub fn write_line(&self, text: &str) -> DebugResult<()> {
        let mut sink = self.sink.lock();
        sink.write_all(text.as_bytes())
            .and_then(|()| sink.write_all(b"\n"))
            .and_then(|()| sink.flush())
            .map_err(|source| DebugError::Io {
                source,
                name: self.name.to_string(),
            })
    }
}

impl Write for DebugStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.sink.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.sink.lock().write_all(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sink.lock().flush()
    }
}

impl std::fmt::Debug for DebugStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugStream")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of named debug streams.
#[derive(Debug, Default)]
pub struct DebugStreams {
    streams: RwLock<BTreeMap<String, DebugStream>>,
    line_width: Option<usize>,
}

impl DebugStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose [`write_line`](Self::write_line) breaks messages every `width`
    /// characters.
    pub fn with_line_width(width: usize) -> Self {
        Self {
            line_width: Some(width),
            ..Self::default()
        }
    }

    /// Build a registry and open every file listed in `config`.
    pub fn from_config(config: &DebugConfig) -> DebugResult<Self> {
        let registry = Self {
            line_width: config.line_width,
            ..Self::default()
        };
        for (name, path) in &config.streams {
            registry.add_file(name.as_str(), path)?;
        }
        Ok(registry)
    }

    pub fn line_width(&self) -> Option<usize> {
        self.line_width
    }

    /// Bind `name` to the sink produced by `open`.
    ///
    /// `open` runs under an upgradable read lock: lookups proceed while a file is being
    /// created, and competing registrations wait, so a name is still checked and bound
    /// atomically.
    fn register(
        &self,
        name: String,
        open: impl FnOnce() -> DebugResult<DebugSink>,
    ) -> DebugResult<DebugStream> {
        let streams = self.streams.upgradable_read();
        if streams.contains_key(&name) {
            return Err(DebugError::StreamAlreadyRegistered(name));
        }

        let stream = DebugStream::new(&name, open()?);
        let mut streams = RwLockUpgradableReadGuard::upgrade(streams);
        debug!("Registered debug stream '{}'", name);
        streams.insert(name, stream.clone());
        Ok(stream)
    }

    /// Register `sink` under `name`.
    pub fn add_stream(
        &self,
        name: impl Into<String>,
        sink: impl Write + Send + 'static,
    ) -> DebugResult<DebugStream> {
        self.register(name.into(), || Ok(Box::new(sink)))
    }

    /// Create (or truncate) the file at `path` and register it under `name`.
    ///
    /// The file is left untouched if `name` is already taken.
    pub fn add_file(
        &self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> DebugResult<DebugStream> {
        let name = name.into();
        let path = path.as_ref();
        self.register(name.clone(), || {
            let file = File::create(path).map_err(|source| DebugError::Io { source, name })?;
            debug!("Opened debug file '{}'", path.display());
            Ok(Box::new(BufWriter::new(file)))
        })
    }

    /// Handle to the stream registered under `name`.
    pub fn get_stream(&self, name: &str) -> DebugResult<DebugStream> {
        self.streams
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DebugError::NoSuchStream(name.to_string()))
    }

    /// Write `message` and a newline to the stream `name`, broken at the configured width.
    pub fn write_line(&self, name: &str, message: &str) -> DebugResult<()> {
        let stream = self.get_stream(name)?;
        match self.line_width {
            Some(width) => stream.write_line(&broken(width, message)),
            None => stream.write_line(message),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.streams.read().contains_key(name)
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.streams.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.streams.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn registered_stream_receives_writes() {
        let registry = DebugStreams::new();
        let buf = SharedBuf::default();
        registry.add_stream("solver", buf.clone()).unwrap();

        let mut stream = registry.get_stream("solver").unwrap();
        write!(stream, "query {}", 1).unwrap();
        stream.flush().unwrap();
        registry.write_line("solver", " done").unwrap();

        assert_eq!(buf.contents(), "query 1 done\n");
        assert_eq!(stream.name(), "solver");
    }

    #[test]
    fn unknown_name_is_reported() {
        let registry = DebugStreams::new();
        let err = registry.get_stream("missing").unwrap_err();
        assert!(matches!(&err, DebugError::NoSuchStream(name) if name == "missing"));
        assert_eq!(err.to_string(), "No such debug stream 'missing'");
        assert!(registry.write_line("missing", "x").is_err());
    }

    #[test]
    fn names_cannot_be_rebound() {
        let registry = DebugStreams::new();
        let first = SharedBuf::default();
        registry.add_stream("states", first.clone()).unwrap();

        let err = registry.add_stream("states", SharedBuf::default()).unwrap_err();
        assert!(matches!(err, DebugError::StreamAlreadyRegistered(name) if name == "states"));

        registry.write_line("states", "kept").unwrap();
        assert_eq!(first.contents(), "kept\n");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookups_proceed_while_a_sink_is_opened() {
        let registry = DebugStreams::new();
        let first = SharedBuf::default();
        registry.add_stream("first", first.clone()).unwrap();

        let second = SharedBuf::default();
        registry
            .register("second".to_string(), || {
                assert!(registry.streams.try_read().is_some());
                registry.get_stream("first")?.write_line("opening second")?;
                assert!(!registry.contains("second"));
                Ok(Box::new(second.clone()))
            })
            .unwrap();

        assert_eq!(first.contents(), "opening second\n");
        assert_eq!(registry.names(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn failed_open_registers_nothing() {
        let registry = DebugStreams::new();
        let err = registry
            .register("broken".to_string(), || {
                Err(DebugError::NoSuchStream("backing store".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, DebugError::NoSuchStream(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn write_line_breaks_at_configured_width() {
        let registry = DebugStreams::with_line_width(4);
        let buf = SharedBuf::default();
        registry.add_stream("wide", buf.clone()).unwrap();
        registry.write_line("wide", "abcdefghij").unwrap();
        assert_eq!(buf.contents(), "abcd\nefgh\nij\n");
        assert_eq!(registry.line_width(), Some(4));
    }

    #[test]
    fn names_are_sorted() {
        let registry = DebugStreams::new();
        assert!(registry.is_empty());
        registry.add_stream("b", SharedBuf::default()).unwrap();
        registry.add_stream("a", SharedBuf::default()).unwrap();
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(registry.contains("a"));
        assert!(!registry.contains("c"));
    }

    #[test]
    fn handles_are_shareable_between_threads() {
        let registry = DebugStreams::new();
        let buf = SharedBuf::default();
        let stream = registry.add_stream("mt", buf.clone()).unwrap();

        std::thread::scope(|s| {
            for i in 0..4 {
                let stream = stream.clone();
                s.spawn(move || {
                    for _ in 0..16 {
                        stream.write_line(&format!("thread-{i}")).unwrap();
                    }
                });
            }
        });

        let contents = buf.contents();
        assert_eq!(contents.lines().count(), 64);
        assert!(contents.lines().all(|l| l.starts_with("thread-")));
    }
}
