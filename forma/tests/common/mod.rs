use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use forma::{FileData, Format, Handler};

/// A synthetic handler for exercising the router without any real codec.
/// Every `convert` call is recorded so tests can assert on call counts.
pub struct TestHandler {
    name: &'static str,
    formats: Vec<Format>,
    any_input: bool,
    init_ok: bool,
    ready: AtomicBool,
    calls: AtomicUsize,
    fail_after_call: Option<usize>,
    sleep: std::time::Duration,
}

impl TestHandler {
    pub fn new(name: &'static str, formats: Vec<Format>) -> Self {
        Self {
            name,
            formats,
            any_input: false,
            init_ok: true,
            ready: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            fail_after_call: None,
            sleep: std::time::Duration::ZERO,
        }
    }

    pub fn any_input(mut self) -> Self {
        self.any_input = true;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.init_ok = false;
        self
    }

    /// Succeed on the first `n` calls, then fail on every call after.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after_call = Some(n);
        self
    }

    pub fn sleeping(mut self, duration: std::time::Duration) -> Self {
        self.sleep = duration;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Handler for TestHandler {
    fn name(&self) -> &str {
        self.name
    }

    fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn init(&self) -> anyhow::Result<()> {
        if self.init_ok {
            self.ready.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(anyhow::anyhow!("handler '{}' failed to initialize", self.name))
        }
    }

    fn supported_formats(&self) -> Vec<Format> {
        self.formats.clone()
    }

    fn support_any_input(&self) -> bool {
        self.any_input
    }

    fn convert(&self, files: &[FileData], _from: &Format, to: &Format) -> anyhow::Result<Vec<FileData>> {
        let call_no = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.sleep.is_zero() {
            std::thread::sleep(self.sleep);
        }
        if let Some(limit) = self.fail_after_call {
            if call_no > limit {
                anyhow::bail!("handler '{}' forced failure on call {call_no}", self.name);
            }
        }
        Ok(files
            .iter()
            .map(|f| FileData::new(format!("{}.{}", f.name, to.extension), f.bytes.clone()))
            .collect())
    }
}

/// A handler whose `convert` always fails, useful as a dead end in a
/// chain, to force an `attempt()` to fail partway through.
pub struct DeadEndHandler {
    name: &'static str,
    formats: Vec<Format>,
    ready: AtomicBool,
}

impl DeadEndHandler {
    pub fn new(name: &'static str, formats: Vec<Format>) -> Arc<Self> {
        Arc::new(Self {
            name,
            formats,
            ready: AtomicBool::new(false),
        })
    }
}

impl Handler for DeadEndHandler {
    fn name(&self) -> &str {
        self.name
    }

    fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn init(&self) -> anyhow::Result<()> {
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn supported_formats(&self) -> Vec<Format> {
        self.formats.clone()
    }

    fn convert(&self, _files: &[FileData], _from: &Format, _to: &Format) -> anyhow::Result<Vec<FileData>> {
        anyhow::bail!("handler '{}' never succeeds", self.name)
    }
}

pub fn format(name: &str, code: &str, mime: &str, extension: &str) -> Format {
    Format::new(name, code, mime).with_extension(extension)
}
