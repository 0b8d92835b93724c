use crate::format::Format;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileData {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// A named codec backend. `init` runs at most once per process; implementations
// holding their own state should guard it with an interior `OnceLock`/`Mutex`,
// since the registry keeps handlers behind `Arc<dyn Handler>`.
pub trait Handler: Send + Sync {
    fn name(&self) -> &str;

    fn ready(&self) -> bool;

    fn init(&self) -> anyhow::Result<()>;

    fn supported_formats(&self) -> Vec<Format>;

    /// Handlers that accept any input mime (a renamer, say) set this, and may
    /// be appended to a chain without a declared from-entry for its current mime.
    fn support_any_input(&self) -> bool {
        false
    }

    // Fails by returning Err, or by returning any entry with empty bytes.
    fn convert(&self, files: &[FileData], from: &Format, to: &Format) -> anyhow::Result<Vec<FileData>>;
}
