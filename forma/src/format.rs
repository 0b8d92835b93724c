use serde::{Deserialize, Serialize};

/// One declared input/output capability of a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Format {
    pub name: String,
    pub format: String,
    pub extension: String,
    pub mime: String,
    pub from: bool,
    pub to: bool,
    pub internal: Option<String>,
}

impl Format {
    pub fn new(name: impl Into<String>, format: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            extension: String::new(),
            mime: mime.into(),
            from: false,
            to: false,
            internal: None,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn readable(mut self) -> Self {
        self.from = true;
        self
    }

    pub fn writable(mut self) -> Self {
        self.to = true;
        self
    }

    // A format with no mime can never be a graph node.
    pub fn has_mime(&self) -> bool {
        !self.mime.is_empty()
    }
}
