//! Demo format handlers used to exercise and showcase the router. None of
//! these touch a real codec, they transform bytes in-process just enough
//! to prove a chain actually ran, the way a WebAssembly-backed handler
//! would from the router's point of view.

use forma::{FileData, Format, Handler};

/// Converts plain-text bytes between an upper-case and a lower-case
/// representation. Declares both directions, so the router can use it as
/// either end of a chain.
pub struct TextCaseHandler;

impl Default for TextCaseHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCaseHandler {
    pub fn new() -> Self {
        Self
    }

    fn upper() -> Format {
        Format::new("Upper-case text", "text-upper", "text/x-forma-upper")
            .with_extension("upper.txt")
            .readable()
            .writable()
    }

    fn lower() -> Format {
        Format::new("Lower-case text", "text-lower", "text/x-forma-lower")
            .with_extension("lower.txt")
            .readable()
            .writable()
    }
}

impl Handler for TextCaseHandler {
    fn name(&self) -> &str {
        "text-case"
    }

    fn ready(&self) -> bool {
        true
    }

    fn init(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn supported_formats(&self) -> Vec<Format> {
        vec![Self::upper(), Self::lower()]
    }

    fn convert(&self, files: &[FileData], _from: &Format, to: &Format) -> anyhow::Result<Vec<FileData>> {
        let upper = to.mime == Self::upper().mime;
        Ok(files
            .iter()
            .map(|f| {
                let bytes = if upper {
                    f.bytes.to_ascii_uppercase()
                } else {
                    f.bytes.to_ascii_lowercase()
                };
                FileData::new(format!("{}.{}", f.name, to.extension), bytes)
            })
            .collect())
    }
}

/// An any-input handler that relabels whatever bytes arrive as a single
/// fixed output format without looking at their content: the "rename"
/// shortcut the router's any-input fallback exists for.
pub struct RenameHandler {
    format: Format,
}

impl Default for RenameHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RenameHandler {
    pub fn new() -> Self {
        Self {
            format: Format::new("Renamed blob", "renamed", "application/x-forma-renamed")
                .with_extension("bin")
                .writable(),
        }
    }
}

impl Handler for RenameHandler {
    fn name(&self) -> &str {
        "rename"
    }

    fn ready(&self) -> bool {
        true
    }

    fn init(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn supported_formats(&self) -> Vec<Format> {
        vec![self.format.clone()]
    }

    fn support_any_input(&self) -> bool {
        true
    }

    fn convert(&self, files: &[FileData], _from: &Format, to: &Format) -> anyhow::Result<Vec<FileData>> {
        Ok(files
            .iter()
            .map(|f| FileData::new(format!("{}.{}", f.name, to.extension), f.bytes.clone()))
            .collect())
    }
}
