use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use forma::{
    ConversionOutcome, FileData, FormatRegistry, FormatRegistryBuilder, LoggingProgress, Node,
    PathStore, Router, RouterConfig, RoutingMode,
};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum ModeArg {
    Simple,
    Advanced,
}

impl From<ModeArg> for RoutingMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Simple => RoutingMode::Simple,
            ModeArg::Advanced => RoutingMode::Advanced,
        }
    }
}

/// Converts a file from one registered format to another by searching the
/// handler graph for a chain that bridges the two mime types.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the input file.
    #[arg(required_unless_present = "list_formats")]
    input: Option<PathBuf>,
    /// Path to write the converted output to.
    #[arg(required_unless_present = "list_formats")]
    output: Option<PathBuf>,
    /// MIME type of the input file.
    #[arg(long = "from", required_unless_present = "list_formats")]
    from_mime: Option<String>,
    /// MIME type to convert to.
    #[arg(long = "to", required_unless_present = "list_formats")]
    to_mime: Option<String>,
    /// List every mime type any registered handler declares, then exit.
    #[arg(long)]
    list_formats: bool,
    /// In advanced mode, the exact handler that must produce the output.
    #[arg(long)]
    handler: Option<String>,
    /// Simple mode accepts any handler that produces the target mime;
    /// advanced mode requires `--handler` to name the exact one.
    #[arg(long, value_enum, default_value = "simple")]
    mode: ModeArg,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = RouterConfig::from_env().context("loading router configuration")?;
    let mut cache = forma::FormatCache::load(&config.format_cache_path);

    let mut builder = FormatRegistryBuilder::new();
    register_handlers(&mut builder);
    let registry = builder.build(&mut cache);
    cache.save(&config.format_cache_path).context("saving format cache")?;

    if cli.list_formats {
        for mime in registry.supported_mimes() {
            println!("{mime}");
        }
        return Ok(());
    }

    let from_mime = cli.from_mime.expect("required_unless_present enforced by clap");
    let to_mime = cli.to_mime.expect("required_unless_present enforced by clap");
    let input = cli.input.expect("required_unless_present enforced by clap");
    let output = cli.output.expect("required_unless_present enforced by clap");

    let input_node = find_input_node(&registry, &from_mime)
        .with_context(|| format!("no handler can read mime '{from_mime}'"))?;
    let target_node = find_target_node(&registry, &to_mime, cli.handler.as_deref())
        .with_context(|| format!("no handler can write mime '{to_mime}'"))?;

    let store = PathStore::load(&config.path_store_path);
    let mut router = Router::new(registry, store, config);

    let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let files = vec![FileData::new(name, bytes)];

    let outcome = router.convert(&files, &input_node, &target_node, cli.mode.into(), &LoggingProgress);
    router.persist().context("saving path store")?;

    match outcome {
        ConversionOutcome::Success { files, chain } => {
            log::info!("converted via {} hop(s)", chain.len().saturating_sub(1));
            write_first_file(&output, &files)?;
        }
        ConversionOutcome::Partial { files, chain } => {
            log::warn!(
                "only a partial chain of {} hop(s) completed before the deadline",
                chain.len().saturating_sub(1)
            );
            write_first_file(&output, &files)?;
        }
        ConversionOutcome::Timeout => bail!("search timed out before any hop completed"),
        ConversionOutcome::NoRoute => bail!("no conversion path from '{from_mime}' to '{to_mime}'"),
    }

    Ok(())
}

fn write_first_file(path: &Path, files: &[FileData]) -> anyhow::Result<()> {
    let file = files.first().context("conversion produced no output files")?;
    std::fs::write(path, &file.bytes).with_context(|| format!("writing {}", path.display()))
}

#[allow(unused_variables, unused_mut)]
fn register_handlers(builder: &mut FormatRegistryBuilder) {
    #[cfg(feature = "demo-handlers")]
    {
        builder.register(Arc::new(forma_handlers::TextCaseHandler::new()));
        builder.register(Arc::new(forma_handlers::RenameHandler::new()));
    }
}

fn find_input_node(registry: &FormatRegistry, mime: &str) -> Option<Node> {
    registry.options().iter().find(|n| n.format.mime == mime && n.format.from).cloned()
}

fn find_target_node(registry: &FormatRegistry, mime: &str, handler: Option<&str>) -> Option<Node> {
    registry
        .options()
        .iter()
        .find(|n| n.format.mime == mime && n.format.to && handler.map_or(true, |h| n.handler.name() == h))
        .cloned()
}
