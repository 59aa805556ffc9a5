use anchor_core::{Anchor, AnchorStore, LintSeverity, ParseError, lint_document, parse_document};
use anchor_export::{
    DocumentSource, ExportConfig, ExportError, ExportPipeline, HttpSource, SourceConfig,
    StaticSource,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("{}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub fn validate(document: &Path, anchors: Option<&Path>) -> Result<ExitCode, CliError> {
    let text = read(document)?;
    let doc = parse_document(&text).map_err(|source| CliError::Parse {
        path: document.to_path_buf(),
        source,
    })?;

    let diagnostics = lint_document(&doc);
    let mut clean = true;
    for d in &diagnostics {
        let severity = match d.severity {
            LintSeverity::Warning => {
                clean = false;
                "warning"
            }
            LintSeverity::Info => "info",
        };
        println!("{}: {severity}[{}]: {}", d.unit_id, d.rule, d.message);
    }
    log::info!(
        "{}: {} word(s), {} diagnostic(s)",
        document.display(),
        doc.words().len(),
        diagnostics.len()
    );

    if let Some(path) = anchors {
        let store = load_anchors(path)?;
        if let Some(message) = store.validate_order().message() {
            println!("order: {message}");
            clean = false;
        }
    }

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn merge(
    source: &str,
    anchors: &Path,
    config: Option<&Path>,
    out: Option<&Path>,
) -> Result<ExitCode, CliError> {
    let store = load_anchors(anchors)?;
    let config = match config {
        Some(path) => serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        None => ExportConfig::default(),
    };

    if let Some(message) = store.validate_order().message() {
        log::warn!("{message}");
    }

    let xml = if is_url(source) {
        let http = HttpSource::new(SourceConfig {
            url: source.to_string(),
        });
        merge_from(http, config, &store).await?
    } else {
        let text = read(Path::new(source))?;
        merge_from(StaticSource::new(text), config, &store).await?
    };

    match out {
        Some(path) => std::fs::write(path, xml)?,
        None => std::io::stdout().write_all(xml.as_bytes())?,
    }
    Ok(ExitCode::SUCCESS)
}

async fn merge_from<D: DocumentSource>(
    source: D,
    config: ExportConfig,
    store: &AnchorStore,
) -> Result<String, CliError> {
    let report = ExportPipeline::with_config(source, config)
        .merge(store)
        .await?;
    Ok(report.xml)
}

pub fn snapshot(document: &Path, anchors: Option<&Path>, pretty: bool) -> Result<ExitCode, CliError> {
    let text = read(document)?;
    let doc = parse_document(&text).map_err(|source| CliError::Parse {
        path: document.to_path_buf(),
        source,
    })?;
    let store = match anchors {
        Some(path) => load_anchors(path)?,
        None => AnchorStore::new(),
    };

    let snap = anchor_export::snapshot(&doc, &store);
    let json = if pretty {
        snap.to_json_pretty()?
    } else {
        snap.to_json()?
    };
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_anchors(path: &Path) -> Result<AnchorStore, CliError> {
    parse_anchors(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// A JSON array of anchors. Later entries for the same word win.
fn parse_anchors(json: &str) -> Result<AnchorStore, serde_json::Error> {
    let anchors: Vec<Anchor> = serde_json::from_str(json)?;
    let mut store = AnchorStore::new();
    for anchor in anchors {
        store.put(anchor);
    }
    Ok(store)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
