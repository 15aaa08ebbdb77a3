//! Command handlers

use crate::cli::Commands;
use crate::config::Config;
use anyhow::{Context, Result};
use edi_openedi::parse_and_import;
use edi_spec::storage::{self, SPEC_FILE_EXTENSION};
use edi_spec::templates::EDI_VERSIONS;
use edi_spec::traversal::{self, element_at, loop_at, segment_at};
use edi_spec::{NodeId, NodeKind, Patch, Specification, Statistics, TransactionSetTemplates, Usage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::New {
            transaction_set,
            name,
            edi_version,
            output,
        } => new_spec(&transaction_set, name, edi_version, &output, config).await,
        Commands::Import { input, output } => import(&input, &output, config).await,
        Commands::Stats { input } => stats(&input).await,
        Commands::Show { input, kind, id } => match (kind, id) {
            (Some(kind), Some(id)) => show_node(&input, kind, &id, config).await,
            _ => show(&input, config).await,
        },
        Commands::SetUsage {
            input,
            kind,
            id,
            usage,
        } => set_usage(&input, kind, &id, usage, config).await,
        Commands::Templates => {
            templates();
            Ok(())
        }
    }
}

async fn new_spec(
    transaction_set: &str,
    name: Option<String>,
    edi_version: Option<String>,
    output: &Path,
    config: &Config,
) -> Result<()> {
    let edi_version = edi_version.unwrap_or_else(|| config.default_edi_version.clone());
    if !EDI_VERSIONS.contains(&edi_version.as_str()) {
        warn!(edi_version = %edi_version, "EDI version is not in the supported list");
    }
    let mut spec = Specification::create_empty(transaction_set, name.as_deref(), Some(&edi_version));
    spec.metadata.partner.clone_from(&config.partner);

    let path = write_spec(&with_default_extension(output), &spec, config).await?;
    println!("Created {} -> {}", spec.metadata.name, path.display());
    Ok(())
}

async fn import(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let spec = parse_and_import(&raw)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    let path = write_spec(&with_default_extension(output), &spec, config).await?;
    let summary = Statistics::of(&spec);
    println!(
        "Imported {} -> {} (loops={}, segments={}, elements={})",
        spec.metadata.name,
        path.display(),
        summary.loops,
        summary.segments,
        summary.elements
    );
    Ok(())
}

async fn stats(input: &Path) -> Result<()> {
    let spec = read_spec(input).await?;
    let summary = Statistics::of(&spec);
    println!(
        "Statistics: loops={}, segments={}, elements={}, examples={}",
        summary.loops, summary.segments, summary.elements, summary.examples
    );
    Ok(())
}

async fn show(input: &Path, config: &Config) -> Result<()> {
    let spec = read_spec(input).await?;
    println!("{}", render(&spec, config.pretty)?);
    Ok(())
}

async fn show_node(input: &Path, kind: NodeKind, id: &str, config: &Config) -> Result<()> {
    let spec = read_spec(input).await?;
    let located = traversal::require(&spec, kind, &NodeId::from(id))?;
    let rendered = match kind {
        NodeKind::Loop => loop_at(&spec, &located.path).map(|n| render(n, config.pretty)),
        NodeKind::Segment => segment_at(&spec, &located.path).map(|n| render(n, config.pretty)),
        NodeKind::Element => element_at(&spec, &located.path).map(|n| render(n, config.pretty)),
    }
    .transpose()?
    .with_context(|| format!("Failed to resolve {kind} {id}"))?;
    println!("{rendered}");
    Ok(())
}

async fn set_usage(
    input: &Path,
    kind: NodeKind,
    id: &str,
    usage: Usage,
    config: &Config,
) -> Result<()> {
    let spec = read_spec(input).await?;
    let located = traversal::require(&spec, kind, &NodeId::from(id))?;
    let updated = edi_spec::update::try_apply(&spec, &located.path, Patch::usage(kind, usage))?;
    write_spec(input, &updated, config).await?;
    println!("Set {kind} {id} usage to {usage}");
    Ok(())
}

fn templates() {
    for template in TransactionSetTemplates::iter() {
        println!("{}\t{}\t{}", template.id, template.name, template.description);
    }
}

async fn read_spec(path: &Path) -> Result<Specification> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    storage::from_json(&json)
        .with_context(|| format!("Failed to load specification {}", path.display()))
}

async fn write_spec(path: &Path, spec: &Specification, config: &Config) -> Result<PathBuf> {
    let json = if config.pretty {
        storage::to_json(spec)?
    } else {
        serde_json::to_string(spec)?
    };
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote specification");
    Ok(path.to_path_buf())
}

fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(SPEC_FILE_EXTENSION)
    }
}
