//! CLI tool for model inspection and ad-hoc queries.
//!
//! Provides commands for:
//! - Describing a model declared in a JSON definition file
//! - Seeding an in-memory store and running get/filter/delete against it

mod cli;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use spacemap_core::store::load_space_definitions;
use spacemap_core::{ConnectionRegistry, MemoryStore, Model, ModelDefinition, Value};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, QueryAction};

/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match cli.command {
        Commands::Describe { model } => describe(&model)?,
        Commands::Query {
            model,
            spaces,
            records,
            space,
            action,
            constraints,
        } => query(
            &model,
            &spaces,
            records.as_deref(),
            space,
            action,
            &constraints,
        )?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_model(path: &Path, registry: Arc<ConnectionRegistry>) -> anyhow::Result<Model> {
    let definition = ModelDefinition::from_path(path)?;
    let model = Model::from_definition(&definition)
        .registry(registry)
        .build()
        .with_context(|| format!("invalid model in {}", path.display()))?;
    Ok(model)
}

fn describe(path: &Path) -> anyhow::Result<serde_json::Value> {
    let model = load_model(path, Arc::new(ConnectionRegistry::new()))?;
    let schema = model.schema();

    let fields: Vec<serde_json::Value> = schema
        .fields()
        .iter()
        .map(|field| {
            serde_json::json!({
                "position": field.position(),
                "name": field.name(),
                "type": field.ty().as_str(),
                "primary_key": field.is_primary_key(),
                "db_index": field.db_index(),
            })
        })
        .collect();

    let indexes: serde_json::Map<String, serde_json::Value> = schema
        .index_numbers()
        .map(|index| {
            let names = schema.index_fields(index).unwrap_or_default();
            (index.to_string(), serde_json::json!(names))
        })
        .collect();

    Ok(serde_json::json!({
        "model": model.name(),
        "db_alias": schema.meta().db_alias,
        "check_tuple_length": schema.meta().check_tuple_length,
        "primary_key": schema.primary_key_field().map(|f| f.name()),
        "fields": fields,
        "indexes": indexes,
    }))
}

fn query(
    model_path: &Path,
    spaces_path: &Path,
    records_path: Option<&Path>,
    space: Option<u32>,
    action: QueryAction,
    constraints: &[String],
) -> anyhow::Result<serde_json::Value> {
    let text = fs::read_to_string(spaces_path)
        .with_context(|| format!("reading {}", spaces_path.display()))?;
    let definitions = load_space_definitions(&text)?;
    let space = match space {
        Some(space) => space,
        None => definitions
            .first()
            .map(|d| d.space)
            .ok_or_else(|| anyhow!("{} declares no spaces", spaces_path.display()))?,
    };
    let store = Arc::new(MemoryStore::with_spaces(definitions)?);

    let registry = Arc::new(ConnectionRegistry::new());
    let model = load_model(model_path, registry.clone())?;
    registry.register(model.schema().meta().db_alias.clone(), space, store.clone())?;

    if let Some(path) = records_path {
        let seeded = seed(&model, path)?;
        tracing::info!(model = model.name(), space, seeded, "store seeded");
    }

    let lookup = parse_constraints(&model, constraints)?;
    let objects = model.objects();
    let output = match action {
        QueryAction::Get => objects.get(lookup)?.to_json(),
        QueryAction::Filter => serde_json::Value::Array(
            objects
                .filter(lookup)?
                .iter()
                .map(|record| record.to_json())
                .collect(),
        ),
        QueryAction::Delete => serde_json::json!({ "deleted": objects.delete(lookup)? }),
    };

    tracing::debug!(requests = store.request_count(), "query finished");
    Ok(output)
}

/// Creates every record listed in a JSON array of field→value objects.
fn seed(model: &Model, path: &Path) -> anyhow::Result<usize> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<BTreeMap<String, Value>> = serde_json::from_str(&text)
        .with_context(|| format!("parsing records in {}", path.display()))?;

    let objects = model.objects();
    for (n, values) in records.iter().enumerate() {
        objects
            .create(values.iter().map(|(k, v)| (k.as_str(), v.clone())))
            .with_context(|| format!("record #{} in {}", n, path.display()))?;
    }
    Ok(records.len())
}

/// Parses `field=value` arguments using each field's declared type.
fn parse_constraints(model: &Model, constraints: &[String]) -> anyhow::Result<Vec<(String, Value)>> {
    constraints
        .iter()
        .map(|constraint| -> anyhow::Result<(String, Value)> {
            let Some((name, literal)) = constraint.split_once('=') else {
                bail!("constraint '{}' is not of the form field=value", constraint);
            };
            let field = model.schema().require_field(name)?;
            Ok((name.to_string(), field.parse(literal)?))
        })
        .collect()
}
