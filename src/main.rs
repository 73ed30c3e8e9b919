//! Command-line interface for xmlschema-structures

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use serde::Serialize;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xmlschema_structures::{Component, ContentType, Schema, TypeDefinition, TypeId};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmlschema-structures")]
#[command(author, version, about = "XML Schema component model inspector", long_about = None)]
struct Cli {
    /// Log resolution progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a schema and list the type definitions it declares
    Inspect {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Show only the named type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inspect {
            schema,
            type_name,
            json,
        } => cmd_inspect(schema, type_name, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    schema_path: PathBuf,
    type_name: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::from_file(&schema_path)?;

    let selected: Vec<(String, TypeId)> = match type_name {
        Some(name) => {
            let id = schema
                .schema_type_names()
                .find(|(declared, _)| *declared == name)
                .map(|(_, id)| id)
                .ok_or_else(|| format!("Type '{}' not found in schema", name))?;
            vec![(name, id)]
        }
        None => schema
            .schema_type_names()
            .map(|(name, id)| (name.to_string(), id))
            .collect(),
    };

    if json_output {
        print_types_json(&schema, &selected)?;
    } else {
        print_types(&schema, &selected);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn type_label(schema: &Schema, id: Option<TypeId>) -> Option<String> {
    let id = id?;
    schema.type_definition(id).map(|t| t.display_name())
}

#[cfg(feature = "cli")]
fn content_summary(schema: &Schema, content: &ContentType) -> String {
    match content {
        ContentType::Empty => "empty".to_string(),
        ContentType::Simple(id) => format!(
            "simple ({})",
            type_label(schema, Some(*id)).unwrap_or_default()
        ),
        ContentType::ElementOnly(particle) | ContentType::Mixed(particle) => {
            let compositor = particle
                .model_group()
                .map(|g| format!("{} of {}", g.compositor.as_str(), g.len()))
                .unwrap_or_else(|| "particle".to_string());
            format!("{} ({})", content.label(), compositor)
        }
    }
}

#[cfg(feature = "cli")]
fn print_types(schema: &Schema, types: &[(String, TypeId)]) {
    println!("xmlschema-structures v{}", xmlschema_structures::VERSION);
    println!();
    match &schema.target_namespace {
        Some(ns) => println!("Target Namespace: {}", ns),
        None => println!("Target Namespace: (none)"),
    }
    println!("Type definitions: {}", schema.type_count());

    println!("\n=== Declared Types ===");
    for (name, id) in types {
        let Some(definition) = schema.type_definition(*id) else {
            continue;
        };
        let base = type_label(schema, definition.base_type()).unwrap_or_else(|| "-".to_string());
        match definition {
            TypeDefinition::Simple(st) => {
                let variety = st.variety.as_ref().map(|v| v.as_str()).unwrap_or("unresolved");
                println!("  {} (simple, {}) base={}", name, variety, base);
            }
            TypeDefinition::Complex(ct) => {
                let derivation = ct.derivation.map(|d| d.as_str()).unwrap_or("unresolved");
                let content = ct
                    .content_type
                    .as_ref()
                    .map(|c| content_summary(schema, c))
                    .unwrap_or_else(|| "unresolved".to_string());
                println!(
                    "  {} (complex, {}) base={} content={} attributes={}",
                    name,
                    derivation,
                    base,
                    content,
                    ct.attribute_uses.len()
                );
            }
        }
    }

    let elements: Vec<&str> = schema.element_names().collect();
    if !elements.is_empty() {
        println!("\n=== Global Elements ===");
        for name in elements {
            println!("  {}", name);
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaSummary<'a> {
    target_namespace: Option<&'a str>,
    type_count: usize,
    types: Vec<TypeSummary>,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeSummary {
    name: String,
    qualified_name: Option<String>,
    kind: &'static str,
    base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variety: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    derivation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'static str>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    is_abstract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<usize>,
    builtin: bool,
}

#[cfg(feature = "cli")]
impl TypeSummary {
    fn new(schema: &Schema, name: &str, id: TypeId, definition: &TypeDefinition) -> Self {
        let mut summary = TypeSummary {
            name: name.to_string(),
            qualified_name: schema.qualified_name(id),
            kind: if definition.is_simple() { "simple" } else { "complex" },
            base: type_label(schema, definition.base_type()),
            variety: None,
            derivation: None,
            content: None,
            is_abstract: None,
            attributes: None,
            builtin: definition.is_builtin(),
        };
        match definition {
            TypeDefinition::Simple(st) => {
                summary.variety = st.variety.as_ref().map(|v| v.as_str());
            }
            TypeDefinition::Complex(ct) => {
                summary.derivation = ct.derivation.map(|d| d.as_str());
                summary.content = ct.content_type.as_ref().map(|c| c.label());
                summary.is_abstract = Some(ct.is_abstract);
                summary.attributes = Some(ct.attribute_uses.len());
            }
        }
        summary
    }
}

#[cfg(feature = "cli")]
fn print_types_json(
    schema: &Schema,
    types: &[(String, TypeId)],
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = SchemaSummary {
        target_namespace: schema.target_namespace.as_deref(),
        type_count: schema.type_count(),
        types: types
            .iter()
            .filter_map(|(name, id)| {
                let definition = schema.type_definition(*id)?;
                Some(TypeSummary::new(schema, name, *id, definition))
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
