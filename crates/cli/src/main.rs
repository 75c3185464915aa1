use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::fmt::SubscriberBuilder;

use flowtope::api::{
    presets, DagCliques, DagCliquesRecord, FlowPolytope, FlowPolytopeRecord, FramedDag,
    FramedDagRecord,
};

#[derive(Parser)]
#[command(name = "flowtope")]
#[command(about = "Flow polytope pipeline runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// A framed DAG input: either a preset name or a JSON record on disk.
#[derive(Args)]
struct DagSource {
    /// Named preset DAG (see `presets`)
    #[arg(long, conflicts_with = "dag")]
    preset: Option<String>,
    /// Path to a framed DAG JSON record
    #[arg(long)]
    dag: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Action {
    /// List the built-in preset DAGs
    Presets,
    /// Check a framed DAG record and print a structural summary
    Validate {
        #[command(flatten)]
        source: DagSource,
    },
    /// Run the full pipeline and write the combined JSON document
    Compute {
        #[command(flatten)]
        source: DagSource,
        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Everything one pipeline run produces, in record form.
#[derive(serde::Serialize)]
struct ComputeDoc {
    cliques: DagCliquesRecord,
    polytope: FlowPolytopeRecord,
    quotient: Option<FlowPolytopeRecord>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Presets => {
            for name in presets::NAMES {
                println!("{name}");
            }
            Ok(())
        }
        Action::Validate { source } => validate(&load_dag(&source)?),
        Action::Compute { source, out } => {
            let doc = compute_doc(&load_dag(&source)?)?;
            write_output(out.as_deref(), &serde_json::to_string_pretty(&doc)?)
        }
    }
}

fn load_dag(source: &DagSource) -> Result<FramedDag> {
    match (&source.preset, &source.dag) {
        (Some(name), None) => presets::by_name(name).with_context(|| {
            format!(
                "unknown preset `{name}` (known: {})",
                presets::NAMES.join(", ")
            )
        }),
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let record: FramedDagRecord = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(record.load()?)
        }
        _ => bail!("pass exactly one of --preset or --dag"),
    }
}

fn validate(dag: &FramedDag) -> Result<()> {
    let sources = dag.sources();
    let sinks = dag.sinks();
    let summary = serde_json::json!({
        "num_verts": dag.num_verts(),
        "num_edges": dag.num_edges(),
        "sources": sources,
        "sinks": sinks,
        "valid": dag.is_valid(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if !dag.is_valid() {
        bail!(
            "dag is not a valid pipeline input: {} sources, {} sinks",
            sources.len(),
            sinks.len()
        );
    }
    Ok(())
}

fn compute_doc(dag: &FramedDag) -> Result<ComputeDoc> {
    let cliques = DagCliques::new(dag)?;
    tracing::info!(
        routes = cliques.routes().len(),
        cliques = cliques.cliques().len(),
        clique_size = cliques.clique_size(),
        "enumerated route complex"
    );
    let polytope = FlowPolytope::from_cliques(&cliques)?;
    let quotient = polytope.quotient(&cliques)?;
    tracing::info!(
        dim = polytope.dim,
        quotient_dim = quotient.as_ref().map(|q| q.dim),
        "reduced polytope"
    );
    Ok(ComputeDoc {
        cliques: DagCliquesRecord::of(&cliques),
        polytope: FlowPolytopeRecord::of(&polytope),
        quotient: quotient.as_ref().map(FlowPolytopeRecord::of),
    })
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        None => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(out = %path.display(), "wrote document");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn source(preset: Option<&str>, dag: Option<PathBuf>) -> DagSource {
        DagSource {
            preset: preset.map(str::to_string),
            dag,
        }
    }

    #[test]
    fn load_dag_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("square.json");
        let record = FramedDagRecord::of(&presets::square());
        fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();
        let dag = load_dag(&source(None, Some(path))).unwrap();
        assert_eq!(dag, presets::square());
    }

    #[test]
    fn load_dag_rejects_missing_or_unknown_sources() {
        assert!(load_dag(&source(None, None)).is_err());
        assert!(load_dag(&source(Some("no-such-preset"), None)).is_err());
    }

    #[test]
    fn compute_doc_runs_the_whole_pipeline() {
        let doc = compute_doc(&presets::square()).unwrap();
        assert_eq!(doc.cliques.routes.len(), 4);
        assert_eq!(doc.cliques.cliques.len(), 2);
        assert_eq!(doc.polytope.dim, 2);
        assert_eq!(doc.quotient.as_ref().unwrap().dim, 1);
    }

    #[test]
    fn compute_writes_a_reloadable_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/cube.json");
        let doc = compute_doc(&presets::cube()).unwrap();
        write_output(Some(&path), &serde_json::to_string_pretty(&doc).unwrap()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let cliques: DagCliquesRecord =
            serde_json::from_value(parsed["cliques"].clone()).unwrap();
        assert_eq!(cliques.load().unwrap().cliques().len(), 6);
    }

    #[test]
    fn validate_rejects_a_two_sink_dag() {
        let mut dag = FramedDag::new(3);
        dag.add_edge(0, 1).unwrap();
        dag.add_edge(0, 2).unwrap();
        assert!(validate(&dag).is_err());
        assert!(validate(&presets::chorded()).is_ok());
    }
}
