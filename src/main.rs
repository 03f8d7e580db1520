use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eadscope::{export_report, run_pipeline, AnalysisConfig, CandidateOutcome, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "eadscope",
    about = "Structural clustering and anomaly detection for XML finding-aid corpora"
)]
struct Cli {
    /// Directory holding the XML documents (searched recursively)
    corpus_dir: PathBuf,

    /// Cluster count to use; skips automatic selection
    #[arg(long)]
    k: Option<usize>,

    /// Score every document for structural anomalies
    #[arg(long)]
    detect_anomalies: bool,

    /// YAML analysis configuration
    #[arg(long, env = "EADSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Smallest cluster count tried by automatic selection
    #[arg(long)]
    k_min: Option<usize>,

    /// Largest cluster count tried by automatic selection
    #[arg(long)]
    k_max: Option<usize>,

    /// Structural paths reported per cluster
    #[arg(long)]
    top_n: Option<usize>,

    /// Seed for the clustering initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// Directory receiving exported tables
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "EADSCOPE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut cfg = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };
        if let Some(k_min) = self.k_min {
            cfg.selector.k_min = k_min;
        }
        if let Some(k_max) = self.k_max {
            cfg.selector.k_max = k_max;
        }
        if let Some(top_n) = self.top_n {
            cfg.summary.top_n = top_n;
        }
        if let Some(seed) = self.seed {
            cfg.spectral.seed = seed;
        }
        if let Some(out_dir) = &self.out_dir {
            cfg.export.out_dir = out_dir.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let cfg = cli.analysis_config()?;
    let opts = RunOptions {
        k: cli.k,
        detect_anomalies: cli.detect_anomalies,
    };

    let report = run_pipeline(&cli.corpus_dir, &cfg, &opts)?;

    if let Some(selection) = &report.selection {
        for candidate in &selection.candidates {
            let status = match &candidate.outcome {
                CandidateOutcome::Scored { score } => format!("{score:.4}"),
                CandidateOutcome::SingleCluster => "single cluster".to_string(),
                CandidateOutcome::Failed { reason } => format!("failed ({reason})"),
            };
            println!("k={:>2}  silhouette {status}", candidate.k);
        }
        if let Some(gap) = selection.eigengap.as_ref().and_then(|g| g.suggested_k) {
            println!("eigengap suggests k={gap}");
        }
        println!("recommended k={}", selection.recommended_k);
    }

    for cluster in &report.clusters.clusters {
        println!(
            "\n--- Cluster {} ({} documents) ---",
            cluster.cluster,
            cluster.size()
        );
        for member in cluster.members.iter().take(cfg.summary.preview_members) {
            println!("  - {member}");
        }
        for path in &cluster.top_paths {
            println!("    {} : {}", path.path, path.count);
        }
    }

    if let Some(anomalies) = &report.anomalies {
        let suspects = anomalies.iter().filter(|r| r.suspect).count();
        println!("\n{suspects} suspect document(s) of {}", anomalies.len());
        for record in anomalies.iter().filter(|r| r.suspect) {
            println!(
                "  ! {} (cluster {}, cohesion {:.3}, mean affinity {:.3})",
                record.filepath, record.cluster, record.cohesion, record.mean_affinity
            );
        }
    }

    if cfg.export.enabled {
        for files in export_report(&report, &cfg.export_config())? {
            println!("exported {} and {}", files.csv.display(), files.json.display());
        }
    }

    Ok(())
}
