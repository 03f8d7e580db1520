mod common;

use eadscope::{
    run_pipeline, AnalysisConfig, ConfigLoadError, CorpusError, PipelineError, RunOptions,
    SpectralError,
};
use tempfile::tempdir;

use common::{write, write_three_pairs, MALFORMED};

fn with_k(k: usize) -> RunOptions {
    RunOptions {
        k: Some(k),
        detect_anomalies: false,
    }
}

#[test]
fn empty_corpus_reports_no_documents_found() {
    let dir = tempdir().unwrap();
    write(dir.path(), "readme.txt", "nothing to see");

    let result = run_pipeline(dir.path(), &AnalysisConfig::default(), &RunOptions::default());
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Corpus(CorpusError::NoDocuments { .. })
    ));
    assert!(err.to_string().contains("no documents found"));
}

#[test]
fn missing_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let result = run_pipeline(&missing, &AnalysisConfig::default(), &RunOptions::default());
    assert!(matches!(
        result,
        Err(PipelineError::Corpus(CorpusError::RootNotFound(_)))
    ));
}

#[test]
fn explicit_k_below_two_is_rejected() {
    let dir = tempdir().unwrap();
    write_three_pairs(dir.path());
    let result = run_pipeline(dir.path(), &AnalysisConfig::default(), &with_k(1));
    assert!(matches!(
        result,
        Err(PipelineError::InvalidK { k: 1, n: 6 })
    ));
}

#[test]
fn explicit_k_at_document_count_is_rejected() {
    let dir = tempdir().unwrap();
    write_three_pairs(dir.path());
    let err = run_pipeline(dir.path(), &AnalysisConfig::default(), &with_k(6)).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidK { k: 6, n: 6 }));
    assert!(err.to_string().contains("k=6"));
}

#[test]
fn explicit_k_is_checked_before_parsing() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        write(dir.path(), &format!("broken{i}.xml"), MALFORMED);
    }
    let result = run_pipeline(dir.path(), &AnalysisConfig::default(), &with_k(10));
    assert!(matches!(
        result,
        Err(PipelineError::InvalidK { k: 10, n: 3 })
    ));
}

#[test]
fn zero_top_n_is_rejected() {
    let dir = tempdir().unwrap();
    write_three_pairs(dir.path());
    let mut cfg = AnalysisConfig::default();
    cfg.summary.top_n = 0;
    let result = run_pipeline(dir.path(), &cfg, &with_k(3));
    assert!(matches!(
        result,
        Err(PipelineError::Config(ConfigLoadError::Validation(_)))
    ));
}

#[test]
fn selection_on_two_documents_has_empty_range() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.xml", common::HEADER_ONLY);
    write(dir.path(), "b.xml", common::DESCRIPTION_ONLY);
    let result = run_pipeline(dir.path(), &AnalysisConfig::default(), &RunOptions::default());
    assert!(matches!(
        result,
        Err(PipelineError::Spectral(SpectralError::EmptySearchRange { .. }))
    ));
}

#[test]
fn inverted_selector_range_is_rejected() {
    let dir = tempdir().unwrap();
    write_three_pairs(dir.path());
    let mut cfg = AnalysisConfig::default();
    cfg.selector.k_min = 5;
    cfg.selector.k_max = 3;
    let result = run_pipeline(dir.path(), &cfg, &RunOptions::default());
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn all_malformed_corpus_still_completes() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write(dir.path(), &format!("broken{i}.xml"), MALFORMED);
    }
    let report = run_pipeline(
        dir.path(),
        &AnalysisConfig::default(),
        &RunOptions {
            k: Some(2),
            detect_anomalies: true,
        },
    )
    .unwrap();

    assert_eq!(report.failures.len(), 4);
    assert_eq!(report.features.vocabulary.len(), 0);
    let anomalies = report.anomalies.unwrap();
    assert!(anomalies.iter().all(|r| r.suspect && r.mean_affinity == 0.0));
}
