//! Basic processing tests for the batch processor

use super::{EXPORT_CSV, file_names, run_date, test_config, write_input};
use crate::models::{Disposition, Site};
use crate::processor::BatchProcessor;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_single_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let source = write_input(&config.input_dir, "Orders PC1.csv", EXPORT_CSV.as_bytes(), 60);

    let processor = BatchProcessor::new(config.clone(), run_date()).unwrap();
    let stats = processor.run().unwrap();

    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.files_processed, 1);
    assert!(stats.all_succeeded());
    assert_eq!(stats.lines.total, 3);
    assert_eq!(stats.lines.changed, 1);
    assert_eq!(stats.lines.unchanged, 2);

    let output = config.output_dir.join("synthomer_PC1_ESKER_2024-01-01.csv");
    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "order,customer,created,confirmed,a,b,c,d,e,f,due,g,shipped",
            "1001,\"Smith, J\",\"2023-12-25\",2023-12-26,x,y,z,h,i,j,2023-12-27,k,2023-12-28",
            "1002,Jones,N/A,,x,y,z,h,i,j,,k,",
        ]
    );

    assert!(!source.exists());
    assert!(config.processed_dir.join("Orders PC1.csv").exists());
    assert!(file_names(&config.failed_dir).is_empty());
    assert!(file_names(&config.input_dir).is_empty());
}

#[test]
fn test_same_site_same_day_gets_collision_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    fs::create_dir_all(&config.output_dir).unwrap();
    fs::write(
        config.output_dir.join("synthomer_PC1_ESKER_2024-01-01.csv"),
        "from an earlier run\n",
    )
    .unwrap();
    write_input(&config.input_dir, "first PC1.csv", EXPORT_CSV.as_bytes(), 300);
    write_input(&config.input_dir, "second PC1.csv", EXPORT_CSV.as_bytes(), 100);

    let stats = BatchProcessor::new(config.clone(), run_date())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(
        file_names(&config.output_dir),
        vec![
            "synthomer_PC1_ESKER_2024-01-01(1).csv",
            "synthomer_PC1_ESKER_2024-01-01(2).csv",
            "synthomer_PC1_ESKER_2024-01-01.csv",
        ]
    );
    assert_eq!(
        fs::read_to_string(config.output_dir.join("synthomer_PC1_ESKER_2024-01-01.csv")).unwrap(),
        "from an earlier run\n"
    );
}

#[test]
fn test_files_processed_oldest_first() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    write_input(&config.input_dir, "b PC1.csv", EXPORT_CSV.as_bytes(), 10);
    write_input(&config.input_dir, "a PC1.csv", EXPORT_CSV.as_bytes(), 500);
    write_input(&config.input_dir, "c P11.csv", EXPORT_CSV.as_bytes(), 250);

    let stats = BatchProcessor::new(config.clone(), run_date())
        .unwrap()
        .run()
        .unwrap();

    let order: Vec<String> = stats
        .reports
        .iter()
        .map(|r| r.source.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(order, vec!["a PC1.csv", "c P11.csv", "b PC1.csv"]);

    // The oldest PC1 export claims the plain name
    match &stats.reports[0].disposition {
        Disposition::Processed { outcome } => {
            assert_eq!(
                outcome.output_path,
                config.output_dir.join("synthomer_PC1_ESKER_2024-01-01.csv")
            );
        }
        other => panic!("Expected Processed, got {:?}", other),
    }
    assert!(config.output_dir.join("synthomer_P11_ESKER_2024-01-01.csv").exists());
    assert!(config.output_dir.join("synthomer_PC1_ESKER_2024-01-01(1).csv").exists());
}

#[test]
fn test_site_from_content_and_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir).with_default_site(Site::P11);
    write_input(
        &config.input_dir,
        "export_a.csv",
        b"plant,order,created\nPC1,1,25/12/2023\n",
        200,
    );
    write_input(
        &config.input_dir,
        "export_b.csv",
        b"plant,order,created\nXX,2,25/12/2023\n",
        100,
    );

    let stats = BatchProcessor::new(config.clone(), run_date())
        .unwrap()
        .run()
        .unwrap();

    let sites: Vec<Site> = stats
        .reports
        .iter()
        .map(|r| match &r.disposition {
            Disposition::Processed { outcome } => outcome.site,
            other => panic!("Expected Processed, got {:?}", other),
        })
        .collect();
    assert_eq!(sites, vec![Site::Pc1, Site::P11]);

    let pc1 = fs::read_to_string(config.output_dir.join("synthomer_PC1_ESKER_2024-01-01.csv"))
        .unwrap();
    assert_eq!(pc1, "plant,order,created\nPC1,1,2023-12-25\n");
}

#[test]
fn test_empty_input_folder() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let stats = BatchProcessor::new(config.clone(), run_date())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(stats.files_discovered, 0);
    assert!(stats.all_succeeded());
    assert!(config.output_dir.is_dir());
    assert!(config.processed_dir.is_dir());
    assert!(config.failed_dir.is_dir());
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let source = write_input(&config.input_dir, "Orders P11.csv", EXPORT_CSV.as_bytes(), 60);

    let stats = BatchProcessor::new(config.clone(), run_date())
        .unwrap()
        .with_dry_run(true)
        .run()
        .unwrap();

    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.files_processed, 0);
    assert_eq!(
        stats.reports[0].disposition,
        Disposition::Skipped { site: Site::P11 }
    );
    assert!(source.exists());
    assert!(!config.output_dir.exists());
}

#[test]
fn test_custom_pattern_and_line_ending() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir)
        .with_file_pattern("*.txt")
        .with_columns(&[], &[2])
        .with_line_ending(crate::config::LineEnding::Crlf);
    write_input(&config.input_dir, "PC1.txt", b"h1,h2\n1,01/02/2024\n", 60);
    write_input(&config.input_dir, "PC1.csv", b"ignored\n", 60);

    let stats = BatchProcessor::new(config.clone(), run_date())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(stats.files_processed, 1);
    let written = fs::read_to_string(config.output_dir.join("synthomer_PC1_ESKER_2024-01-01.csv"))
        .unwrap();
    assert_eq!(written, "h1,h2\r\n1,2024-02-01\r\n");
    assert!(config.input_dir.join("PC1.csv").exists());
}
