use clap::Parser;
use ndarray::{array, Array2};
use pca_reconstruct::{EigenSolverKind, PcaConfig, PcaError, PcaPipeline};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Reconstruct a dataset from its top principal components
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file with one sample per row. Uses a built-in 3x3 matrix when omitted.
    filename: Option<PathBuf>,

    /// Number of principal components to keep
    #[arg(short = 'k', long, default_value_t = 1)]
    components: usize,

    /// Use the general eigen solver instead of the symmetric one
    #[arg(long)]
    general: bool,
}

fn load_csv(path: &Path) -> Result<Array2<f64>, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Could not read file {}: {}", path.display(), e))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let row = trimmed
            .split(',')
            .map(|field| field.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| format!("Line {}: {}", line_idx + 1, e))?;
        rows.push(row);
    }

    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(Box::new(PcaError::Shape {
            context: "CSV dataset (ragged row: index, length)",
            shape: vec![bad, rows[bad].len()],
        }));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((n_rows, n_cols), flat)?)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let data = match &args.filename {
        Some(path) => load_csv(path)?,
        None => array![[3.0, 6.0, 7.0], [8.0, 9.0, 0.0], [1.0, 5.0, 2.0]],
    };

    let config = PcaConfig {
        eigen_solver: if args.general {
            EigenSolverKind::General
        } else {
            EigenSolverKind::Symmetric
        },
        ..PcaConfig::default()
    };
    let output = PcaPipeline::new(config).run(data.view(), args.components)?;

    println!("Reconstruction matrix:\n{:.6}", output.reconstruction());
    println!("Sample mean: {:.6}", output.mean());
    println!("Principal values: {:.6}", output.principal_values());
    println!("Principal components:\n{:.6}", output.principal_components());
    println!(
        "Explained variance ratio: {:.4}",
        output.explained_variance_ratio()
    );
    println!(
        "Reconstruction error (Frobenius): {:.6}",
        output.reconstruction_error(data.view())?
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
