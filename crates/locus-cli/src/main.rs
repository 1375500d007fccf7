use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use locus_model::{BuildError, LocationProblem, NodeId, Solution, Statistics};
use locus_solver::binomial;

#[derive(Parser)]
#[command(name = "locus")]
#[command(about = "Exact p-median and maximum covering facility location", long_about = None)]
struct Cli {
    /// Log search progress (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print the optimal facilities
    Solve {
        /// JSON problem file
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a problem file and report the size of the search
    Check {
        /// JSON problem file
        file: PathBuf,
    },
    /// Print the cost or coverage matrix built from a problem file
    Matrix {
        /// JSON problem file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Solve { file, format } => {
            let problem = load(&file);

            let solution = match problem.solve() {
                Ok(Some(s)) => s,
                Ok(None) => {
                    println!("Nothing to solve: the problem has no usable facilities or demands.");
                    return;
                }
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error writing JSON: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print_solution(&problem, &solution);
            }
        }
        Commands::Check { file } => {
            let problem = load(&file);

            let (rows, cols, excluded) = match &problem {
                LocationProblem::PMedian(pm) => match pm.cost_table() {
                    Ok(t) => (t.matrix.rows(), t.matrix.cols(), t.excluded),
                    Err(e) => report_build_error(&file, e),
                },
                LocationProblem::Mclp(mc) => match mc.coverage_table() {
                    Ok(t) => (t.matrix.rows(), t.matrix.cols(), Vec::new()),
                    Err(e) => report_build_error(&file, e),
                },
            };

            let p = problem.p().min(cols);
            println!("✓ {} is valid", file.display());
            println!("  {} demands", rows);
            println!("  {} facility candidates", cols);
            if !excluded.is_empty() {
                println!("  excluded (non-finite cost): {:?}", excluded);
            }
            match binomial(cols as u64, p as u64) {
                Some(n) => println!("  {} subsets of size {} to score", n, p),
                None => println!("  more than {} subsets of size {} to score", u64::MAX, p),
            }
        }
        Commands::Matrix { file } => {
            let problem = load(&file);

            let (facility_ids, demand_ids, rows) = match &problem {
                LocationProblem::PMedian(pm) => match pm.cost_table() {
                    Ok(t) => (t.facility_ids, t.demand_ids, t.matrix.to_rows()),
                    Err(e) => report_build_error(&file, e),
                },
                LocationProblem::Mclp(mc) => match mc.coverage_table() {
                    Ok(t) => {
                        let rows: Vec<Vec<f64>> = t
                            .matrix
                            .iter_rows()
                            .map(|row| row.iter().map(|&c| if c { 1.0 } else { 0.0 }).collect())
                            .collect();
                        (t.facility_ids, t.demand_ids, rows)
                    }
                    Err(e) => report_build_error(&file, e),
                },
            };

            print!("{:>10}", "demand");
            for id in &facility_ids {
                print!("{:>10}", format!("f{}", id));
            }
            println!();
            for (id, row) in demand_ids.iter().zip(&rows) {
                print!("{:>10}", id);
                for value in row {
                    print!("{:>10.2}", value);
                }
                println!();
            }
        }
    }
}

fn load(file: &Path) -> LocationProblem {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn report_build_error(file: &Path, e: BuildError) -> ! {
    eprintln!("✗ {} has errors:", file.display());
    eprintln!("  {}", e);
    std::process::exit(1);
}

fn print_solution(problem: &LocationProblem, solution: &Solution) {
    let label = |id: NodeId| -> String {
        let name = match problem {
            LocationProblem::PMedian(pm) => pm
                .facilities
                .iter()
                .find(|f| f.info.id == id)
                .map(|f| f.info.label.clone()),
            LocationProblem::Mclp(mc) => mc
                .facilities
                .iter()
                .find(|f| f.info.id == id)
                .map(|f| f.info.label.clone()),
        };
        name.unwrap_or_else(|| id.to_string())
    };

    println!("Status: OPTIMAL ({} subsets scored)", solution.evaluated);
    match solution.statistics {
        Statistics::Median { total_weight, mean_cost } => {
            println!("Total cost: {:.2}", solution.objective);
            println!("Mean cost: {:.2} (total weight {:.2})", mean_cost, total_weight);
        }
        Statistics::Coverage {
            covered,
            uncovered,
            total_weight,
            coverage_pct,
        } => {
            println!("Covered demand: {:.2}", solution.objective);
            println!(
                "Coverage: {:.2}% of weight {:.2} ({} covered, {} uncovered)",
                coverage_pct, total_weight, covered, uncovered
            );
        }
    }
    println!();

    println!("Opened facilities:");
    for id in &solution.facilities {
        println!("  {:20} ({})", label(*id), id);
    }
    println!();

    println!("Assignments:");
    for (facility, demands) in solution.groups() {
        let served: Vec<String> = demands
            .iter()
            .map(|d| {
                let cost = solution
                    .assignments
                    .iter()
                    .find(|a| a.demand == *d)
                    .and_then(|a| a.service.cost());
                match cost {
                    Some(c) => format!("{} ({:.2})", d, c),
                    None => d.to_string(),
                }
            })
            .collect();
        let served = if served.is_empty() { "(none)".to_string() } else { served.join(", ") };
        println!("  {:20} {}", label(facility), served);
    }

    let unassigned = solution.unassigned();
    if !unassigned.is_empty() {
        println!("  {:20} {:?}", "unassigned", unassigned);
    }
}
