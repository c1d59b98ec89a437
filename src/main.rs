//! Command line front end: solve a scramble, benchmark every solver on random scrambles, or
//! evaluate the heuristics against the exact distances.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn, LevelFilter};
use thiserror::Error;

use pocket_cube::cube222::moves::{random_scramble, Move222};
use pocket_cube::cube222::solver::heuristic::{HeuristicKind, HeuristicReport};
use pocket_cube::cube222::solver::prune::{HeuristicTables, TableConfig};
use pocket_cube::cube222::solver::{AStarSolver, BfsSolver, Solver};
use pocket_cube::cube222::Cube222;
use pocket_cube::error::{ParseMoveError, SolveError, TableError};
use pocket_cube::fingerprint::Fingerprint;
use pocket_cube::moves::MoveSequence;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the pattern tables. Missing tables are generated and saved there.
    #[arg(long, default_value = ".", value_name = "DIR", global = true)]
    table_dir: PathBuf,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single scramble.
    Solve {
        /// The scramble to solve, e.g. "U R2 D' F' L2 B U2".
        #[arg(long)]
        scramble: String,
        /// The solver to use.
        #[arg(long, value_enum, default_value_t = SolverKind::AstarDual)]
        solver: SolverKind,
    },
    /// Time every solver on random scrambles, writing the results as CSV.
    Benchmark {
        /// How many scrambles to generate.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        num_scrambles: u32,
        /// Moves per scramble.
        #[arg(long, default_value_t = 15)]
        length: usize,
        /// Seed for the scramble generator. Random if not given.
        #[arg(long)]
        seed: Option<u64>,
        /// Where to write the results.
        #[arg(long, default_value = "benchmark_results.csv")]
        output: PathBuf,
    },
    /// Compare every heuristic to the exact distance of every state, writing the results as CSV.
    Heuristic {
        /// Where to write the results.
        #[arg(long, default_value = "heuristic_evaluation.csv")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverKind {
    Bfs,
    AstarPerfect,
    AstarDual,
    AstarOrientation,
    AstarPermutation,
}

impl SolverKind {
    /// In benchmark column order.
    const ARRAY: [SolverKind; 5] = [
        SolverKind::AstarPerfect,
        SolverKind::AstarDual,
        SolverKind::AstarOrientation,
        SolverKind::AstarPermutation,
        SolverKind::Bfs,
    ];

    fn heuristic(self) -> Option<HeuristicKind> {
        match self {
            SolverKind::Bfs => None,
            SolverKind::AstarPerfect => Some(HeuristicKind::Perfect),
            SolverKind::AstarDual => Some(HeuristicKind::Dual),
            SolverKind::AstarOrientation => Some(HeuristicKind::Orientation),
            SolverKind::AstarPermutation => Some(HeuristicKind::Permutation),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseMoveError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("the perfect table was not loaded")]
    NoPerfectTable,
    #[error("failed to write {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Solve the cube in place, returning the solution and how long the search took.
fn run_solver(
    cube: &mut Cube222,
    tables: &HeuristicTables,
    kind: SolverKind,
) -> Result<(MoveSequence<Move222>, Duration), CliError> {
    let start = Instant::now();
    let solution = match kind.heuristic() {
        None => {
            let mut solver = BfsSolver::new(cube);
            solver.solve()?;
            solver.solution()?.clone()
        }
        Some(heuristic) => {
            let heuristic = tables
                .heuristic(heuristic)
                .ok_or(CliError::NoPerfectTable)?;
            let mut solver = AStarSolver::new(cube, heuristic);
            solver.solve()?;
            solver.solution()?.clone()
        }
    };
    Ok((solution, start.elapsed()))
}

fn create_output(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CliError::Output {
            path: path.to_path_buf(),
            source,
        })
}

fn solve(table_dir: PathBuf, scramble: &str, kind: SolverKind) -> Result<(), CliError> {
    let mut cube = Cube222::from_moves(scramble)?;
    let config = TableConfig::new(table_dir, kind == SolverKind::AstarPerfect);
    let tables = HeuristicTables::load_or_generate(&config)?;

    match kind.heuristic() {
        Some(heuristic) => println!("Solving with A* using the {heuristic} heuristic..."),
        None => println!("Solving with BFS..."),
    }
    let (solution, elapsed) = run_solver(&mut cube, &tables, kind)?;

    println!("Scramble: {scramble}");
    println!("Solution: {solution}");
    println!("Solution Length: {} moves", solution.len());
    println!("Time: {:.6} seconds", elapsed.as_secs_f64());
    Ok(())
}

const BENCHMARK_HEADER: &str = "Scramble,Length,Perf,Dual,Ori,Perm,BFS";
const REPORT_HEADER: &str = "Hash,Perfect,Orientation,Permutation,Dual";

/// Every solver's result on one scramble, in [`SolverKind::ARRAY`] order.
struct BenchmarkRow {
    scramble: MoveSequence<Move222>,
    lengths: [usize; 5],
    seconds: [f64; 5],
}

fn benchmark_row(
    tables: &HeuristicTables,
    scramble: MoveSequence<Move222>,
) -> Result<BenchmarkRow, CliError> {
    let mut lengths = [0; 5];
    let mut seconds = [0.0; 5];
    for (i, kind) in SolverKind::ARRAY.into_iter().enumerate() {
        let mut cube = Cube222::new();
        cube.make_moves(&scramble);
        let (solution, elapsed) = run_solver(&mut cube, tables, kind)?;
        lengths[i] = solution.len();
        seconds[i] = elapsed.as_secs_f64();
    }

    if lengths.iter().any(|&l| l != lengths[0]) {
        warn!("solvers disagree on the length of {scramble}: {lengths:?}");
    }
    Ok(BenchmarkRow {
        scramble,
        lengths,
        seconds,
    })
}

fn write_benchmark_row(out: &mut impl Write, row: &BenchmarkRow) -> io::Result<()> {
    write!(out, "{},{}", row.scramble, row.lengths[0])?;
    for seconds in row.seconds {
        write!(out, ",{seconds}")?;
    }
    writeln!(out)
}

fn evaluation_report(tables: &HeuristicTables) -> Result<Vec<HeuristicReport>, CliError> {
    tables.evaluation_report().ok_or(CliError::NoPerfectTable)
}

fn write_report_row(out: &mut impl Write, row: &HeuristicReport) -> io::Result<()> {
    writeln!(
        out,
        "{},{},{},{},{}",
        row.fingerprint.repr(),
        row.perfect,
        row.orientation,
        row.permutation,
        row.dual
    )
}

fn benchmark(
    table_dir: PathBuf,
    num_scrambles: u32,
    length: usize,
    seed: Option<u64>,
    output: &Path,
) -> Result<(), CliError> {
    let tables = HeuristicTables::load_or_generate(&TableConfig::new(table_dir, true))?;
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let mut file = create_output(output)?;
    let write_err = |source| CliError::Output {
        path: output.to_path_buf(),
        source,
    };

    writeln!(file, "{BENCHMARK_HEADER}").map_err(write_err)?;
    for i in 1..=num_scrambles {
        // Opposite faces may still merge, e.g. U D U.
        let scramble = random_scramble(&mut rng, length).cancel();
        let row = benchmark_row(&tables, scramble)?;
        write_benchmark_row(&mut file, &row).map_err(write_err)?;
        info!("scrambles analysed: {i}/{num_scrambles}");
    }

    file.flush().map_err(write_err)?;
    println!("Wrote {num_scrambles} results to {}", output.display());
    Ok(())
}

fn heuristic(table_dir: PathBuf, output: &Path) -> Result<(), CliError> {
    let tables = HeuristicTables::load_or_generate(&TableConfig::new(table_dir, true))?;
    let report = evaluation_report(&tables)?;
    let mut file = create_output(output)?;
    let write_err = |source| CliError::Output {
        path: output.to_path_buf(),
        source,
    };

    writeln!(file, "{REPORT_HEADER}").map_err(write_err)?;
    for row in &report {
        write_report_row(&mut file, row).map_err(write_err)?;
    }

    file.flush().map_err(write_err)?;
    println!("Wrote {} states to {}", report.len(), output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let result = match cli.command {
        Commands::Solve { scramble, solver } => solve(cli.table_dir, &scramble, solver),
        Commands::Benchmark {
            num_scrambles,
            length,
            seed,
            output,
        } => benchmark(cli.table_dir, num_scrambles, length, seed, &output),
        Commands::Heuristic { output } => heuristic(cli.table_dir, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_cube::cube222::fingerprint::FullFingerprint;

    #[test]
    fn benchmark_csv() {
        let tables = HeuristicTables::generate(true);
        let mut rng = fastrand::Rng::with_seed(42);
        let scramble = random_scramble(&mut rng, 15).cancel();
        let row = benchmark_row(&tables, scramble.clone()).unwrap();

        let mut cube = Cube222::new();
        cube.make_moves(&scramble);
        let optimal = tables.perfect().unwrap().lookup(&cube) as usize;
        assert_eq!(row.lengths, [optimal; 5]);

        let mut out = vec![];
        writeln!(out, "{BENCHMARK_HEADER}").unwrap();
        write_benchmark_row(&mut out, &row).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Scramble,Length,Perf,Dual,Ori,Perm,BFS");

        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], scramble.to_string());
        assert_eq!(fields[0].parse::<MoveSequence<Move222>>(), Ok(scramble));
        assert_eq!(fields[1], optimal.to_string());
        for seconds in &fields[2..] {
            assert!(seconds.parse::<f64>().unwrap() >= 0.0);
        }
    }

    #[test]
    fn report_csv() {
        let solved = Cube222::SOLVED.fingerprint::<FullFingerprint>();
        let rows = [
            HeuristicReport {
                fingerprint: solved,
                perfect: 0,
                orientation: 0,
                permutation: 0,
                dual: 0,
            },
            HeuristicReport {
                fingerprint: Cube222::from_moves("R U").unwrap().fingerprint(),
                perfect: 2,
                orientation: 2,
                permutation: 1,
                dual: 2,
            },
        ];

        let mut out = vec![];
        writeln!(out, "{REPORT_HEADER}").unwrap();
        for row in &rows {
            write_report_row(&mut out, row).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Hash,Perfect,Orientation,Permutation,Dual");
        assert_eq!(lines[1], format!("{},0,0,0,0", solved.repr()));
        assert!(lines[2].ends_with(",2,2,1,2"));
        assert!(lines[1..].iter().all(|l| l.split(',').count() == 5));
    }

    #[test]
    fn perfect_table_required() {
        let tables = HeuristicTables::generate(false);
        let mut cube = Cube222::from_moves("R U").unwrap();
        assert!(matches!(
            run_solver(&mut cube, &tables, SolverKind::AstarPerfect),
            Err(CliError::NoPerfectTable)
        ));
        assert!(matches!(
            evaluation_report(&tables),
            Err(CliError::NoPerfectTable)
        ));

        let (solution, _) = run_solver(&mut cube, &tables, SolverKind::AstarDual).unwrap();
        assert_eq!(solution.len(), 2);
        assert!(cube.is_solved());
    }
}
