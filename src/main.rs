use std::fs;

use log::{error, info};
use nalgebra::Vector3;
use spacecoords::{
    build_triangulation_system, build_trilateration_system, least_squares, position_dop,
    solve_exact, solve_problem, Problem, SolverConfig,
};

/// Optional solver settings, read from the file named by this variable
const CONFIG_ENV: &str = "SPACECOORDS_CONFIG";

fn load_config() -> Result<SolverConfig, Box<dyn std::error::Error>> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => Ok(SolverConfig::from_file(path)?),
        Err(_) => Ok(SolverConfig::default()),
    }
}

/// Bearing-only fix of a target seen from three nearby stations
fn triangulation_demo(config: &SolverConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stations = vec![
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 0.0),
    ];
    let target = Vector3::new(3.0, 0.0, 20.0);
    let bearings: Vec<Vector3<f64>> = stations.iter().map(|s| (target - s).normalize()).collect();

    let system = build_triangulation_system(&stations, &bearings, config)?;
    let solved = solve_exact(&system, config)?;

    println!("=== Triangulation ===");
    println!("A = {}b = {}", system.a, system.b);
    println!("x = {}", solved.solution.transpose());
    println!("target = {}", target.transpose());
    Ok(())
}

/// Range-only fix of a target from four stations
fn trilateration_demo(config: &SolverConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stations = vec![
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(10.0, 1.0, 0.0),
        Vector3::new(0.0, -10.0, 5.0),
        Vector3::new(0.0, 0.0, -5.0),
    ];
    let target = Vector3::new(3.0, 0.0, 10.0);
    let ranges: Vec<f64> = stations.iter().map(|s| (target - s).norm()).collect();

    let system = build_trilateration_system(&stations, &ranges, config)?;
    let solved = least_squares(&system, config)?;
    let position = solved.position().ok_or("solution is not a 3D position")?;

    println!("=== Trilateration ===");
    println!("A = {}b = {}", system.a, system.b);
    println!("x = {}", position.transpose());
    println!("target = {}", target.transpose());
    println!("residual = {:e}, rank = {}", solved.residual, solved.rank);
    println!("PDOP = {:.3}", position_dop(&stations, &position));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = load_config()?;
    config.validate()?;

    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        triangulation_demo(&config)?;
        trilateration_demo(&config)?;
        return Ok(());
    }

    if args.len() != 2 {
        eprintln!(
            "Usage: {} [problem.json]",
            args.first().map_or("spacecoords", |s| s.as_str())
        );
        std::process::exit(1);
    }

    let content = fs::read_to_string(&args[1])?;
    let problem: Problem = serde_json::from_str(&content)?;
    info!("solving problem from {}", args[1]);

    match solve_problem(&problem, &config) {
        Ok(fix) => {
            println!("{}", serde_json::to_string_pretty(&fix)?);
            Ok(())
        }
        Err(e) => {
            error!("no position fix ({}): {}", e.kind(), e);
            if e.is_geometric() {
                error!("station geometry does not determine a unique point; add or spread stations");
            }
            Err(e.into())
        }
    }
}
