// Command-line demo: load a nav file and print the path between two points.
//
// Prints the simple waypoint path, then the detailed path with each node's
// kind, then the detailed path length. Log output goes through
// `tracing-subscriber`; set `RUST_LOG=nav_mesh=debug` to see load and
// adjacency details.
//
// Usage:
//   nav_mesh_demo <FILE.nav> [OPTIONS]
//     --from <X> <Y> <Z>      Start point (default: -1917 11169 -127)
//     --to <X> <Y> <Z>        End point (default: 1276 1775 -156)
//     --avoid <ID,ID,...>     Area ids to route around
//     --config <FILE.json>    Tunables (see `NavConfig`)

use std::collections::BTreeSet;
use std::path::PathBuf;

use nav_mesh::{AreaId, NavConfig, NavMesh, PathNodeKind, Vec3};
use tracing_subscriber::EnvFilter;

struct DemoArgs {
    nav_file: PathBuf,
    from: Vec3,
    to: Vec3,
    avoid: BTreeSet<AreaId>,
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();

    let config = match &args.config {
        Some(path) => NavConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to read config {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => NavConfig::default(),
    };

    let mut mesh = match NavMesh::open_with_config(&args.nav_file, config) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        areas = mesh.area_count(),
        version = mesh.version(),
        sub_version = mesh.sub_version(),
        "loaded {}",
        args.nav_file.display()
    );

    if !args.avoid.is_empty() {
        mesh.set_avoidance_set(args.avoid);
    }

    match mesh.find_path(args.from, args.to) {
        Ok(Some(points)) => {
            for p in &points {
                println!("find_path point: ({}, {}, {})", p.x, p.y, p.z);
            }
        }
        Ok(None) => println!("No path found."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    match mesh.find_path_detailed(args.from, args.to) {
        Ok(Some(nodes)) => {
            for node in &nodes {
                let p = node.pos;
                let tag = match node.kind {
                    PathNodeKind::Area { id } => format!("area {id}"),
                    PathNodeKind::Boundary { from, to } => format!("seam {from}->{to}"),
                };
                println!("find_path_detail point: ({}, {}, {}) [{tag}]", p.x, p.y, p.z);
            }
            println!("length: {}", NavMesh::path_length(&nodes));
        }
        Ok(None) => println!("No detailed path found."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching,
/// like the other tools in this workspace.
fn parse_args() -> DemoArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut nav_file = None;
    let mut parsed = DemoArgs {
        nav_file: PathBuf::new(),
        from: Vec3::new(-1917.0, 11169.0, -127.0),
        to: Vec3::new(1276.0, 1775.0, -156.0),
        avoid: BTreeSet::new(),
        config: None,
    };
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--from" => {
                parsed.from = parse_point(&args, i + 1, "--from");
                i += 3;
            }
            "--to" => {
                parsed.to = parse_point(&args, i + 1, "--to");
                i += 3;
            }
            "--avoid" => {
                i += 1;
                parsed.avoid = args
                    .get(i)
                    .and_then(|s| {
                        s.split(',')
                            .map(|id| id.trim().parse().ok().map(AreaId))
                            .collect::<Option<BTreeSet<_>>>()
                    })
                    .unwrap_or_else(|| {
                        eprintln!("--avoid requires a comma-separated list of area ids");
                        std::process::exit(1);
                    });
            }
            "--config" => {
                i += 1;
                parsed.config = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
            other => {
                if nav_file.is_some() {
                    eprintln!("Unexpected extra argument: {other}");
                    print_usage();
                    std::process::exit(1);
                }
                nav_file = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    parsed.nav_file = nav_file.unwrap_or_else(|| {
        print_usage();
        std::process::exit(1);
    });
    parsed
}

/// Read three floats starting at `args[start]`; the caller skips past them.
fn parse_point(args: &[String], start: usize, flag: &str) -> Vec3 {
    let coords: Option<Vec<f32>> = args
        .get(start..start + 3)
        .and_then(|s| s.iter().map(|v| v.parse().ok()).collect());
    match coords.as_deref() {
        Some(&[x, y, z]) => Vec3::new(x, y, z),
        _ => {
            eprintln!("{flag} requires three numbers: X Y Z");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Usage: nav_mesh_demo <FILE.nav> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --from <X> <Y> <Z>      Start point (default: -1917 11169 -127)");
    println!("  --to <X> <Y> <Z>        End point (default: 1276 1775 -156)");
    println!("  --avoid <ID,ID,...>     Area ids to route around");
    println!("  --config <FILE.json>    Tunables as JSON");
    println!("  --help, -h              Show this help");
}
