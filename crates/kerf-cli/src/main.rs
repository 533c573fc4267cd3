//! kerf CLI - command-line interface for the kerf CAD/CAM kernel.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use kerf_core::prelude::*;

#[derive(Parser)]
#[command(name = "kerf")]
#[command(about = "Code-first SDF CAD/CAM kernel", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in demo parts
    List,

    /// Mesh a built-in part and export it as binary STL
    Mesh {
        /// Which built-in part to build
        #[arg(short, long, default_value = "bracket")]
        part: Part,

        /// Output STL file
        #[arg(short, long, default_value = "part.stl")]
        output: PathBuf,

        /// Marching-cubes voxel size
        #[arg(short, long, default_value = "0.5")]
        resolution: f64,
    },

    /// Run the ball-nose surfacing raster over a built-in part and emit
    /// Fanuc G-code
    Mill {
        /// Which built-in part to machine
        #[arg(short, long, default_value = "bracket")]
        part: Part,

        /// Output .nc file
        #[arg(short, long, default_value = "part.nc")]
        output: PathBuf,

        /// Ball-nose cutter diameter
        #[arg(long, default_value = "6.0")]
        tool_diameter: f64,

        /// Cutting feed rate, mm/min
        #[arg(long, default_value = "2000")]
        feed_rate: f64,

        /// Spindle speed, rpm
        #[arg(long, default_value = "10000")]
        rpm: f64,

        /// Stepover as a percentage of tool diameter
        #[arg(long, default_value = "50")]
        stepover_pct: f64,

        /// Safe retract height above the part
        #[arg(long, default_value = "50")]
        safe_z: f64,
    },

    /// Print a part's named faces as JSON
    Faces {
        /// Which built-in part to inspect
        #[arg(short, long, default_value = "bracket")]
        part: Part,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Part {
    Bracket,
    Plate,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            println!("bracket  - a plated box with a through-bore and fillet");
            println!("plate    - a flat plate with a 4-hole bolt circle");
        }
        Commands::Mesh {
            part,
            output,
            resolution,
        } => run_mesh(part, &output, resolution)?,
        Commands::Mill {
            part,
            output,
            tool_diameter,
            feed_rate,
            rpm,
            stepover_pct,
            safe_z,
        } => run_mill(part, &output, tool_diameter, feed_rate, rpm, stepover_pct, safe_z)?,
        Commands::Faces { part } => run_faces(part)?,
    }

    Ok(())
}

fn build_part(part: Part) -> Result<Node> {
    match part {
        Part::Bracket => {
            let shape = box3(60.0, 20.0, 40.0)?;
            let shape = hole(shape, "top", 8.0, HoleDepth::Through, None, Some("bore"))?;
            let shape = fillet(shape, "front.top", 2.0, None)?;
            Ok(shape)
        }
        Part::Plate => {
            let shape = box3(80.0, 10.0, 80.0)?;
            let shape = bolt_circle(shape, "top", 4, 60.0, 6.0, HoleDepth::Through, None, None, Some("mount"))?;
            Ok(shape)
        }
    }
}

fn run_mesh(part: Part, output: &PathBuf, resolution: f64) -> Result<()> {
    let shape = build_part(part)?;
    let config = MeshConfig::default().with_resolution(resolution);
    let mesh = marching_cubes(&shape, &config)?;

    println!(
        "meshed {:?}: {} vertices, {} triangles",
        part,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    export_stl(&mesh, output)?;
    println!("wrote {}", output.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_mill(
    part: Part,
    output: &PathBuf,
    tool_diameter: f64,
    feed_rate: f64,
    rpm: f64,
    stepover_pct: f64,
    safe_z: f64,
) -> Result<()> {
    let shape = build_part(part)?;
    let bounds = shape.bounds();

    let tool = ToolDefinition::ball_nose(format!("{tool_diameter}mm ball"), tool_diameter)?;
    let params = SurfacingParams::new(
        RasterDirection::X,
        stepover_pct,
        feed_rate,
        rpm,
        safe_z,
        safe_z * 0.4,
        bounds.max.y,
        bounds.min.y,
    )?;

    let toolpath = generate_raster_surfacing(&shape, &format!("{part:?}"), &tool, &params)?;
    println!(
        "{} passes, {:.1} mm cut, {:.1} mm rapid, est. {:.2} min",
        toolpath.statistics.pass_count,
        toolpath.statistics.cut_distance,
        toolpath.statistics.rapid_distance,
        toolpath.statistics.estimated_minutes
    );

    let gcode = emit_fanuc_gcode(&toolpath, &GCodeConfig::default())?;
    fs::write(output, gcode)?;
    println!("wrote {}", output.display());
    Ok(())
}

fn run_faces(part: Part) -> Result<()> {
    let shape = build_part(part)?;
    let faces = shape.faces();
    println!("{}", serde_json::to_string_pretty(&faces)?);
    Ok(())
}
