use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;

use viewspace::{compute_transforms, format_matrix, Bootstrap, HeadlessEngine, ViewConfig};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let mut config = match &options.config_path {
        Some(path) => {
            let xml = fs::read_to_string(path)
                .with_context(|| format!("failed to read view config {path}"))?;
            ViewConfig::from_xml(&xml)
                .with_context(|| format!("failed to parse view config {path}"))?
        }
        None => ViewConfig::default(),
    };
    if let Some(offset) = options.offset {
        config.offset = offset;
    }

    let frustum = config.frustum();
    println!(
        "View frustum: fov={:.1} deg aspect={:.4} near={} far={}",
        config.fov_degrees, frustum.aspect, frustum.z_near, frustum.z_far
    );

    let transforms = compute_transforms(frustum, config.offset)?;
    println!("Projection matrix:\n{}", format_matrix(&transforms.projection));
    println!("Model-view matrix:\n{}", format_matrix(&transforms.model_view));

    if options.start_engine {
        println!("Starting engine...");
        Bootstrap::new(Box::new(HeadlessEngine::new(config))).start()?;
        println!("Engine finished.");
    }

    Ok(())
}

struct CliOptions {
    config_path: Option<String>,
    offset: Option<Vec3>,
    start_engine: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut options = Self {
            config_path: None,
            offset: None,
            start_engine: false,
        };
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--start-engine" => options.start_engine = true,
                "--offset" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--offset needs a value, e.g. --offset 0,0,-6"))?;
                    options.offset = Some(parse_offset(&value)?);
                }
                other if other.starts_with("--") => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: viewspace [<view.xml>] [--offset x,y,z] [--start-engine]"
                    ));
                }
                path => {
                    if options.config_path.is_some() {
                        return Err(anyhow!("only one view config path may be given"));
                    }
                    options.config_path = Some(path.to_string());
                }
            }
        }
        Ok(options)
    }
}

fn parse_offset(value: &str) -> Result<Vec3> {
    let components = value
        .split(',')
        .map(|component| component.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| anyhow!("failed to parse offset {value:?}: {err}"))?;
    if components.len() != 3 {
        return Err(anyhow!(
            "offset needs three components, got {}",
            components.len()
        ));
    }
    Ok(Vec3::from_slice(&components))
}
