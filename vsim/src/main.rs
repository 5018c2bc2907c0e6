use vsim::{Diagnostics, Scenario, ScenarioConfig};
use vsim::{bench_broad_phase, bench_broad_phase_curve};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Headless driver: loads a scenario and steps it like a render loop would.
#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "container.yaml")]
    file_name: String,

    /// Override the scenario's frame count
    #[arg(long)]
    frames: Option<usize>,

    /// Log diagnostics every this many frames
    #[arg(long, default_value_t = 60)]
    report_every: usize,

    /// Run the broad-phase benchmark instead of a scenario
    #[arg(long)]
    bench: bool,

    /// With --bench, print a CSV curve instead of the table
    #[arg(long)]
    curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", config_path.display()))?;

    log::debug!("{:?}", scenario_cfg);

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_broad_phase_curve()?;
        } else {
            bench_broad_phase()?;
        }
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(frames) = args.frames {
        scenario_cfg.frames = frames;
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let report_every = args.report_every.max(1);

    for frame in 1..=scenario.frames {
        scenario.step()?;

        if frame % report_every == 0 || frame == scenario.frames {
            let d = Diagnostics::measure(&scenario.solver);
            log::info!(
                "frame {:6}: {} particles, {} links, max overlap {:.2e}, max wall violation {:.2e}, max link strain {:.2e}",
                frame, d.particles, d.links, d.max_overlap, d.max_container_violation, d.max_link_strain
            );
            if d.non_finite {
                anyhow::bail!("non-finite particle position at frame {}", frame);
            }
        }
    }

    Ok(())
}
