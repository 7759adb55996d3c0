//! # Scene Exploration
//!
//! Random walk through every discovered scene. For each scene the agent is
//! dropped at a random navigable point and takes `max_frames` random
//! discrete actions. Every tenth frame is kept: saved as an
//! RGB/semantic/depth sample when display is on, and collected into a GIF
//! when video is on.

use anyhow::{Context, Result};
use episode::{ActionPolicy, SensorValue, UniformRandom};
use kinematic::{KinematicSim, NavigableArea, Pose};
use scene::{scene_loader, SceneAssets};
use settings::{make_cfg, SimSettings};
use std::path::PathBuf;
use tracing::{info, warn};
use visualize::{create_gif_from_frames, display_sample_save, save_topdown_map, GifOptions, SampleFiles};

use crate::cli::ExploreArgs;
use crate::evaluate::load_settings;
use crate::report::print_agent_state;

/// Frames between two kept samples.
pub const SAMPLE_INTERVAL: usize = 10;
/// Cells per side of the saved top-down map.
pub const MAP_CELLS: usize = 64;

/// Files produced for one scene.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneReport {
    pub scene: String,
    pub frames: usize,
    pub samples: Vec<SampleFiles>,
    pub top_down_map: Option<PathBuf>,
    pub video: Option<PathBuf>,
}

/// Run `body` against `sim`, closing the simulator however `body` exits.
fn close_after<T>(sim: &mut KinematicSim, body: impl FnOnce(&mut KinematicSim) -> Result<T>) -> Result<T> {
    let result = body(sim);
    sim.close();
    result
}

fn explore_scene(
    assets: &SceneAssets,
    base: &SimSettings,
    args: &ExploreArgs,
    rng: &mut fastrand::Rng,
) -> Result<SceneReport> {
    let settings = SimSettings { scene: assets.basis_glb.display().to_string(), ..base.clone() };
    let mut sim = KinematicSim::new(make_cfg(&settings), NavigableArea::default())
        .with_context(|| format!("Failed to create simulator for {}", assets.folder))?;

    close_after(&mut sim, |sim| {
        sim.load_navmesh(&assets.navmesh)
            .with_context(|| format!("NavMesh could not be loaded for scene {}", assets.folder))?;

        let start = sim.random_navigable_point(rng);
        sim.set_agent_state(Pose::new(start, 0.0));
        print_agent_state(&sim.agent_state());

        let action_names = sim.agent().action_names();
        info!("Discrete action space: {action_names:?}");
        if action_names.is_empty() {
            anyhow::bail!("Scene {} has no actions to explore with", assets.folder);
        }
        let mut policy = UniformRandom::new(action_names, rng.u64(..));
        record_walk(sim, &mut policy, &assets.folder, args)
    })
}

/// Walk `args.max_frames` steps chosen by `policy`, keeping every
/// [`SAMPLE_INTERVAL`]th frame.
fn record_walk<P>(sim: &mut KinematicSim, policy: &mut P, folder: &str, args: &ExploreArgs) -> Result<SceneReport>
where
    P: ActionPolicy + ?Sized,
{
    let output_dir = args.output.join(folder);
    let mut report = SceneReport { scene: folder.to_string(), ..SceneReport::default() };
    let mut frames = Vec::new();
    let mut observation = sim.observe(None);
    for frame in 0..args.max_frames {
        let action = policy.select(&observation);
        info!("action {action}");
        observation = sim.step(&action).with_context(|| format!("Step {frame} failed in {folder}"))?;
        print_agent_state(&sim.agent_state());
        report.frames += 1;

        if frame % SAMPLE_INTERVAL != 0 {
            continue;
        }
        let Some(color) = observation.color() else {
            warn!("No colour sensor configured, nothing to save");
            continue;
        };
        if args.display() {
            let name = format!("{folder}-{frame}");
            if let Some(files) =
                display_sample_save(color, &output_dir, &name, observation.semantic(), observation.depth())
            {
                report.samples.push(files);
            }
        }
        if args.make_video() {
            frames.push(SensorValue::Color(color.clone()));
        }
    }

    if args.display() {
        report.top_down_map = save_topdown_map(&sim.topdown_map(MAP_CELLS), output_dir.join("top_down_map.png"));
    }
    if args.make_video() {
        let path = args.output.join(format!("{folder}.gif"));
        report.video = create_gif_from_frames(&frames, path, GifOptions::default());
    }
    Ok(report)
}

/// Run the `explore` subcommand.
///
/// # Errors
///
/// An unreadable scene root or settings file, and a navigation mesh that
/// fails to load, which aborts the whole exploration.
pub fn run(args: &ExploreArgs) -> Result<Vec<SceneReport>> {
    let settings = load_settings(args.settings.as_deref())?;
    let scenes = scene_loader(&args.scenes)
        .with_context(|| format!("Failed to list scenes in {}", args.scenes.display()))?;
    info!("Found {} scenes in {}", scenes.len(), args.scenes.display());

    let mut rng = fastrand::Rng::with_seed(settings.seed);
    let mut reports = Vec::with_capacity(scenes.len());
    for assets in &scenes {
        info!("Exploring scene {}", assets.folder);
        reports.push(explore_scene(assets, &settings, args, &mut rng)?);
    }
    Ok(reports)
}
