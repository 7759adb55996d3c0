//! Progress output of the drivers, emitted as `info` events.

use episode::{EpisodeDescriptor, EpisodeOutcome, Observation, StepRecord, TrainingSummary};
use kinematic::{Pose, OBJECT_CATEGORIES};
use std::path::Path;
use tracing::info;

pub fn print_episode_info(episode: &EpisodeDescriptor) {
    info!("Episode ID: {}", episode.episode_id);
    info!("Scene name: {}", episode.scene_name());
    info!("Scene ID: {}", episode.scene_id);
    info!("Object category: {}", episode.object_category);
    info!("Start position: {:?}", episode.start_position);
    info!("Start rotation: {:?}", episode.start_rotation);
    if let Some(room) = &episode.start_room {
        info!("Start room: {room}");
    }
}

pub fn print_scene_path(path: &Path) {
    info!("Scene path: {}", path.display());
}

pub fn print_initial_goal(observation: &Observation) {
    match observation.object_goal() {
        Some(goal) => {
            let names: Vec<&str> = goal
                .iter()
                .map(|&index| {
                    usize::try_from(index).ok().and_then(|i| OBJECT_CATEGORIES.get(i)).copied().unwrap_or("unknown")
                })
                .collect();
            info!("Initial object goal: {goal:?} ({})", names.join(", "));
        }
        None => info!("Initial object goal: none"),
    }
}

pub fn print_step_info(record: &StepRecord<'_>) {
    info!(
        "Step {}: action {}, reward {:.3}, done {}",
        record.step + 1,
        record.action,
        record.reward,
        record.done
    );
    for (name, value) in record.metrics.iter() {
        info!("  {name}: {value:.3}");
    }
}

pub fn print_episode_summary(outcome: &EpisodeOutcome) {
    info!("Episode {} finished", outcome.episode_id);
    info!("Total reward: {:.3}", outcome.total_reward);
    info!("Steps taken: {}", outcome.steps);
    info!("Success: {}", outcome.metrics.success());
}

pub fn print_training_summary(summary: &TrainingSummary) {
    info!("Training summary over {} episodes", summary.episodes);
    info!(
        "Reward mean {:.3}, min {:.3}, max {:.3}",
        summary.mean_reward, summary.min_reward, summary.max_reward
    );
    info!(
        "Successes: {} ({:.1}%), total steps {}",
        summary.successes,
        summary.success_rate() * 100.0,
        summary.total_steps
    );
}

pub fn print_agent_state(pose: &Pose) {
    info!(
        "Agent state: position [{:.3}, {:.3}, {:.3}] rotation {:?}",
        pose.position.x,
        pose.position.y,
        pose.position.z,
        pose.rotation()
    );
}
