//! # Synthetic Sensors
//!
//! Renders observations from the agent pose without any scene geometry. The
//! camera sees the navigable square as a room: walls above the horizon,
//! floor below, and the goal as a red pillar when it is in view. Depth is
//! exact for this room, so the images change consistently as the agent
//! moves and turns.

use episode::{Observation, SensorArray, SensorValue, OBJECT_GOAL};
use settings::{AgentConfig, SensorSpec, SensorType};

use crate::area::NavigableArea;
use crate::pose::{Pose, Vec3};

/// Horizontal field of view of every pinhole sensor.
pub const HFOV_DEGREES: f32 = 90.0;
/// Depth readings saturate here, in metres.
pub const MAX_DEPTH: f32 = 10.0;
/// Radius of the rendered goal pillar.
pub const GOAL_RADIUS: f32 = 0.25;

pub const FLOOR_LABEL: u32 = 0;
pub const WALL_LABEL: u32 = 1;
/// Goal pixels are labelled `GOAL_LABEL_BASE + category index`.
pub const GOAL_LABEL_BASE: u32 = 2;

const FLOOR_COLOR: [u8; 3] = [96, 78, 60];
const GOAL_COLOR: [u8; 3] = [220, 40, 40];

/// Goal the renderer draws and reports through `objectgoal`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Goal {
    pub position: Vec3,
    pub category: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Surface {
    Floor,
    Wall,
    Goal,
}

#[derive(Copy, Clone, Debug)]
struct Column {
    wall: f32,
    goal: Option<f32>,
}

fn columns(pose: &Pose, area: &NavigableArea, goal: Option<&Goal>, width: usize) -> Vec<Column> {
    let hfov = HFOV_DEGREES.to_radians();
    #[allow(clippy::cast_precision_loss)]
    let column_width = hfov / width.max(1) as f32;
    (0..width)
        .map(|col| {
            #[allow(clippy::cast_precision_loss)]
            let offset = hfov * 0.5 - (col as f32 + 0.5) * column_width;
            let ray = Pose::new(pose.position, pose.yaw + offset);
            let wall = area.distance_to_edge(pose.position, ray.forward());
            let goal = goal.and_then(|g| {
                let distance = pose.position.planar_distance(g.position);
                let half_angle = if distance > GOAL_RADIUS {
                    (GOAL_RADIUS / distance).asin()
                } else {
                    std::f32::consts::FRAC_PI_2
                };
                let visible = (pose.bearing_to(g.position) - offset).abs() <= half_angle.max(column_width / 2.0);
                (visible && distance <= wall).then_some(distance)
            });
            Column { wall, goal }
        })
        .collect()
}

/// Surface and depth of every pixel in a `height x width` view.
#[allow(clippy::cast_precision_loss)]
fn trace(
    pose: &Pose,
    area: &NavigableArea,
    goal: Option<&Goal>,
    spec: &SensorSpec,
) -> (usize, usize, Vec<(Surface, f32)>) {
    let [height, width] = spec.resolution.map(|v| v as usize);
    let sensor_height = spec.position[1].max(f32::EPSILON);
    let tan_half_v = (HFOV_DEGREES.to_radians() / 2.0).tan() * height as f32 / width.max(1) as f32;
    let columns = columns(pose, area, goal, width);

    let mut pixels = Vec::with_capacity(height * width);
    for row in 0..height {
        let half = height as f32 / 2.0;
        let below = (row as f32 + 0.5 - half) / half;
        let goal_band = row >= height / 4 && row < height - height / 4;
        for column in &columns {
            let pixel = match column.goal {
                Some(distance) if goal_band => (Surface::Goal, distance),
                _ if below > 0.0 => {
                    let floor = sensor_height / (below * tan_half_v);
                    if floor < column.wall {
                        (Surface::Floor, floor)
                    } else {
                        (Surface::Wall, column.wall)
                    }
                }
                _ => (Surface::Wall, column.wall),
            };
            pixels.push((pixel.0, pixel.1.min(MAX_DEPTH)));
        }
    }
    (height, width, pixels)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shade(color: [u8; 3], depth: f32) -> [u8; 4] {
    let light = 1.0 - 0.7 * (depth / MAX_DEPTH).clamp(0.0, 1.0);
    let [r, g, b] = color.map(|c| (f32::from(c) * light) as u8);
    [r, g, b, 255]
}

fn render_sensor(
    spec: &SensorSpec,
    pose: &Pose,
    area: &NavigableArea,
    goal: Option<&Goal>,
) -> SensorValue {
    let (height, width, pixels) = trace(pose, area, goal, spec);
    let at = |row: usize, col: usize| pixels[row * width + col];
    match spec.sensor_type {
        SensorType::Color => SensorValue::Color(SensorArray::from_fn(height, width, |row, col| {
            let (surface, depth) = at(row, col);
            match surface {
                Surface::Floor => shade(FLOOR_COLOR, depth),
                Surface::Wall => shade([230, 225, 210], depth),
                Surface::Goal => shade(GOAL_COLOR, depth),
            }
        })),
        SensorType::Depth => SensorValue::Depth(SensorArray::from_fn(height, width, |row, col| [at(row, col).1])),
        SensorType::Semantic => {
            let goal_label = GOAL_LABEL_BASE + goal.map_or(0, |g| u32::try_from(g.category).unwrap_or(0));
            SensorValue::Semantic(SensorArray::from_fn(height, width, |row, col| {
                [match at(row, col).0 {
                    Surface::Floor => FLOOR_LABEL,
                    Surface::Wall => WALL_LABEL,
                    Surface::Goal => goal_label,
                }]
            }))
        }
    }
}

/// Observation of every sensor in `agent`, plus `objectgoal` when a goal is
/// set.
#[must_use]
pub fn render(agent: &AgentConfig, pose: &Pose, area: &NavigableArea, goal: Option<&Goal>) -> Observation {
    let mut observation = Observation::new();
    for spec in &agent.sensor_specifications {
        observation.insert(spec.uuid.clone(), render_sensor(spec, pose, area, goal));
    }
    if let Some(goal) = goal {
        let category = i64::try_from(goal.category).unwrap_or(i64::MAX);
        observation.insert(OBJECT_GOAL, SensorValue::Indices(vec![category]));
    }
    observation
}
