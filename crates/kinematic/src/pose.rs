use std::ops::{Add, AddAssign, Mul, Sub};

/// World-space vector; `y` is up and agents look down `-z` at zero yaw.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance measured on the ground plane, ignoring height.
    #[must_use]
    pub fn planar_distance(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Agent position plus heading about the vertical axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Radians, counter-clockwise seen from above. Turning left increases it.
    pub yaw: f32,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Pose from a dataset start position and `[x, y, z, w]` quaternion.
    ///
    /// Only the rotation about `y` is kept.
    #[must_use]
    pub fn from_start(position: [f32; 3], rotation: [f32; 4]) -> Self {
        let [x, y, z, w] = rotation;
        let yaw = (2.0 * (w * y + x * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        Self::new(Vec3::from_array(position), yaw)
    }

    /// Unit heading on the ground plane.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// `[x, y, z, w]` quaternion of the heading.
    #[must_use]
    pub fn rotation(&self) -> [f32; 4] {
        let half = self.yaw / 2.0;
        [0.0, half.sin(), 0.0, half.cos()]
    }

    /// Turn by `degrees`; positive turns left.
    pub fn turn(&mut self, degrees: f32) {
        let yaw = self.yaw + degrees.to_radians();
        self.yaw = yaw.sin().atan2(yaw.cos());
    }

    /// Heading from this pose towards `target`, relative to the current yaw,
    /// in `(-pi, pi]`. Positive means the target is to the left.
    #[must_use]
    pub fn bearing_to(&self, target: Vec3) -> f32 {
        let dx = target.x - self.position.x;
        let dz = target.z - self.position.z;
        let absolute = (-dx).atan2(-dz);
        let relative = absolute - self.yaw;
        relative.sin().atan2(relative.cos())
    }
}
