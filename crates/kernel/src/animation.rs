use displayblock_common::{Coords, ItemId, PositionManager};

/// Identifier of a tween, unique within the animator that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

/// What a tween drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    Translate,
    Rotate,
}

/// A linear, frame-driven interpolation of position or rotation.
///
/// The first frame only records the start time. Every later frame moves the
/// pose by `elapsed * delta / duration`. Once the duration is exceeded the
/// pose snaps to the target and the tween reports completion.
#[derive(Debug, Clone)]
pub struct Tween {
    id: TweenId,
    kind: TweenKind,
    delta: Coords,
    increments: Coords,
    target: Coords,
    duration: f64,
    start_time: Option<f64>,
    last_timestamp: Option<f64>,
    repeat: bool,
}

impl Tween {
    fn new(id: TweenId, kind: TweenKind, delta: Coords, duration: f64, pose: &PositionManager) -> Self {
        let target = match kind {
            TweenKind::Translate => pose.positions() + delta,
            TweenKind::Rotate => {
                let r = pose.rotations();
                // `%` on f64 keeps the dividend's sign, same as the browser.
                Coords::new(
                    (r.x + delta.x) % 360.0,
                    (r.y + delta.y) % 360.0,
                    (r.z + delta.z) % 360.0,
                )
            }
        };
        let increments = if duration > 0.0 {
            Coords::new(delta.x / duration, delta.y / duration, delta.z / duration)
        } else {
            Coords::ZERO
        };
        Self {
            id,
            kind,
            delta,
            increments,
            target,
            duration,
            start_time: None,
            last_timestamp: None,
            repeat: false,
        }
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    pub fn target(&self) -> Coords {
        self.target
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// Advance to `timestamp` (milliseconds). Returns true once finished.
    pub fn advance(&mut self, timestamp: f64, pose: &mut PositionManager) -> bool {
        let start = *self.start_time.get_or_insert(timestamp);

        if let Some(last) = self.last_timestamp {
            let elapsed = timestamp - last;
            let step = Coords::new(
                elapsed * self.increments.x,
                elapsed * self.increments.y,
                elapsed * self.increments.z,
            );
            match self.kind {
                TweenKind::Translate => {
                    pose.set_position(pose.positions() + step);
                }
                TweenKind::Rotate => {
                    let r = pose.rotations() + step;
                    pose.set_rotations(Some(r.x), Some(r.y), Some(r.z));
                }
            }
        }
        self.last_timestamp = Some(timestamp);

        let remaining = self.duration - (timestamp - start);
        if remaining >= 0.0 {
            return false;
        }

        match self.kind {
            TweenKind::Translate => {
                pose.set_position(self.target);
            }
            TweenKind::Rotate => {
                let t = self.target;
                pose.set_rotations(Some(t.x), Some(t.y), Some(t.z));
            }
        }
        true
    }

    /// A fresh copy of this tween starting from the current pose.
    fn restart(&self, pose: &PositionManager) -> Self {
        let mut next = Self::new(self.id, self.kind, self.delta, self.duration, pose);
        next.repeat = self.repeat;
        next
    }
}

/// Outcome of advancing an animator by one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Tweens that completed on this frame. Repeating rotations never appear here.
    pub finished: Vec<TweenId>,
    /// Whether any translation changed the position.
    pub moved: bool,
    /// Whether any rotation changed the rotation.
    pub rotated: bool,
}

/// Which renderable a finished tween belonged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationOwner {
    Viewport,
    Scene(String),
    Item { scene: String, id: ItemId },
}

/// Completion notice returned from a frame in place of a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFinished {
    pub owner: AnimationOwner,
    pub tween: TweenId,
}

/// Runs tweens for a single pose.
///
/// Free-standing translations and rotations run concurrently. The rotation
/// slot holds at most one looping rotation or a flatten, and is what
/// `rotation_enabled` reports on.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    tweens: Vec<Tween>,
    rotation_slot: Option<Tween>,
    next_id: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> TweenId {
        self.next_id += 1;
        TweenId(self.next_id)
    }

    pub fn translate_by(&mut self, pose: &PositionManager, delta: Coords, duration: f64) -> TweenId {
        let id = self.next_id();
        self.tweens
            .push(Tween::new(id, TweenKind::Translate, delta, duration, pose));
        id
    }

    pub fn translate_to(&mut self, pose: &PositionManager, target: Coords, duration: f64) -> TweenId {
        self.translate_by(pose, target - pose.positions(), duration)
    }

    pub fn rotate_by(&mut self, pose: &PositionManager, delta: Coords, duration: f64) -> TweenId {
        let id = self.next_id();
        self.tweens
            .push(Tween::new(id, TweenKind::Rotate, delta, duration, pose));
        id
    }

    pub fn rotate_to(&mut self, pose: &PositionManager, target: Coords, duration: f64) -> TweenId {
        self.rotate_by(pose, target - pose.rotations(), duration)
    }

    /// Stop any rotation loop and rotate back to 0,0,0.
    pub fn flatten(&mut self, pose: &PositionManager, duration: f64) -> TweenId {
        self.disable_rotations();
        let id = self.next_id();
        let delta = Coords::ZERO - pose.rotations();
        self.rotation_slot = Some(Tween::new(id, TweenKind::Rotate, delta, duration, pose));
        id
    }

    /// Rotate by `delta` every `duration` ms until disabled.
    pub fn enable_rotations(&mut self, pose: &PositionManager, delta: Coords, duration: f64) -> TweenId {
        let id = self.next_id();
        let mut tween = Tween::new(id, TweenKind::Rotate, delta, duration, pose);
        tween.repeat = true;
        self.rotation_slot = Some(tween);
        id
    }

    pub fn disable_rotations(&mut self) {
        self.rotation_slot = None;
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_slot.is_some()
    }

    /// Drop every pending tween, including the rotation slot.
    pub fn cancel_all(&mut self) {
        self.tweens.clear();
        self.rotation_slot = None;
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.rotation_slot.is_none()
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len() + usize::from(self.rotation_slot.is_some())
    }

    /// Advance every tween to `timestamp` (milliseconds).
    pub fn frame(&mut self, timestamp: f64, pose: &mut PositionManager) -> FrameReport {
        let mut report = FrameReport::default();
        if self.is_idle() {
            return report;
        }

        let before = *pose;
        let mut still_running = Vec::with_capacity(self.tweens.len());
        for mut tween in self.tweens.drain(..) {
            if tween.advance(timestamp, pose) {
                report.finished.push(tween.id());
            } else {
                still_running.push(tween);
            }
        }
        self.tweens = still_running;

        if let Some(mut tween) = self.rotation_slot.take() {
            if !tween.advance(timestamp, pose) {
                self.rotation_slot = Some(tween);
            } else if tween.is_repeating() {
                self.rotation_slot = Some(tween.restart(pose));
            } else {
                report.finished.push(tween.id());
            }
        }

        report.moved = pose.positions() != before.positions();
        report.rotated = pose.rotations() != before.rotations();
        report
    }
}
