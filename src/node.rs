//! The recursive growth unit and the depth-targeted broadcast protocol.
//!
//! A command is dispatched once at the root and walks the whole live
//! subtree. Each node checks the [`DepthTarget`] against its own depth and
//! only acts on a match, but always hands the command down to its children,
//! so most nodes simply pass a broadcast through.

use crate::config::GrowthParams;
use crate::geometry::{Point, Segment, LEAF_RADIUS_MAX, LEAF_RADIUS_MIN};
use crate::host::{RandomSource, Stroke, Surface};
use std::f64::consts::TAU;
use std::fmt;
use std::rc::Rc;

/// Named effect carried by a broadcast
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Spawn,
    Leaves,
    Render,
    /// Anything we do not recognize. Never applies to a node.
    Unknown(String),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Spawn => "SPAWN",
            Command::Leaves => "LEAVES",
            Command::Render => "RENDER",
            Command::Unknown(name) => name,
        }
    }
}

impl From<&str> for Command {
    fn from(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "SPAWN" => Command::Spawn,
            "LEAVES" => Command::Leaves,
            "RENDER" => Command::Render,
            _ => Command::Unknown(name.to_string()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which depths a broadcast acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthTarget {
    Exact(u32),
    /// Inclusive on both ends
    Range { low: u32, high: u32 },
}

impl DepthTarget {
    pub fn everything() -> Self {
        DepthTarget::Range { low: 0, high: u32::MAX }
    }

    pub fn matches(&self, depth: u32) -> bool {
        match *self {
            DepthTarget::Exact(d) => depth == d,
            DepthTarget::Range { low, high } => low <= depth && depth <= high,
        }
    }
}

impl fmt::Display for DepthTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthTarget::Exact(d) => write!(f, "depth {}", d),
            DepthTarget::Range { low, high } => write!(f, "depths {}..={}", low, high),
        }
    }
}

/// Outcome of one traversal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reach {
    pub visited: usize,
    pub applied: usize,
}

impl std::ops::AddAssign for Reach {
    fn add_assign(&mut self, rhs: Self) {
        self.visited += rhs.visited;
        self.applied += rhs.applied;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    position: Point,
    length: f64,
    angle: f64,
    depth: u32,
    branch_factor: usize,
    children: Vec<Node>,
    segment: Segment,
    params: Rc<GrowthParams>,
}

impl Node {
    pub fn new(
        position: Point,
        length: f64,
        angle: f64,
        depth: u32,
        branch_factor: usize,
        params: Rc<GrowthParams>,
    ) -> Self {
        Self {
            position,
            length,
            angle,
            depth,
            branch_factor: branch_factor.max(1),
            children: Vec::new(),
            segment: Segment::from_polar(position, length, angle),
            params,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn branch_factor(&self) -> usize {
        self.branch_factor
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn has_spawned(&self) -> bool {
        !self.children.is_empty()
    }

    /// Spawn `branch_factor` children at the far end of this segment.
    /// Returns how many were created; 0 if this node already has children
    /// or sits at the deepest representable depth.
    pub fn spawn_children(&mut self) -> usize {
        if self.has_spawned() {
            return 0;
        }
        let Some(child_depth) = self.depth.checked_add(1) else {
            return 0;
        };

        let params = Rc::clone(&self.params);
        let n = self.branch_factor;
        let depth = f64::from(self.depth);

        let angle_span = params.angle_factor.powf(depth) * TAU;
        let (first, angle_step) = if n > 1 {
            (self.angle - angle_span / 2.0, angle_span / (n - 1) as f64)
        } else {
            (self.angle, 0.0)
        };
        let length = params.start_length * params.length_factor.powf(depth);
        let origin = self.segment.end();

        self.children = (0..n)
            .map(|i| {
                Node::new(
                    origin,
                    length,
                    first + angle_step * i as f64,
                    child_depth,
                    params.children_count,
                    Rc::clone(&params),
                )
            })
            .collect();
        n
    }

    /// Like [`Node::spawn_children`] but with this node's branch factor
    /// replaced first. Ignored if the node already has children.
    pub fn spawn_children_with(&mut self, branch_factor: usize) -> usize {
        if self.has_spawned() {
            return 0;
        }
        self.branch_factor = branch_factor.max(1);
        self.spawn_children()
    }

    /// Hang a leaf off the segment's far end. False if one is already there.
    pub fn spawn_leaf(&mut self, rng: &mut dyn RandomSource) -> bool {
        if self.segment.leaf().is_some() {
            return false;
        }
        let radius = rng.random_int(LEAF_RADIUS_MIN, LEAF_RADIUS_MAX);
        self.segment.attach_leaf(radius)
    }

    /// Apply `effect` to every node whose depth matches `target`, visiting
    /// the whole subtree regardless. Children created by the effect are
    /// visited in the same pass.
    pub fn propagate_call<F>(&mut self, target: &DepthTarget, effect: &mut F) -> Reach
    where
        F: FnMut(&mut Node),
    {
        let mut reach = Reach { visited: 1, applied: 0 };
        if target.matches(self.depth) {
            effect(self);
            reach.applied = 1;
        }
        for child in &mut self.children {
            reach += child.propagate_call(target, effect);
        }
        reach
    }

    /// Read-only twin of [`Node::propagate_call`]
    pub fn propagate<F>(&self, target: &DepthTarget, effect: &mut F) -> Reach
    where
        F: FnMut(&Node),
    {
        let mut reach = Reach { visited: 1, applied: 0 };
        if target.matches(self.depth) {
            effect(self);
            reach.applied = 1;
        }
        for child in &self.children {
            reach += child.propagate(target, effect);
        }
        reach
    }

    /// Draw the segments leading to each child, and their leaves.
    /// A node never draws its own incoming segment.
    pub fn render(&self, surface: &mut dyn Surface) {
        for child in &self.children {
            child.draw_segment(surface);
        }
    }

    pub(crate) fn draw_segment(&self, surface: &mut dyn Surface) {
        let stroke = Stroke {
            color: self
                .params
                .colors
                .wood_at(self.depth, self.params.terminal_depth),
            depth: self.depth,
        };
        surface.draw_line(self.segment.start(), self.segment.end(), stroke);
        if let Some(leaf) = self.segment.leaf() {
            surface.draw_circle(leaf.position, leaf.radius as f64, leaf.color);
        }
    }
}
