//! Level-by-level growth policy on top of the node broadcast protocol.

use crate::config::{ColorScheme, GrowthParams, TreeSpec};
use crate::error::ParamError;
use crate::geometry::Point;
use crate::host::{Host, RandomSource, Surface};
use crate::node::{Command, DepthTarget, Node, Reach};
use log::{debug, info, warn};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Growing,
    /// Leaves are out; nothing changes any more
    Done,
}

/// What a single [`GrowthController::advance`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Nodes at `depth` spawned `spawned` children
    Grew { depth: u32, spawned: usize },
    /// Terminal depth reached, `leaves` leaves attached
    Leaved { leaves: usize },
    Idle,
}

/// Counters for tracking growth progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthStats {
    pub nodes: usize,
    pub leaves: usize,
    pub broadcasts: usize,
    /// `advance` calls that arrived after growth finished
    pub absorbed: usize,
}

#[derive(Debug)]
pub struct GrowthController {
    params: Rc<GrowthParams>,
    origin: Point,
    root: Node,
    current_depth: u32,
    terminal_depth: u32,
    phase: Phase,
    stats: GrowthStats,
}

impl GrowthController {
    pub fn new(spec: &TreeSpec, colors: ColorScheme) -> Result<Self, ParamError> {
        spec.validate()?;

        let params = Rc::new(GrowthParams::new(spec, colors));
        let root = Node::new(
            spec.root,
            spec.start_length,
            spec.start_angle,
            spec.start_depth,
            spec.branch_factor,
            Rc::clone(&params),
        );

        Ok(Self {
            params,
            origin: spec.root,
            root,
            current_depth: spec.start_depth,
            terminal_depth: spec.terminal_depth,
            phase: Phase::Growing,
            stats: GrowthStats {
                nodes: 1,
                ..Default::default()
            },
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    pub fn terminal_depth(&self) -> u32 {
        self.terminal_depth
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn stats(&self) -> GrowthStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.root
            .propagate(&DepthTarget::everything(), &mut |_: &Node| {})
            .visited
    }

    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        self.root.propagate(&DepthTarget::everything(), &mut |n: &Node| {
            if n.segment().leaf().is_some() {
                leaves += 1;
            }
        });
        leaves
    }

    /// Grow one level, or put out leaves once the terminal depth is reached.
    /// A no-op after that.
    pub fn advance(&mut self, rng: &mut dyn RandomSource) -> Advance {
        if self.is_done() {
            self.stats.absorbed += 1;
            return Advance::Idle;
        }

        let target = DepthTarget::Exact(self.current_depth);
        self.stats.broadcasts += 1;

        if self.current_depth < self.terminal_depth {
            let depth = self.current_depth;
            let (_, spawned) = self.spawn_at(&target);
            self.current_depth += 1;
            debug!("grew depth {}: {} new nodes", depth, spawned);
            Advance::Grew { depth, spawned }
        } else {
            let (_, leaves) = self.leaves_at(&target, rng);
            self.phase = Phase::Done;
            info!(
                "tree complete at depth {}: {} nodes, {} leaves",
                self.current_depth, self.stats.nodes, self.stats.leaves
            );
            Advance::Leaved { leaves }
        }
    }

    /// Send any command from the root to the nodes `target` selects.
    ///
    /// Unknown commands are reported and still walk the whole tree. Once the
    /// tree is done, SPAWN and LEAVES walk it without applying. SPAWN only
    /// takes an exact depth below the terminal depth, and moves the growth
    /// frontier along when it creates nodes past it.
    pub fn broadcast<H: Host>(&mut self, command: &Command, target: DepthTarget, host: &mut H) -> Reach {
        self.stats.broadcasts += 1;
        match command {
            Command::Spawn | Command::Leaves if self.is_done() => {
                debug!("{} at {} after growth finished, ignoring", command, target);
                self.pass_through(&target)
            }
            Command::Spawn => match target {
                DepthTarget::Exact(depth) if depth < self.terminal_depth => {
                    let (reach, spawned) = self.spawn_at(&target);
                    if spawned > 0 {
                        self.current_depth = self.current_depth.max(depth + 1);
                    }
                    debug!("{} at {}: {} new nodes", command, target, spawned);
                    reach
                }
                _ => {
                    warn!(
                        "{} needs an exact depth below {}, got {}; ignoring",
                        command, self.terminal_depth, target
                    );
                    self.pass_through(&target)
                }
            },
            Command::Leaves => self.leaves_at(&target, host).0,
            Command::Render => self.render_nodes(&target, host),
            Command::Unknown(name) => {
                warn!("unknown command {:?} broadcast at {}, ignoring", name, target);
                self.pass_through(&target)
            }
        }
    }

    /// Walk the tree without touching it
    fn pass_through(&self, target: &DepthTarget) -> Reach {
        let reach = self.root.propagate(target, &mut |_: &Node| {});
        Reach {
            visited: reach.visited,
            applied: 0,
        }
    }

    /// Draw every grown node, then the root segment the nodes never draw
    pub fn render(&self, surface: &mut dyn Surface) {
        let range = DepthTarget::Range {
            low: 0,
            high: self.current_depth,
        };
        self.render_nodes(&range, surface);
        self.root.draw_segment(surface);
    }

    fn render_nodes(&self, target: &DepthTarget, surface: &mut dyn Surface) -> Reach {
        self.root.propagate(target, &mut |n: &Node| n.render(&mut *surface))
    }

    fn spawn_at(&mut self, target: &DepthTarget) -> (Reach, usize) {
        let mut spawned = 0;
        let reach = self.root.propagate_call(target, &mut |n: &mut Node| {
            spawned += n.spawn_children();
        });
        self.stats.nodes += spawned;
        (reach, spawned)
    }

    fn leaves_at(&mut self, target: &DepthTarget, rng: &mut dyn RandomSource) -> (Reach, usize) {
        let mut leaves = 0;
        let reach = self.root.propagate_call(target, &mut |n: &mut Node| {
            if n.spawn_leaf(&mut *rng) {
                leaves += 1;
            }
        });
        self.stats.leaves += leaves;
        (reach, leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rgb;
    use crate::host::Stroke;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec(branch_factor: usize, start_depth: u32, terminal_depth: u32) -> TreeSpec {
        TreeSpec {
            root: Point::new(40.0, 60.0),
            start_length: 20.0,
            length_factor: 0.6,
            start_angle: -std::f64::consts::FRAC_PI_2,
            angle_factor: 0.5,
            branch_factor,
            start_depth,
            terminal_depth,
        }
    }

    fn controller(branch_factor: usize, start_depth: u32, terminal_depth: u32) -> GrowthController {
        GrowthController::new(&spec(branch_factor, start_depth, terminal_depth), ColorScheme::default())
            .unwrap()
    }

    struct Recorder {
        rng: StdRng,
        lines: usize,
        circles: usize,
    }

    impl Recorder {
        fn new() -> Self {
            Self { rng: StdRng::seed_from_u64(11), lines: 0, circles: 0 }
        }
    }

    impl Surface for Recorder {
        fn draw_line(&mut self, _from: Point, _to: Point, _stroke: Stroke) {
            self.lines += 1;
        }

        fn draw_circle(&mut self, _center: Point, _radius: f64, _color: Rgb) {
            self.circles += 1;
        }
    }

    impl RandomSource for Recorder {
        fn random_int(&mut self, min: i32, max: i32) -> i32 {
            self.rng.random_int(min, max)
        }
    }

    #[test]
    fn grows_then_leaves_then_absorbs() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut tree = controller(3, 2, 3);
        assert_eq!(tree.current_depth(), 2);
        assert_eq!(tree.phase(), Phase::Growing);
        assert_eq!(tree.params().children_count, 3);
        assert_eq!(tree.params().terminal_depth, 3);

        assert_eq!(tree.advance(&mut rng), Advance::Grew { depth: 2, spawned: 3 });
        assert_eq!(tree.current_depth(), 3);
        assert_eq!(tree.root().children().len(), 3);
        for child in tree.root().children() {
            assert_eq!(child.depth(), 3);
            assert!(child.children().is_empty());
        }
        assert!(!tree.is_done());

        assert_eq!(tree.advance(&mut rng), Advance::Leaved { leaves: 3 });
        assert!(tree.is_done());
        assert_eq!(tree.phase(), Phase::Done);
        assert_eq!(tree.leaf_count(), 3);
        assert!(tree.root().segment().leaf().is_none());

        let frozen = tree.root().clone();
        let stats = tree.stats();
        assert_eq!(tree.advance(&mut rng), Advance::Idle);
        assert_eq!(tree.root(), &frozen);
        assert_eq!(tree.stats().broadcasts, stats.broadcasts);
        assert_eq!(tree.stats().absorbed, 1);
    }

    #[test]
    fn root_at_terminal_depth_only_leaves() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut tree = controller(2, 4, 4);
        assert_eq!(tree.advance(&mut rng), Advance::Leaved { leaves: 1 });
        assert!(tree.root().segment().leaf().is_some());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn stats_track_node_and_leaf_totals() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut tree = controller(2, 0, 4);
        while !tree.is_done() {
            tree.advance(&mut rng);
        }
        // 1 + 2 + 4 + 8 + 16
        assert_eq!(tree.node_count(), 31);
        assert_eq!(tree.stats().nodes, 31);
        assert_eq!(tree.stats().leaves, 16);
        assert_eq!(tree.stats().broadcasts, 5);
    }

    #[test]
    fn unknown_command_visits_everything_and_applies_nowhere() {
        let mut host = Recorder::new();
        let mut tree = controller(3, 0, 5);
        tree.advance(&mut host.rng);
        tree.advance(&mut host.rng);
        let before = tree.root().clone();

        let reach = tree.broadcast(&Command::from("PRUNE"), DepthTarget::Exact(1), &mut host);
        assert_eq!(reach, Reach { visited: 13, applied: 0 });
        assert_eq!(tree.root(), &before);
    }

    #[test]
    fn broadcast_spawn_is_selective() {
        let mut host = Recorder::new();
        let mut tree = controller(2, 0, 5);
        tree.advance(&mut host.rng);

        let reach = tree.broadcast(&Command::Spawn, DepthTarget::Exact(1), &mut host);
        // 3 existing nodes plus 4 created during the pass
        assert_eq!(reach, Reach { visited: 7, applied: 2 });
        assert_eq!(tree.stats().nodes, 7);

        assert_eq!(tree.current_depth(), 2);

        let again = tree.broadcast(&Command::Spawn, DepthTarget::Exact(1), &mut host);
        assert_eq!(again.applied, 2);
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn finished_tree_ignores_spawn_and_leaves() {
        let mut host = Recorder::new();
        let mut tree = controller(2, 0, 2);
        while !tree.is_done() {
            tree.advance(&mut host.rng);
        }
        let frozen = tree.root().clone();
        let stats = tree.stats();

        let reach = tree.broadcast(&Command::Spawn, DepthTarget::Exact(2), &mut host);
        assert_eq!(reach, Reach { visited: 7, applied: 0 });
        let reach = tree.broadcast(&Command::Leaves, DepthTarget::Exact(1), &mut host);
        assert_eq!(reach, Reach { visited: 7, applied: 0 });

        assert_eq!(tree.root(), &frozen);
        assert_eq!(tree.stats().nodes, stats.nodes);
        assert_eq!(tree.stats().leaves, stats.leaves);
    }

    #[test]
    fn spawn_needs_exact_depth_below_terminal() {
        let mut host = Recorder::new();
        let mut tree = controller(2, 0, 6);

        let reach = tree.broadcast(&Command::Spawn, DepthTarget::Range { low: 0, high: 6 }, &mut host);
        assert_eq!(reach, Reach { visited: 1, applied: 0 });
        let reach = tree.broadcast(&Command::Spawn, DepthTarget::everything(), &mut host);
        assert_eq!(reach.applied, 0);
        assert_eq!(tree.node_count(), 1);

        let mut tree = controller(2, 3, 3);
        let reach = tree.broadcast(&Command::Spawn, DepthTarget::Exact(3), &mut host);
        assert_eq!(reach, Reach { visited: 1, applied: 0 });
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.current_depth(), 3);
    }

    #[test]
    fn broadcast_spawn_keeps_render_complete() {
        let mut host = Recorder::new();
        let mut tree = controller(2, 0, 5);
        tree.advance(&mut host.rng);
        tree.broadcast(&Command::Spawn, DepthTarget::Exact(1), &mut host);
        tree.broadcast(&Command::Spawn, DepthTarget::Exact(2), &mut host);
        assert_eq!(tree.current_depth(), 3);

        tree.render(&mut host);
        assert_eq!(tree.node_count(), 15);
        assert_eq!(host.lines, 15);

        // the next advance picks up where the broadcasts left off
        assert_eq!(tree.advance(&mut host.rng), Advance::Grew { depth: 3, spawned: 16 });
    }

    #[test]
    fn render_draws_every_segment_once() {
        let mut host = Recorder::new();
        let mut tree = controller(3, 2, 4);
        while !tree.is_done() {
            tree.advance(&mut host.rng);
        }

        tree.render(&mut host);
        assert_eq!(host.lines, tree.node_count());
        assert_eq!(host.circles, 9);
    }

    #[test]
    fn render_broadcast_respects_range() {
        let mut host = Recorder::new();
        let mut tree = controller(2, 0, 5);
        tree.advance(&mut host.rng);
        tree.advance(&mut host.rng);

        // only the root draws: its two children
        let reach = tree.broadcast(&Command::Render, DepthTarget::Exact(0), &mut host);
        assert_eq!(reach.applied, 1);
        assert_eq!(host.lines, 2);
    }

    #[test]
    fn rejects_invalid_spec() {
        let err = GrowthController::new(&spec(0, 0, 3), ColorScheme::default()).unwrap_err();
        assert_eq!(err, ParamError::ZeroBranchFactor);
    }
}
