//! This module contains the implementation of the placer, which assigns the
//! final (x,y) coordinates to all of the vertices in the graph and computes
//! the routes of the edges.

use super::aggregate;
use super::bk::{self, Scratch};
use super::compact::Compactor;
use super::layers::LayerGeometry;
use super::route;
use super::verifier::{self, Violation};
use crate::adt::dag::NodeHandle;
use crate::core::base::{Mode, NUM_MODES};
use crate::core::config::{LayoutConfig, PositionMode};
use crate::core::error::{Error, Result};
use crate::core::geometry::{clamp_non_negative, Point};
use crate::topo::compaction::CompactionGraph;
use crate::topo::graph::{EdgeHandle, LayeredGraph};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag that another thread can raise to stop a running layout. The
/// placer checks it before each of the four passes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The phases of the layout, as reported to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geometry,
    Mode(usize),
    Aggregate,
    Routing,
}

/// The result of the placer.
#[derive(Debug, Clone)]
pub struct Layout {
    positions: Vec<Point>,
    routes: Vec<Option<Vec<Point>>>,
    geometry: LayerGeometry,
    slices: Vec<f64>,
    modes: Vec<Vec<f64>>,
    roots: Vec<Vec<NodeHandle>>,
    aligns: Vec<Vec<NodeHandle>>,
    violations: Vec<Violation>,
}

impl Layout {
    /// \returns the center of \p node in the drawing.
    pub fn position(&self, node: NodeHandle) -> Point {
        self.positions[node.get_index()]
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// \returns the polyline of \p edge, if the edge routing made one.
    pub fn route(&self, edge: EdgeHandle) -> Option<&[Point]> {
        self.routes[edge.get_index()].as_deref()
    }

    pub fn routes(&self) -> &[Option<Vec<Point>>] {
        &self.routes
    }

    /// \returns the final slice coordinate of \p node.
    pub fn slice(&self, node: NodeHandle) -> f64 {
        self.slices[node.get_index()]
    }

    pub fn slices(&self) -> &[f64] {
        &self.slices
    }

    pub fn layer_sizes(&self) -> &[f64] {
        self.geometry.sizes()
    }

    pub fn layer_offsets(&self) -> &[f64] {
        self.geometry.offsets()
    }

    pub fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }

    /// \returns the slice coordinates that the mode \p idx computed.
    pub fn mode_slices(&self, idx: usize) -> &[f64] {
        &self.modes[idx]
    }

    /// \returns the block root of every vertex in the mode \p idx.
    pub fn mode_roots(&self, idx: usize) -> &[NodeHandle] {
        &self.roots[idx]
    }

    /// \returns the next block member of every vertex in the mode \p idx.
    pub fn mode_aligns(&self, idx: usize) -> &[NodeHandle] {
        &self.aligns[idx]
    }

    /// \returns the spacing problems that validation found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

type ProgressFn<'a> = Box<dyn FnMut(Stage) + 'a>;

pub struct Placer<'a> {
    g: &'a mut LayeredGraph,
    config: LayoutConfig,
    cancel: Option<CancelToken>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Placer<'a> {
    pub fn new(g: &'a mut LayeredGraph, mut config: LayoutConfig) -> Self {
        // The fields may have been assigned without the setters.
        config.layer_distance = clamp_non_negative(config.layer_distance);
        config.vertex_distance = clamp_non_negative(config.vertex_distance);
        Self {
            g,
            config,
            cancel: None,
            progress: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Register a callback that is called when a new stage starts.
    pub fn on_progress(mut self, f: impl FnMut(Stage) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    fn report(progress: &mut Option<ProgressFn<'a>>, stage: Stage) {
        if let Some(f) = progress.as_mut() {
            f(stage);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                #[cfg(feature = "log")]
                log::info!("The layout was cancelled.");
                Err(Error::Cancelled)
            }
            _ => Ok(()),
        }
    }

    pub fn layout(&mut self) -> Result<Layout> {
        #[cfg(feature = "log")]
        log::info!("Starting layout of {} nodes.", self.g.num_nodes());

        if let PositionMode::Single(idx) = self.config.position_mode {
            if idx >= NUM_MODES {
                return Err(Error::InvalidOption {
                    option: "position mode",
                    value: idx.to_string(),
                });
            }
        }

        self.g.reinsert_isolated();
        self.g.validate()?;

        let g: &LayeredGraph = self.g;
        let dir = self.config.direction;
        let marked = bk::mark_type1_conflicts(g)?;
        let cg = CompactionGraph::build(g);

        Self::report(&mut self.progress, Stage::Geometry);
        let geometry = LayerGeometry::compute(g, dir, self.config.layer_distance);

        let mut scratch = Scratch::new(g.num_nodes());
        let mut modes = Vec::with_capacity(NUM_MODES);
        let mut roots = Vec::with_capacity(NUM_MODES);
        let mut aligns = Vec::with_capacity(NUM_MODES);

        for mode in Mode::all().iter() {
            self.check_cancelled()?;
            Self::report(&mut self.progress, Stage::Mode(mode.index()));

            scratch.reset(g, *mode, dir);
            bk::align_blocks(g, &marked, &mut scratch, *mode, dir);
            if self.config.validate {
                verifier::verify_blocks(g, &scratch, *mode);
            }
            Compactor::new(g, &cg, *mode, dir, self.config.vertex_distance).run(&mut scratch);

            modes.push(scratch.slices(*mode));
            roots.push(scratch.roots(*mode));
            aligns.push(scratch.aligns(*mode));
        }
        self.check_cancelled()?;

        Self::report(&mut self.progress, Stage::Aggregate);
        let slices = aggregate::combine(&modes, self.config.position_mode);

        let mut violations = Vec::new();
        if self.config.validate {
            let vd = self.config.vertex_distance;
            for mode_slices in modes.iter() {
                violations.extend(verifier::check_spacing(g, dir, mode_slices, vd));
            }
        }

        Self::report(&mut self.progress, Stage::Routing);
        let routes = route::route_edges(
            g,
            &geometry,
            &slices,
            dir,
            self.config.layer_distance,
            self.config.edge_routing,
        );

        let positions = g
            .iter_nodes()
            .map(|node| {
                let own = g.extent(node, dir).y;
                let along = geometry.vertex_center(g.dag.level(node), own);
                geometry.project(slices[node.get_index()], along)
            })
            .collect();

        #[cfg(feature = "log")]
        log::info!(
            "Placed {} nodes in {} layers and routed {} edges.",
            g.num_nodes(),
            g.num_levels(),
            g.edges().len()
        );

        Ok(Layout {
            positions,
            routes,
            geometry,
            slices,
            modes,
            roots,
            aligns,
            violations,
        })
    }
}

#[cfg(test)]
use crate::core::base::LayoutDirection;

#[test]
fn test_empty_graph() {
    let mut g = LayeredGraph::new();
    let layout = Placer::new(&mut g, LayoutConfig::new()).layout().unwrap();
    assert!(layout.positions().is_empty());
    assert!(layout.layer_sizes().is_empty());
}

#[test]
fn test_progress_stages() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::splat(10.));
    let b = g.add_node(1, Point::splat(10.));
    g.add_edge(a, b, &[]).unwrap();

    let mut stages = Vec::new();
    Placer::new(&mut g, LayoutConfig::new())
        .on_progress(|s| stages.push(s))
        .layout()
        .unwrap();
    assert_eq!(
        stages,
        vec![
            Stage::Geometry,
            Stage::Mode(0),
            Stage::Mode(1),
            Stage::Mode(2),
            Stage::Mode(3),
            Stage::Aggregate,
            Stage::Routing
        ]
    );
}

#[test]
fn test_cancelled_layout() {
    let mut g = LayeredGraph::new();
    g.add_node(0, Point::splat(10.));
    let token = CancelToken::new();
    token.cancel();
    let res = Placer::new(&mut g, LayoutConfig::new())
        .with_cancel_token(token)
        .layout();
    assert!(matches!(res, Err(Error::Cancelled)));
}

#[test]
fn test_invalid_single_mode() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::splat(10.));
    let b = g.add_node(1, Point::splat(10.));
    g.add_edge(a, b, &[]).unwrap();

    let mut config = LayoutConfig::new();
    config.set_position_mode(PositionMode::Single(NUM_MODES));
    let mut stages = Vec::new();
    let res = Placer::new(&mut g, config)
        .on_progress(|s| stages.push(s))
        .layout();
    assert!(matches!(
        res,
        Err(Error::InvalidOption {
            option: "position mode",
            ..
        })
    ));
    // Nothing was computed.
    assert!(stages.is_empty());
}

#[test]
fn test_raw_distances_are_clamped() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::splat(10.));
    let b = g.add_node(0, Point::splat(10.));
    let c = g.add_node(1, Point::splat(10.));
    g.add_edge(a, c, &[]).unwrap();

    let mut config = LayoutConfig::new();
    config.layer_distance = -15.;
    config.vertex_distance = f64::NAN;
    let layout = Placer::new(&mut g, config).layout().unwrap();
    // Both gaps are 0: the layers touch and the neighbors touch.
    assert_eq!(layout.layer_offsets(), &[0., 10.]);
    assert!((layout.slice(b) - layout.slice(a) - 10.).abs() < 1e-9);
    assert!(layout.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    assert!(layout.violations().is_empty());
}

#[test]
fn test_horizontal_layout() {
    let mut g = LayeredGraph::new();
    let a = g.add_node(0, Point::new(30., 10.));
    let b = g.add_node(1, Point::new(30., 10.));
    g.add_edge(a, b, &[]).unwrap();

    let mut config = LayoutConfig::new();
    config
        .set_direction(LayoutDirection::LeftToRight)
        .set_layer_distance(10.);
    let layout = Placer::new(&mut g, config).layout().unwrap();
    // The layers are stacked along X, using the width of the vertices.
    assert_eq!(layout.layer_offsets(), &[0., 40.]);
    assert_eq!(layout.position(a), Point::new(15., 5.));
    assert_eq!(layout.position(b), Point::new(55., 5.));
}
