//! Configuration settings for the MIP solver.

use bb_core::SolverSettings;

/// Distance to the nearest integer under which a value counts as integral.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-4;

/// Incumbent objective before any integral solution has been found.
///
/// Lower than every achievable objective of a maximization problem.
pub const NO_INCUMBENT: f64 = f64::NEG_INFINITY;

/// Node selection strategy for the B&B tree.
///
/// The final objective does not depend on the strategy; only the number of
/// nodes explored and the solve time do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Most recently added node first (LIFO).
    #[default]
    DepthFirst,

    /// Oldest node first (FIFO).
    BreadthFirst,

    /// Node with the highest inherited relaxation bound first; ties go to
    /// the most recently added node.
    BestBound,
}

/// MIP solver settings.
#[derive(Debug, Clone)]
pub struct MipSettings {
    // === Termination criteria ===
    /// Maximum number of nodes to explore.
    pub max_nodes: u64,

    /// Time limit in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,

    /// Integer feasibility tolerance.
    /// A variable is considered integer if |x - round(x)| <= int_feas_tol.
    pub int_feas_tol: f64,

    // === Search strategy ===
    /// Node selection strategy.
    pub node_selection: NodeSelection,

    // === Solver settings ===
    /// Settings for the relaxation simplex.
    pub relaxation_settings: SolverSettings,

    // === Output ===
    /// Log incumbents and progress at info level.
    pub verbose: bool,

    /// Log frequency (report every N nodes).
    pub log_freq: u64,
}

impl Default for MipSettings {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            time_limit_ms: None,
            int_feas_tol: INTEGRALITY_TOLERANCE,
            node_selection: NodeSelection::default(),
            relaxation_settings: SolverSettings::default(),
            verbose: false,
            log_freq: 100,
        }
    }
}

impl MipSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 1,
            ..Self::default()
        }
    }

    /// Set time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_ms = Some((seconds * 1000.0) as u64);
        self
    }

    /// Set maximum nodes.
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set node selection strategy.
    pub fn with_node_selection(mut self, node_selection: NodeSelection) -> Self {
        self.node_selection = node_selection;
        self
    }
}
