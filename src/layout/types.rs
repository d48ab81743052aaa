/// One horizontal slot of a generation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoupleGroup {
    Couple(String, String),
    Single(String),
}

impl CoupleGroup {
    pub fn members(&self) -> Vec<&str> {
        match self {
            CoupleGroup::Couple(a, b) => vec![a.as_str(), b.as_str()],
            CoupleGroup::Single(a) => vec![a.as_str()],
        }
    }
}

/// What a new node is positioned relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<'a> {
    Root,
    Parent(&'a str),
    Sibling(&'a str),
    Spouse(&'a str),
}

/// Outcome of level propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReport {
    /// Propagation passes executed, including the final pass that changed nothing.
    pub passes: usize,
    /// `false` when the pass cap stopped propagation early.
    pub converged: bool,
}
