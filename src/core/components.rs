use serde::Serialize;
use std::fmt;

/// Identifier of a spawned cloud. Issued by the scene collaborator; the core only
/// references the rendered entity through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TargetId(pub u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cloud#{}", self.0)
    }
}

/// A grumpy cloud known to the session. `is_satisfied` flips once the beam cheers it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    pub id: TargetId,
    pub is_satisfied: bool,
}

impl Target {
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            is_satisfied: false,
        }
    }
}

/// Outcome of marking a target satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatisfyOutcome {
    /// First hit on this target; counts towards the score.
    Newly,
    /// Target was already cheered up.
    Already,
    Unknown,
}

/// Ordered, capacity-bounded list of the targets spawned in the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    targets: Vec<Target>,
    capacity: usize,
}

impl TargetSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            targets: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Registers a freshly spawned target. Returns false when the set is full or
    /// the id is already tracked.
    pub fn register(&mut self, id: TargetId) -> bool {
        if self.targets.len() >= self.capacity || self.contains(id) {
            return false;
        }
        self.targets.push(Target::new(id));
        true
    }

    pub fn satisfy(&mut self, id: TargetId) -> SatisfyOutcome {
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(t) if t.is_satisfied => SatisfyOutcome::Already,
            Some(t) => {
                t.is_satisfied = true;
                SatisfyOutcome::Newly
            }
            None => SatisfyOutcome::Unknown,
        }
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Ids of targets still waiting for a hit, in spawn order.
    pub fn grumpy_ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.targets
            .iter()
            .filter(|t| !t.is_satisfied)
            .map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.targets.len() >= self.capacity
    }

    /// How many more targets fit before the set is full.
    pub fn room(&self) -> usize {
        self.capacity.saturating_sub(self.targets.len())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn satisfied_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_satisfied).count()
    }
}
