use std::collections::VecDeque;

/// Whether the overlay is currently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Requests a visibility change. The graph decides whether anything happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRequest {
    Show,
    Hide,
    Toggle,
}

/// One observed state change, numbered in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityTransition {
    pub ordinal: u64,
    pub from: Visibility,
    pub to: Visibility,
}

pub struct VisibilityGraph;

impl VisibilityGraph {
    /// Pure function: (Current State, Request) -> New State.
    /// Returns None when the request leaves the state unchanged.
    pub fn transition(current: Visibility, request: VisibilityRequest) -> Option<Visibility> {
        use Visibility::*;
        use VisibilityRequest::*;

        match (current, request) {
            (Hidden, Show) | (Hidden, Toggle) => Some(Visible),
            (Visible, Hide) | (Visible, Toggle) => Some(Hidden),
            // show while shown, hide while hidden
            _ => None,
        }
    }
}

const MAX_TRANSITIONS: usize = 64;

/// Current visibility plus a bounded log of how it got there.
#[derive(Debug, Clone)]
pub struct VisibilityState {
    current: Visibility,
    log: VecDeque<VisibilityTransition>,
    next_ordinal: u64,
}

impl VisibilityState {
    pub fn new(initial: Visibility) -> Self {
        Self {
            current: initial,
            log: VecDeque::with_capacity(MAX_TRANSITIONS),
            next_ordinal: 1,
        }
    }

    pub fn current(&self) -> Visibility {
        self.current
    }

    pub fn apply(&mut self, request: VisibilityRequest) -> Option<VisibilityTransition> {
        let to = VisibilityGraph::transition(self.current, request)?;
        let transition = VisibilityTransition {
            ordinal: self.next_ordinal,
            from: self.current,
            to,
        };
        self.next_ordinal += 1;
        self.current = to;
        if self.log.len() >= MAX_TRANSITIONS {
            self.log.pop_front();
        }
        self.log.push_back(transition);
        Some(transition)
    }

    /// Most recent last.
    pub fn transitions(&self) -> impl Iterator<Item = &VisibilityTransition> + '_ {
        self.log.iter()
    }
}
