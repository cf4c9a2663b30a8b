//! Per-renderer memo of the last drawn frame.

use crate::props::RenderProps;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub props: RenderProps,
    pub rendered_at: Instant,
}

/// Skips frames whose inputs match the last one drawn, unless that frame is older than
/// `max_age`.
#[derive(Debug, Clone)]
pub struct RenderCache {
    snapshot: Option<RenderSnapshot>,
    max_age: Duration,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl RenderCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            snapshot: None,
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn snapshot(&self) -> Option<&RenderSnapshot> {
        self.snapshot.as_ref()
    }

    /// True if the last drawn frame had exactly these inputs, whatever its age.
    pub fn is_current(&self, props: &RenderProps) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.props == *props)
    }

    pub fn should_render(&self, props: &RenderProps, now: Instant) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return true;
        };
        if snapshot.props != *props {
            return true;
        }
        let age = now.saturating_duration_since(snapshot.rendered_at);
        if age > self.max_age {
            tracing::trace!(?age, "cached frame expired");
            return true;
        }
        false
    }

    pub fn commit(&mut self, props: RenderProps, now: Instant) {
        self.snapshot = Some(RenderSnapshot {
            props,
            rendered_at: now,
        });
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }
}
