//! Dashboard module - the unified analytics view and its offline formula.

mod momentum;
mod view;

pub use momentum::Momentum;
pub use view::{
    Annotation, AnnotationKind, Confidence, DashboardSource, DashboardView, FeedbackItem,
    Hypothesis, HypothesisStatus, TrendPoint,
};
