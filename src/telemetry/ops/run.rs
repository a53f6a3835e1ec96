use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Run;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Discover, Process, Export }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Discover => "discover",
        Phase::Process => "process",
        Phase::Export => "export",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Discover => info_span!("discover"),
        Phase::Process => info_span!("process"),
        Phase::Export => info_span!("export"),
    }}
}

impl OpMarker for Run {
    const NAME: &'static str = "run";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("run") }
}
