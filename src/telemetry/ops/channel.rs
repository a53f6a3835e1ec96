use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Channel;

#[derive(Copy, Clone, Debug)]
pub enum Phase { FetchAbout, Extract, Stats, Recency }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::FetchAbout => "fetch_about",
        Phase::Extract => "extract",
        Phase::Stats => "stats",
        Phase::Recency => "recency",
    }}
    fn span(&self) -> Span { match self {
        Phase::FetchAbout => info_span!("fetch_about"),
        Phase::Extract => info_span!("extract"),
        Phase::Stats => info_span!("stats"),
        Phase::Recency => info_span!("recency"),
    }}
}

impl OpMarker for Channel {
    const NAME: &'static str = "channel";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("channel") }
}
