use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Search;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Query, FetchResults, ParseResults }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Query => "query",
        Phase::FetchResults => "fetch_results",
        Phase::ParseResults => "parse_results",
    }}
    fn span(&self) -> Span { match self {
        Phase::Query => info_span!("query"),
        Phase::FetchResults => info_span!("fetch_results"),
        Phase::ParseResults => info_span!("parse_results"),
    }}
}

impl OpMarker for Search {
    const NAME: &'static str = "search";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("search") }
}
