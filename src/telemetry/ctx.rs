use std::marker::PhantomData;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn, Span};

use crate::output::config::OutputConfig;
use crate::output::presenter::Emitter;
use crate::output::types::{Envelope, Meta};
use crate::telemetry::ops::{run::Run, search::Search};

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

/// A command: its name in logs and envelopes, its phases, its root span.
pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

#[derive(Copy, Clone)]
enum Lvl { Info, Debug, Warn }

/// Logging handle for one command. JSON logs carry `op=` on every line;
/// text logs stay bare.
pub struct LogCtx<O: OpMarker> {
    json: bool,
    _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    pub(crate) fn new(json: bool) -> Self { LogCtx { json, _marker: PhantomData } }

    /// Enter-able root span; logs a `start` line with the given details.
    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(fields);
        if details.is_empty() { info!(op = O::NAME, "start"); } else { info!(op = O::NAME, details = %details, "start"); }
        O::root_span()
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn span_kv<'a, T>(&self, ph: &O::Phase, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        debug!(op = O::NAME, phase = ph.name(), details = %kv_to_string(fields), "phase");
        ph.span()
    }

    fn say(&self, level: Lvl, msg: &str) {
        match (level, self.json) {
            (Lvl::Info, true) => info!(op = O::NAME, "{}", msg),
            (Lvl::Info, false) => info!("{}", msg),
            (Lvl::Debug, true) => debug!(op = O::NAME, "{}", msg),
            (Lvl::Debug, false) => debug!("{}", msg),
            (Lvl::Warn, true) => warn!(op = O::NAME, "{}", msg),
            (Lvl::Warn, false) => warn!("{}", msg),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) { self.say(Lvl::Info, msg.as_ref()) }
    pub fn debug(&self, msg: impl AsRef<str>) { self.say(Lvl::Debug, msg.as_ref()) }
    pub fn warn(&self, msg: impl AsRef<str>) { self.say(Lvl::Warn, msg.as_ref()) }

    pub fn info_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        self.say(Lvl::Info, &format!("{} {}", msg, kv_to_string(kv)))
    }

    pub fn warn_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        self.say(Lvl::Warn, &format!("{} {}", msg, kv_to_string(kv)))
    }

    fn emit(&self, env: Envelope) -> Result<()> {
        Emitter::from_env(OutputConfig::from_env()).emit(&env)?;
        Ok(())
    }

    pub fn plan<T: Serialize>(&self, plan: &T) -> Result<()> {
        self.emit(Envelope::plan(O::NAME, plan)?)
    }

    pub fn result<T: Serialize>(&self, result: &T) -> Result<()> {
        self.emit(Envelope::result(O::NAME, result, None)?)
    }

    pub fn result_timed<T: Serialize>(&self, result: &T, elapsed: Duration) -> Result<()> {
        self.emit(Envelope::result(O::NAME, result, Some(Meta::timed(elapsed.as_millis())))?)
    }
}

impl LogCtx<Search> {
    pub fn query_summary(&self, query: &str, found: usize, total: usize, added: usize) {
        if self.json { info!(op = Search::NAME, query, found, total, added, "query_summary"); }
        else { info!("🔎 {:?}: found={} total={} (+{})", query, found, total, added); }
    }
}

impl LogCtx<Run> {
    pub fn totals(&self, discovered: usize, processed: usize, skipped: usize) {
        if self.json { info!(op = Run::NAME, discovered, processed, skipped, "run_totals"); }
        else { info!("📊 discovered={} processed={} skipped={}", discovered, processed, skipped); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    kv.into_iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_pairs_join_with_spaces() {
        let s = kv_to_string([("url", "https://x".to_string()), ("n", 3.to_string())]);
        assert_eq!(s, "url=https://x n=3");
        assert_eq!(kv_to_string(Vec::<(&str, String)>::new()), "");
    }

    #[test]
    fn op_names_are_stable() {
        assert_eq!(Run::NAME, "run");
        assert_eq!(Search::NAME, "search");
        assert_eq!(crate::telemetry::ops::channel::Channel::NAME, "channel");
    }
}
