use std::io::{self, Write};

use super::config::{OutputConfig, OutputFormat};
use super::types::{Body, Envelope};

pub trait Presenter: Send + Sync {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()>;
}

/// Whole envelope, one line unless pretty.
pub struct JsonPresenter { pub pretty: bool }
impl Presenter for JsonPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        write_json(w, env, self.pretty)?;
        writeln!(w)
    }
}

/// Header line (`Plan: run` / `Result: channel (123 ms)`); the payload follows
/// only when pretty output is requested.
pub struct TextPresenter { pub pretty: bool }
impl Presenter for TextPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        let label = match env.body { Body::Plan(_) => "Plan", Body::Result(_) => "Result" };
        match env.meta.as_ref().and_then(|m| m.duration_ms) {
            Some(ms) => writeln!(w, "{}: {} ({} ms)", label, env.op, ms)?,
            None => writeln!(w, "{}: {}", label, env.op)?,
        }
        if self.pretty {
            write_json(w, env.payload(), true)?;
            writeln!(w)?;
        }
        Ok(())
    }
}

fn write_json<T: serde::Serialize + ?Sized>(w: &mut dyn Write, value: &T, pretty: bool) -> io::Result<()> {
    let res = if pretty { serde_json::to_writer_pretty(&mut *w, value) } else { serde_json::to_writer(&mut *w, value) };
    res.map_err(io::Error::other)
}

pub struct Emitter {
    presenter: Box<dyn Presenter>,
}

impl Emitter {
    pub fn from_env(cfg: OutputConfig) -> Self {
        let presenter: Box<dyn Presenter> = match cfg.format {
            OutputFormat::Json => Box::new(JsonPresenter { pretty: cfg.pretty }),
            OutputFormat::Text => Box::new(TextPresenter { pretty: cfg.pretty }),
        };
        Emitter { presenter }
    }

    pub fn emit(&self, env: &Envelope) -> io::Result<()> {
        let mut out = io::stdout().lock();
        self.presenter.emit(env, &mut out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::types::Meta;
    use serde_json::json;

    fn render(p: &dyn Presenter, env: &Envelope) -> String {
        let mut buf: Vec<u8> = Vec::new();
        p.emit(env, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn json_presenter_writes_one_line() {
        let env = Envelope::result("search", &json!({"channels": 2}), None).unwrap();
        let s = render(&JsonPresenter { pretty: false }, &env);
        assert_eq!(s.lines().count(), 1);
        assert!(s.contains("\"op\":\"search\""));
    }

    #[test]
    fn text_presenter_labels_plan_and_result() {
        let plan = Envelope::plan("run", &json!({})).unwrap();
        assert_eq!(render(&TextPresenter { pretty: false }, &plan), "Plan: run\n");

        let res = Envelope::result("channel", &json!({"Name": "x"}), Some(Meta::timed(7))).unwrap();
        assert_eq!(render(&TextPresenter { pretty: false }, &res), "Result: channel (7 ms)\n");
        assert!(render(&TextPresenter { pretty: true }, &res).contains("\"Name\": \"x\""));
    }
}
