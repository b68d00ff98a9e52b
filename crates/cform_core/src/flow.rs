//! Flow illustration
//!
//! A diagnostic-only sink that observes which component dispatched which
//! notification. Illustrators never fail and never affect
//! control flow.

use std::fmt;

/// Observer of component interactions
pub trait FlowIllustrator {
    /// Record that `source` dispatched `event`, concerning `related`
    fn illustrate(&self, source: &str, event: &str, related: &dyn fmt::Debug);
}

/// Illustrator that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopFlowIllustrator;

impl FlowIllustrator for NoopFlowIllustrator {
    fn illustrate(&self, _: &str, _: &str, _: &dyn fmt::Debug) {}
}

/// Illustrator that emits `tracing` events on the `cform::flow` target
#[derive(Clone, Copy, Debug)]
pub struct TracingFlowIllustrator {
    enabled: bool,
}

impl TracingFlowIllustrator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for TracingFlowIllustrator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FlowIllustrator for TracingFlowIllustrator {
    fn illustrate(&self, source: &str, event: &str, related: &dyn fmt::Debug) {
        if !self.enabled {
            return;
        }
        tracing::debug!(
            target: "cform::flow",
            source,
            event,
            related = ?related,
            "flow"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let writer = CaptureWriter::default();
        let make_writer = writer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || make_writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = writer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_enabled_illustrator_emits_trace() {
        let output = capture(|| {
            TracingFlowIllustrator::new(true).illustrate(
                "ControlElement",
                "cf-basic-element-submit",
                &"color",
            );
        });

        assert!(output.contains("cform::flow"));
        assert!(output.contains("ControlElement"));
        assert!(output.contains("cf-basic-element-submit"));
        assert!(output.contains("color"));
    }

    #[test]
    fn test_disabled_illustrator_is_silent() {
        let output = capture(|| {
            TracingFlowIllustrator::new(false).illustrate(
                "ControlElement",
                "cf-basic-element-submit",
                &"color",
            );
            NoopFlowIllustrator.illustrate("x", "y", &());
        });

        assert!(output.is_empty());
    }
}
