//! Tracing bootstrap. In the browser events go to the devtools console with the
//! console method matching the level; on the host the default `fmt` writer is
//! used. Events must never carry tokens, passcodes or email addresses.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const FALLBACK_FILTER: &str = "info";

/// Installs the global subscriber with `level` as the filter directive.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(level: &str) -> Result<()> {
    let filter = build_filter(level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    #[cfg(target_arch = "wasm32")]
    let builder = builder
        .with_ansi(false)
        .without_time()
        .with_writer(console::MakeConsoleWriter);

    builder
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Parses the configured directive, falling back to `info` when it is invalid.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level.trim()).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;
    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    pub struct MakeConsoleWriter;

    impl<'a> MakeWriter<'a> for MakeConsoleWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter::new(Level::INFO)
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter::new(*meta.level())
        }
    }

    /// Buffers one formatted event and hands it to `console.*` on flush/drop.
    pub struct ConsoleWriter {
        level: Level,
        buffer: Vec<u8>,
    }

    impl ConsoleWriter {
        fn new(level: Level) -> Self {
            Self {
                level,
                buffer: Vec::new(),
            }
        }

        fn emit(&mut self) {
            if self.buffer.is_empty() {
                return;
            }
            let text = String::from_utf8_lossy(&self.buffer);
            let line = JsValue::from_str(text.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
                _ => web_sys::console::log_1(&line),
            }
            self.buffer.clear();
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.emit();
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            self.emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::build_filter;

    #[test]
    fn invalid_directive_falls_back_to_info() {
        assert_eq!(build_filter("voterdesk=loud").to_string(), "info");
        assert_eq!(build_filter(" debug ").to_string(), "debug");
    }
}
