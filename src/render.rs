//! Writes [`OutputEvent`]s to a console stream.

use std::io::Write;

use crate::interpreter::{OutputEvent, Pacer};

/// Write `events` in order. Line events go out whole; a typewriter event is
/// written character by character with `pacer` deciding the pause after each.
pub async fn render<W: Write>(
    events: &[OutputEvent],
    out: &mut W,
    pacer: &dyn Pacer,
) -> std::io::Result<()> {
    for event in events {
        match event {
            OutputEvent::Diagnostic(line) | OutputEvent::Notice(line) | OutputEvent::Reply(line) => {
                writeln!(out, "{line}")?;
                out.flush()?;
            }
            OutputEvent::Typewriter(text) => typewrite(text, out, pacer).await?,
        }
    }
    Ok(())
}

async fn typewrite<W: Write>(text: &str, out: &mut W, pacer: &dyn Pacer) -> std::io::Result<()> {
    let total = text.chars().count();
    let mut buf = [0u8; 4];
    for (i, ch) in text.chars().enumerate() {
        out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        out.flush()?;
        let pause = pacer.delay(i, total);
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
    writeln!(out)?;
    out.flush()
}
