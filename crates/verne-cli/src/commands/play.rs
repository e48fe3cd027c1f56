use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, warn};
use verne_core::Run;
use verne_engine::{BlockId, Engine, EngineConfig, FileStore, Surface};

pub fn run(world: &Path, save_dir: &Path, tick_ms: u64, plain: bool) -> Result<(), String> {
    let loaded = super::load_world(world)?;
    for warning in loaded.world.lint() {
        warn!(%warning, "content warning");
    }

    let config = EngineConfig::default().with_tick_millis(tick_ms);
    let engine = Engine::new(loaded.world, FileStore::new(save_dir), config);

    if plain {
        let stdin = io::stdin();
        let stdout = io::stdout();
        run_plain(engine, stdin.lock(), stdout.lock())
    } else {
        crate::tui::run(engine)
    }
}

/// Line mode: one command per input line, output printed as plain text.
fn run_plain(mut engine: Engine, input: impl BufRead, output: impl Write) -> Result<(), String> {
    let mut console = PlainConsole::new(output);
    engine.start(&mut console);
    engine.finish(&mut console);
    console.flush()?;

    for line in input.lines() {
        if engine.is_ended() {
            break;
        }
        let line = line.map_err(|e| format!("cannot read input: {e}"))?;
        engine.submit(&mut console, &line);
        engine.finish(&mut console);
        console.flush()?;
    }
    Ok(())
}

/// A surface that prints each block once it is final. Blocks are only
/// written on [`PlainConsole::flush`] or when the surface is cleared, so a
/// block still being revealed is never printed half-done.
struct PlainConsole<W: Write> {
    writer: W,
    blocks: Vec<Vec<Run>>,
    printed: usize,
    epoch: u64,
    ready: Vec<String>,
}

impl<W: Write> PlainConsole<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            blocks: Vec::new(),
            printed: 0,
            epoch: 0,
            ready: Vec::new(),
        }
    }

    fn take_unprinted(&mut self) {
        for runs in &self.blocks[self.printed..] {
            self.ready.push(runs.iter().map(|r| r.text.as_str()).collect());
        }
        self.printed = self.blocks.len();
    }

    fn flush(&mut self) -> Result<(), String> {
        self.take_unprinted();
        for line in self.ready.drain(..) {
            writeln!(self.writer, "{line}").map_err(|e| format!("cannot write output: {e}"))?;
        }
        self.writer
            .flush()
            .map_err(|e| format!("cannot write output: {e}"))
    }
}

impl<W: Write> Surface for PlainConsole<W> {
    fn open_block(&mut self) -> BlockId {
        self.blocks.push(Vec::new());
        BlockId {
            epoch: self.epoch,
            index: self.blocks.len() - 1,
        }
    }

    fn set_block(&mut self, block: BlockId, runs: Vec<Run>) {
        if block.epoch != self.epoch {
            return;
        }
        if let Some(slot) = self.blocks.get_mut(block.index) {
            *slot = runs;
        }
    }

    fn clear(&mut self) {
        self.take_unprinted();
        self.ready.push(String::new());
        self.blocks.clear();
        self.printed = 0;
        self.epoch += 1;
    }

    fn room_changed(&mut self, room: &str, transformed: bool) {
        debug!(room, transformed, "room changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verne_core::World;
    use verne_engine::MemoryStore;

    const WORLD: &str = r#"{
        "start_room": "Cell",
        "rooms": [
            {
                "id": "Cell",
                "entry_text": "A damp **cell**.",
                "exits": [{"name": "grate", "to": "Tunnel"}]
            },
            {
                "id": "Tunnel",
                "entry_text": "A long tunnel.",
                "exits": [{"name": "light", "to": "END"}]
            }
        ]
    }"#;

    fn play(input: &str) -> String {
        let world = World::from_json(WORLD).unwrap();
        let engine = Engine::new(world, MemoryStore::new(), EngineConfig::default());
        let mut output = Vec::new();
        run_plain(engine, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn shows_opening_without_markers() {
        let out = play("");
        assert!(out.starts_with("[Cell]\nA damp cell.\n"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn walks_to_victory() {
        let out = play("grate\n\nlight\nlook\n");
        assert!(out.contains(
            "> grate\nYou approach the grate leading to the Tunnel...\nPress ENTER to continue.\n"
        ));
        assert!(out.contains("\n\n[Tunnel]\nA long tunnel.\n"));
        assert!(out.contains("Congratulations"));
        assert!(!out.contains("> look"));
    }

    #[test]
    fn stale_blocks_are_dropped() {
        let mut console = PlainConsole::new(Vec::new());
        let old = console.open_block();
        console.clear();
        console.set_block(old, vec![Run::plain("ghost")]);
        console.flush().unwrap();
        let out = String::from_utf8(console.writer).unwrap();
        assert!(!out.contains("ghost"));
    }
}
