//! Typewriter rendering.
//!
//! The [`Renderer`] reveals one [`Markup`] at a time onto a block of a
//! [`Surface`], one character per [`Renderer::tick`]. It never sleeps; the
//! front end decides how often to tick. Every reveal reports its
//! [`RevealId`] as completed exactly once, whether it ran to the end, was
//! cancelled, or was replaced by a newer reveal.

use verne_core::{Markup, Run};

/// A block on a surface. Ids from before a [`Surface::clear`] are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Clear generation the block belongs to.
    pub epoch: u64,
    /// Position within that generation.
    pub index: usize,
}

/// Where text ends up.
pub trait Surface {
    /// Append an empty block and return its id.
    fn open_block(&mut self) -> BlockId;

    /// Replace a block's content. Stale or unknown ids are ignored.
    fn set_block(&mut self, block: BlockId, runs: Vec<Run>);

    /// Remove every block.
    fn clear(&mut self);

    /// The room on display, or its transformed state, changed.
    fn room_changed(&mut self, room: &str, transformed: bool);
}

/// The backdrop a surface should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backdrop {
    /// Room id.
    pub room: String,
    /// Whether to show the transformed variant.
    pub transformed: bool,
}

/// In-memory surface: an ordered list of styled blocks.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    blocks: Vec<Vec<Run>>,
    epoch: u64,
    backdrop: Option<Backdrop>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All blocks, oldest first.
    pub fn blocks(&self) -> &[Vec<Run>] {
        &self.blocks
    }

    /// Each block as plain text.
    pub fn plain_lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
            .collect()
    }

    /// The whole transcript as plain text, one block per line.
    pub fn text(&self) -> String {
        self.plain_lines().join("\n")
    }

    /// Number of times the transcript has been cleared.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The last signalled backdrop.
    pub fn backdrop(&self) -> Option<&Backdrop> {
        self.backdrop.as_ref()
    }
}

impl Surface for Transcript {
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
        self.blocks.clear();
        self.epoch += 1;
    }

    fn room_changed(&mut self, room: &str, transformed: bool) {
        self.backdrop = Some(Backdrop {
            room: room.to_string(),
            transformed,
        });
    }
}

/// Identifies one reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevealId(pub u64);

#[derive(Debug)]
struct Active {
    id: RevealId,
    block: BlockId,
    markup: Markup,
    shown: usize,
}

/// Reveals text progressively. At most one reveal is active.
#[derive(Debug, Default)]
pub struct Renderer {
    active: Option<Active>,
    completed: Vec<RevealId>,
}

impl Renderer {
    /// A renderer with nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start revealing `markup` into `block`.
    ///
    /// A reveal already in flight is flushed and completed first. Empty
    /// text completes at once.
    pub fn reveal(
        &mut self,
        surface: &mut dyn Surface,
        markup: Markup,
        block: BlockId,
        id: RevealId,
    ) {
        self.cancel(surface);
        surface.set_block(block, Vec::new());
        if markup.is_empty() {
            self.completed.push(id);
            return;
        }
        self.active = Some(Active {
            id,
            block,
            markup,
            shown: 0,
        });
    }

    /// Show one more character. Returns `true` if this finished the reveal.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.shown += 1;
        surface.set_block(active.block, active.markup.prefix(active.shown));
        if active.shown < active.markup.len() {
            return false;
        }
        self.finish_active();
        true
    }

    /// Flush the active reveal's full text and complete it.
    pub fn cancel(&mut self, surface: &mut dyn Surface) {
        let Some(active) = self.active.take() else {
            return;
        };
        surface.set_block(active.block, active.markup.runs().to_vec());
        self.completed.push(active.id);
    }

    /// Whether a reveal is in flight.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Take the ids completed since the last call, in completion order.
    pub fn drain_completed(&mut self) -> Vec<RevealId> {
        std::mem::take(&mut self.completed)
    }

    fn finish_active(&mut self) {
        if let Some(active) = self.active.take() {
            self.completed.push(active.id);
        }
    }
}
