//! The step sequencer.
//!
//! [`Engine`] owns the session and a queue of planned [`Step`]s. It runs
//! steps until it hits an animated reveal, then waits for the renderer to
//! finish that reveal before running the next one. New input always wins:
//! whatever is still pending is fast-forwarded to completion first, so the
//! session is in the state the previous turn promised before the new line
//! is interpreted.

use std::collections::VecDeque;

use tracing::{debug, info};
use verne_core::{Markup, Mode, SessionState, World};

use crate::config::EngineConfig;
use crate::interpreter;
use crate::persist::{self, KvStore};
use crate::render::{Renderer, RevealId, Surface};
use crate::step::{PersistOp, Step};

/// A running session.
pub struct Engine {
    world: World,
    state: SessionState,
    config: EngineConfig,
    store: Box<dyn KvStore>,
    renderer: Renderer,
    queue: VecDeque<Step>,
    waiting: Option<RevealId>,
    next_reveal: u64,
}

impl Engine {
    /// A session at the world's start room.
    pub fn new(world: World, store: impl KvStore + 'static, config: EngineConfig) -> Self {
        let state = SessionState::start(&world);
        Self {
            world,
            state,
            config,
            store: Box::new(store),
            renderer: Renderer::new(),
            queue: VecDeque::new(),
            waiting: None,
            next_reveal: 0,
        }
    }

    /// Show the starting room and prompt.
    pub fn start(&mut self, surface: &mut dyn Surface) {
        info!(room = %self.state.current_room, rooms = self.world.room_count(), "session started");
        self.queue.extend(interpreter::opening(&self.world, &self.state));
        self.pump(surface);
    }

    /// Handle one line of input.
    ///
    /// Ignored once the session has ended. Otherwise everything still
    /// pending completes instantly before the line is planned.
    pub fn submit(&mut self, surface: &mut dyn Surface, input: &str) {
        if self.state.is_ended() {
            debug!(input, "session ended; input ignored");
            return;
        }
        self.finish(surface);
        if self.state.is_ended() {
            return;
        }
        let steps = interpreter::plan(&self.world, &self.state, input);
        debug!(
            room = %self.state.current_room,
            mode = ?self.state.mode,
            input,
            steps = steps.len(),
            "planned turn"
        );
        self.queue.extend(steps);
        self.pump(surface);
    }

    /// Advance the active reveal by one character and resume the queue
    /// when it completes.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        if self.renderer.tick(surface) {
            self.pump(surface);
        }
    }

    /// Show the active reveal in full. Queued steps carry on as usual.
    pub fn skip(&mut self, surface: &mut dyn Surface) {
        self.renderer.cancel(surface);
        self.pump(surface);
    }

    /// Run everything pending to completion without animation.
    pub fn finish(&mut self, surface: &mut dyn Surface) {
        loop {
            self.renderer.cancel(surface);
            self.pump(surface);
            if !self.is_busy() {
                break;
            }
        }
    }

    /// Whether steps are pending or a reveal is in flight.
    pub fn is_busy(&self) -> bool {
        self.waiting.is_some() || !self.queue.is_empty()
    }

    /// Whether input is disabled for good.
    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    /// Tab completion for the current session.
    pub fn complete(&self, partial: &str) -> Option<String> {
        interpreter::complete(&self.world, &self.state, partial)
    }

    /// Action words of the current room.
    pub fn available_actions(&self) -> Vec<String> {
        interpreter::available_actions(&self.world, &self.state)
    }

    /// The session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current wait-mode.
    pub fn mode(&self) -> &Mode {
        &self.state.mode
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn pump(&mut self, surface: &mut dyn Surface) {
        loop {
            for id in self.renderer.drain_completed() {
                if self.waiting == Some(id) {
                    self.waiting = None;
                }
            }
            if self.waiting.is_some() {
                return;
            }
            let Some(step) = self.queue.pop_front() else {
                return;
            };
            self.execute(surface, step);
        }
    }

    fn execute(&mut self, surface: &mut dyn Surface, step: Step) {
        match step {
            Step::Print(text) => {
                let block = surface.open_block();
                surface.set_block(block, Markup::parse(&text).runs().to_vec());
            }
            Step::Reveal(text) => {
                let block = surface.open_block();
                let id = RevealId(self.next_reveal);
                self.next_reveal += 1;
                self.waiting = Some(id);
                self.renderer.reveal(surface, Markup::parse(&text), block, id);
                if self.config.is_instant() {
                    self.renderer.cancel(surface);
                }
            }
            Step::Clear => surface.clear(),
            Step::Apply(mutation) => mutation.apply(&mut self.state),
            Step::RoomChanged { room, transformed } => surface.room_changed(&room, transformed),
            Step::Persist(op) => {
                let steps = match op {
                    PersistOp::Save => persist::save_steps(
                        self.store.as_mut(),
                        &self.state,
                        &self.config.save_key,
                    ),
                    PersistOp::Load => persist::load_steps(
                        self.store.as_ref(),
                        &self.world,
                        &self.state,
                        &self.config.save_key,
                    ),
                };
                for step in steps.into_iter().rev() {
                    self.queue.push_front(step);
                }
            }
        }
    }
}
