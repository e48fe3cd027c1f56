//! Turning input into steps.
//!
//! [`plan`] is a pure function of the world, the session, and one line of
//! input. It works on a scratch copy of the session and applies each
//! mutation to that copy as it emits it, so every decision later in the
//! turn sees the state the engine will have reached by then. That is what
//! keeps the transformation check at-most-once even when several triggers
//! fire in the same turn.

mod command;
mod complete;
/// Fixed player-facing text.
pub mod narration;

pub use command::{Command, GLOBAL_WORDS, parse_command};
pub use complete::{GLOBAL_COMMANDS, available_actions, complete, suggest};

use tracing::warn;
use verne_core::{Ending, Exit, ExitRef, Item, ItemKind, Mode, RiddleRef, SessionState, World};

use crate::step::{Mutation, PersistOp, Step};

/// Plan the steps for one line of input.
pub fn plan(world: &World, state: &SessionState, input: &str) -> Vec<Step> {
    let mut planner = Planner::new(world, state);
    match state.mode.clone() {
        Mode::Ended(_) => {}
        Mode::AwaitingEnter => planner.enter_room(),
        Mode::AwaitingRiddleAnswer(riddle) => planner.answer(&riddle, input),
        Mode::Normal => planner.command(input),
    }
    planner.steps
}

/// Steps that show the current room: its header, the backdrop signal, and
/// the entry text matching its transformed flag.
pub fn describe_room(world: &World, state: &SessionState) -> Vec<Step> {
    let mut planner = Planner::new(world, state);
    planner.describe_room();
    planner.steps
}

/// Steps shown when a session begins.
pub fn opening(world: &World, state: &SessionState) -> Vec<Step> {
    let mut steps = describe_room(world, state);
    steps.push(Step::Print(narration::PROMPT.to_string()));
    steps
}

struct Planner<'w> {
    world: &'w World,
    state: SessionState,
    steps: Vec<Step>,
}

impl<'w> Planner<'w> {
    fn new(world: &'w World, state: &SessionState) -> Self {
        Self {
            world,
            state: state.clone(),
            steps: Vec::new(),
        }
    }

    fn print(&mut self, text: impl Into<String>) {
        self.steps.push(Step::Print(text.into()));
    }

    fn reveal(&mut self, text: impl Into<String>) {
        self.steps.push(Step::Reveal(text.into()));
    }

    fn apply(&mut self, mutation: Mutation) {
        mutation.apply(&mut self.state);
        self.steps.push(Step::Apply(mutation));
    }

    fn signal_room(&mut self) {
        let room = self.state.current_room.clone();
        let transformed = self.state.is_transformed(&room);
        self.steps.push(Step::RoomChanged { room, transformed });
    }

    fn describe_room(&mut self) {
        let Some(room) = self.state.room(self.world) else {
            warn!(room = %self.state.current_room, "current room does not resolve");
            self.print(narration::MISSING_ROOM);
            return;
        };
        let entry = room.entry_for(self.state.is_transformed(&room.id));
        self.print(narration::room_header(&room.id));
        self.signal_room();
        self.reveal(entry);
    }

    fn enter_room(&mut self) {
        self.apply(Mutation::SetMode(Mode::Normal));
        self.steps.push(Step::Clear);
        self.describe_room();
        self.print(narration::PROMPT);
    }

    fn answer(&mut self, riddle_ref: &RiddleRef, input: &str) {
        let attempt = input.trim();
        if attempt.is_empty() {
            return;
        }
        self.print(narration::echo(attempt));

        let Some((name, riddle)) = riddle_ref.resolve(self.world) else {
            warn!(room = %riddle_ref.room, index = riddle_ref.index, "pending riddle vanished");
            self.apply(Mutation::SetMode(Mode::Normal));
            return;
        };
        if !riddle.is_answer(attempt) {
            self.reveal(narration::WRONG_ANSWER);
            return;
        }

        self.apply(Mutation::SetMode(Mode::Normal));
        self.reveal(riddle.success_text.as_str());
        let reward = riddle.reward(name);
        if !self.state.has_item(&reward) {
            self.apply(Mutation::Grant(reward.clone()));
            self.reveal(narration::added(&reward));
        }
        self.transformation_check();
    }

    fn command(&mut self, input: &str) {
        let Some(command) = parse_command(input) else {
            return;
        };
        let echoed = input.trim().to_lowercase();
        self.print(narration::echo(&echoed));

        match command {
            Command::Help => self.print(narration::HELP),
            Command::Inventory => match self.state.inventory_listing() {
                Some(listing) => self.print(narration::carrying(&listing)),
                None => self.print(narration::EMPTY_INVENTORY),
            },
            Command::Save => self.steps.push(Step::Persist(PersistOp::Save)),
            Command::Load => self.steps.push(Step::Persist(PersistOp::Load)),
            Command::Look => self.describe_room(),
            Command::Quit => {
                self.print(narration::GOODBYE);
                self.apply(Mutation::SetMode(Mode::Ended(Ending::Quit)));
            }
            Command::Action(word) => self.action(&word),
        }
    }

    fn action(&mut self, word: &str) {
        let world = self.world;
        let Some(room) = self.state.room(world) else {
            warn!(room = %self.state.current_room, "current room does not resolve");
            self.print(narration::MISSING_ROOM);
            return;
        };
        if let Some((index, item)) = room.find_item(word) {
            let at = RiddleRef {
                room: room.id.clone(),
                index,
            };
            self.use_item(item, at);
        } else if let Some((index, exit)) = room.find_exit(word) {
            let at = ExitRef {
                room: room.id.clone(),
                index,
            };
            self.take_exit(exit, at);
        } else {
            self.print(narration::NOT_UNDERSTOOD);
            if let Some(close) = suggest(world, &self.state, word) {
                self.print(narration::did_you_mean(&close));
            }
        }
    }

    fn use_item(&mut self, item: &Item, at: RiddleRef) {
        match &item.kind {
            ItemKind::Hint { text } => self.reveal(text.as_str()),
            ItemKind::Inventory {
                description,
                gives_item,
            } => {
                self.reveal(description.as_str());
                let Some(gift) = gives_item.as_deref().filter(|g| !g.is_empty()) else {
                    return;
                };
                if self.state.has_item(gift) {
                    self.reveal(narration::already_have(gift));
                } else {
                    self.apply(Mutation::Grant(gift.to_string()));
                    self.reveal(narration::take(gift));
                    self.transformation_check();
                }
            }
            ItemKind::Riddle(riddle) => {
                self.reveal(riddle.prompt.as_str());
                self.apply(Mutation::SetMode(Mode::AwaitingRiddleAnswer(at)));
            }
            ItemKind::Unknown => self.print(narration::UNKNOWN_ITEM),
        }
    }

    fn take_exit(&mut self, exit: &Exit, at: ExitRef) {
        if exit.to == self.world.end_room() {
            self.print(narration::VICTORY);
            self.apply(Mutation::SetMode(Mode::Ended(Ending::Escaped)));
            return;
        }
        if self.state.is_locked(exit, &at) {
            let key = exit.key.as_deref().filter(|k| self.state.has_item(k));
            let Some(key) = key else {
                self.reveal(narration::LOCKED);
                return;
            };
            let already_transformed = self.state.is_transformed(&at.room);
            self.apply(Mutation::Unlock(at));
            if !already_transformed {
                self.reveal(narration::unlock(key, &exit.name));
            }
            self.transformation_check();
        }
        self.move_through(exit);
    }

    fn move_through(&mut self, exit: &Exit) {
        let Some(destination) = self.world.room(&exit.to) else {
            warn!(exit = %exit.name, to = %exit.to, "exit leads to a missing room");
            self.print(narration::NOWHERE);
            return;
        };
        self.apply(Mutation::MoveTo(destination.id.clone()));
        self.print(narration::approach(&exit.name, &destination.id));
        self.apply(Mutation::SetMode(Mode::AwaitingEnter));
    }

    /// Transform the current room once, after its transform text (if any)
    /// has been shown.
    fn transformation_check(&mut self) {
        let Some(room) = self.state.room(self.world) else {
            return;
        };
        if self.state.is_transformed(&room.id) {
            return;
        }
        if let Some(text) = room.transform() {
            self.reveal(text);
        } else if room.after_text().is_none() {
            return;
        }
        self.apply(Mutation::MarkTransformed(room.id.clone()));
        self.signal_room();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verne_core::Room;

    const MANOR: &str = r#"{
        "start_room": "Hall",
        "end_room": "Outside",
        "rooms": [
            {
                "id": "Hall",
                "entry_text": "A dim **hall**.",
                "entry_text_after": "The hall glows.",
                "transform_text": "Light floods the hall.",
                "exits": [
                    {"name": "door", "to": "Study", "locked": true, "key": "brass key"},
                    {"name": "gate", "to": "Outside"},
                    {"name": "hatch", "to": "Cellar"},
                    {"name": "arch", "to": "Study"}
                ],
                "items": [
                    {"name": "note", "type": "hint", "text": "Try the drawer."},
                    {"name": "drawer", "type": "inventory", "description": "An old drawer.", "gives_item": "brass key"},
                    {"name": "sphinx", "type": "riddle", "prompt": "What has keys but no locks?", "answer": "Piano", "success_text": "Correct."},
                    {"name": "statue", "type": "marble"},
                    {"name": "door", "type": "hint", "text": "A door-shaped note."}
                ]
            },
            {
                "id": "Study",
                "entry_text": "Books everywhere.",
                "entry_text_after": "The books are tidy now.",
                "items": [
                    {"name": "mirror", "type": "riddle", "prompt": "Who?", "answer": "me", "success_text": "Yes.", "gives_item": "shard"}
                ]
            }
        ]
    }"#;

    fn manor() -> World {
        World::from_json(MANOR).unwrap()
    }

    fn run(world: &World, state: &mut SessionState, input: &str) -> Vec<Step> {
        let steps = plan(world, state, input);
        for step in &steps {
            if let Step::Apply(m) = step {
                m.apply(state);
            }
        }
        steps
    }

    fn texts(steps: &[Step]) -> Vec<&str> {
        steps
            .iter()
            .filter_map(|s| match s {
                Step::Print(t) | Step::Reveal(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn marks(steps: &[Step]) -> usize {
        steps
            .iter()
            .filter(|s| matches!(s, Step::Apply(Mutation::MarkTransformed(_))))
            .count()
    }

    #[test]
    fn blank_input_is_a_noop() {
        let world = manor();
        let state = SessionState::start(&world);
        assert!(plan(&world, &state, "   ").is_empty());
    }

    #[test]
    fn ended_ignores_everything() {
        let world = manor();
        let mut state = SessionState::start(&world);
        state.mode = Mode::Ended(Ending::Quit);
        assert!(plan(&world, &state, "help").is_empty());
        assert!(plan(&world, &state, "gate").is_empty());
    }

    #[test]
    fn echo_and_help() {
        let world = manor();
        let state = SessionState::start(&world);
        let steps = plan(&world, &state, "  HELP ");
        assert_eq!(texts(&steps), vec!["> help", narration::HELP]);
    }

    #[test]
    fn inventory_listing() {
        let world = manor();
        let mut state = SessionState::start(&world);
        let steps = plan(&world, &state, "inventory");
        assert_eq!(texts(&steps)[1], "You have nothing.");

        state.grant("zither");
        state.grant("apple");
        let steps = plan(&world, &state, "inventory");
        assert_eq!(texts(&steps)[1], "You are carrying: apple, zither");
    }

    #[test]
    fn quit_ends_the_session() {
        let world = manor();
        let mut state = SessionState::start(&world);
        let steps = run(&world, &mut state, "exit");
        assert_eq!(texts(&steps), vec!["> exit", "Goodbye!"]);
        assert_eq!(state.mode, Mode::Ended(Ending::Quit));
    }

    #[test]
    fn save_and_load_delegate() {
        let world = manor();
        let state = SessionState::start(&world);
        assert_eq!(
            plan(&world, &state, "save").last(),
            Some(&Step::Persist(PersistOp::Save))
        );
        assert_eq!(
            plan(&world, &state, "load").last(),
            Some(&Step::Persist(PersistOp::Load))
        );
    }

    #[test]
    fn look_uses_after_text_once_transformed() {
        let world = manor();
        let mut state = SessionState::start(&world);
        let steps = plan(&world, &state, "look");
        assert_eq!(texts(&steps), vec!["> look", "[Hall]", "A dim **hall**."]);

        state.mark_transformed("Hall");
        let steps = plan(&world, &state, "look");
        assert_eq!(texts(&steps)[2], "The hall glows.");
        assert!(steps.contains(&Step::RoomChanged {
            room: "Hall".into(),
            transformed: true
        }));
    }

    #[test]
    fn items_win_over_exits() {
        let world = manor();
        let mut state = SessionState::start(&world);
        state.grant("brass key");
        let steps = plan(&world, &state, "door");
        assert_eq!(texts(&steps), vec!["> door", "A door-shaped note."]);
    }

    #[test]
    fn unknown_command_suggests() {
        let world = manor();
        let state = SessionState::start(&world);
        let steps = plan(&world, &state, "drawr");
        assert_eq!(
            texts(&steps),
            vec!["> drawr", "I don't understand that command.", "Did you mean **drawer**?"]
        );

        let steps = plan(&world, &state, "xyzzy");
        assert_eq!(texts(&steps), vec!["> xyzzy", "I don't understand that command."]);
    }

    #[test]
    fn unknown_item_type() {
        let world = manor();
        let state = SessionState::start(&world);
        let steps = plan(&world, &state, "statue");
        assert_eq!(steps[1], Step::Print("[Unknown item type]".into()));
    }

    #[test]
    fn inventory_item_grants_once_and_transforms() {
        let world = manor();
        let mut state = SessionState::start(&world);
        let steps = run(&world, &mut state, "drawer");
        assert_eq!(
            texts(&steps),
            vec![
                "> drawer",
                "An old drawer.",
                "(You take the brass key)",
                "Light floods the hall."
            ]
        );
        assert!(state.has_item("brass key"));
        assert!(state.is_transformed("Hall"));
        assert_eq!(marks(&steps), 1);

        let steps = run(&world, &mut state, "drawer");
        assert_eq!(
            texts(&steps),
            vec!["> drawer", "An old drawer.", "(You already have the brass key)"]
        );
        assert_eq!(marks(&steps), 0);
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn transform_is_marked_after_its_text() {
        let world = manor();
        let state = SessionState::start(&world);
        let steps = plan(&world, &state, "drawer");
        let reveal = steps
            .iter()
            .position(|s| *s == Step::Reveal("Light floods the hall.".into()))
            .unwrap();
        let mark = steps
            .iter()
            .position(|s| matches!(s, Step::Apply(Mutation::MarkTransformed(_))))
            .unwrap();
        assert!(reveal < mark);
    }

    #[test]
    fn riddle_flow() {
        let world = manor();
        let mut state = SessionState::start(&world);
        run(&world, &mut state, "sphinx");
        assert!(matches!(state.mode, Mode::AwaitingRiddleAnswer(_)));

        assert!(run(&world, &mut state, "  ").is_empty());
        assert!(matches!(state.mode, Mode::AwaitingRiddleAnswer(_)));

        let steps = run(&world, &mut state, "organ");
        assert_eq!(texts(&steps), vec!["> organ", "That doesn't seem right."]);
        assert!(matches!(state.mode, Mode::AwaitingRiddleAnswer(_)));

        let steps = run(&world, &mut state, "  PiAnO ");
        assert_eq!(
            texts(&steps),
            vec![
                "> PiAnO",
                "Correct.",
                "(Added sphinx_solved to inventory)",
                "Light floods the hall."
            ]
        );
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.has_item("sphinx_solved"));
        assert!(state.is_transformed("Hall"));
    }

    #[test]
    fn solved_riddle_does_not_grant_twice() {
        let world = manor();
        let mut state = SessionState::start(&world);
        state.grant("sphinx_solved");
        state.mark_transformed("Hall");
        run(&world, &mut state, "sphinx");
        let steps = run(&world, &mut state, "piano");
        assert_eq!(texts(&steps), vec!["> piano", "Correct."]);
        assert_eq!(marks(&steps), 0);
    }

    #[test]
    fn riddle_with_after_text_marks_silently() {
        let world = manor();
        let mut state = SessionState::new("Study");
        run(&world, &mut state, "mirror");
        let steps = run(&world, &mut state, "ME");
        assert_eq!(
            texts(&steps),
            vec!["> ME", "Yes.", "(Added shard to inventory)"]
        );
        assert_eq!(marks(&steps), 1);
        assert!(state.is_transformed("Study"));
    }

    #[test]
    fn locked_exit_without_key() {
        let world = without_door_hint(&manor());
        let mut state = SessionState::start(&world);
        let steps = run(&world, &mut state, "door");
        assert_eq!(texts(&steps), vec!["> door", "It's locked."]);
        assert_eq!(state.current_room, "Hall");
        assert!(state.unlocked_exits.is_empty());
    }

    fn without_door_hint(world: &World) -> World {
        let mut hall = world.room("Hall").unwrap().clone();
        hall.items.retain(|i| i.name != "door");
        World::new("Hall", "Outside", vec![hall, world.room("Study").unwrap().clone()]).unwrap()
    }

    #[test]
    fn unlocking_transforms_then_moves() {
        let world = without_door_hint(&manor());
        let mut state = SessionState::start(&world);
        state.grant("brass key");
        let steps = run(&world, &mut state, "door");
        assert_eq!(
            texts(&steps),
            vec![
                "> door",
                "You use the brass key to unlock the door.",
                "Light floods the hall.",
                "You approach the door leading to the Study...\nPress ENTER to continue."
            ]
        );
        assert!(state.is_transformed("Hall"));
        assert_eq!(state.current_room, "Study");
        assert_eq!(state.mode, Mode::AwaitingEnter);
        assert!(state.unlocked_exits.contains(&ExitRef {
            room: "Hall".into(),
            index: 0
        }));
    }

    #[test]
    fn unlock_message_skipped_in_transformed_room() {
        let world = without_door_hint(&manor());
        let mut state = SessionState::start(&world);
        state.grant("brass key");
        state.mark_transformed("Hall");
        let steps = run(&world, &mut state, "door");
        assert_eq!(
            texts(&steps),
            vec![
                "> door",
                "You approach the door leading to the Study...\nPress ENTER to continue."
            ]
        );
    }

    #[test]
    fn unlocked_exit_stays_open() {
        let world = without_door_hint(&manor());
        let mut state = SessionState::start(&world);
        state.unlock(ExitRef {
            room: "Hall".into(),
            index: 0,
        });
        let steps = run(&world, &mut state, "door");
        assert_eq!(texts(&steps).len(), 2);
        assert_eq!(state.current_room, "Study");
    }

    #[test]
    fn enter_shows_new_room() {
        let world = manor();
        let mut state = SessionState::start(&world);
        run(&world, &mut state, "arch");
        assert_eq!(state.current_room, "Study");
        assert_eq!(state.mode, Mode::AwaitingEnter);

        let steps = run(&world, &mut state, "whatever");
        assert_eq!(steps[1], Step::Clear);
        assert_eq!(
            texts(&steps),
            vec!["[Study]", "Books everywhere.", narration::PROMPT]
        );
        assert!(steps.contains(&Step::RoomChanged {
            room: "Study".into(),
            transformed: false
        }));
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn end_room_wins_before_anything_else() {
        let world = manor();
        let mut state = SessionState::start(&world);
        let steps = run(&world, &mut state, "gate");
        assert_eq!(texts(&steps), vec!["> gate", narration::VICTORY]);
        assert_eq!(state.mode, Mode::Ended(Ending::Escaped));
        assert!(plan(&world, &state, "look").is_empty());
    }

    #[test]
    fn end_room_checked_before_lock() {
        let mut room = Room::new("a", "A.");
        room.exits.push(Exit {
            name: "portal".into(),
            to: "END".into(),
            locked: true,
            key: Some("orb".into()),
        });
        let world = World::new("a", "END", vec![room]).unwrap();
        let mut state = SessionState::start(&world);
        run(&world, &mut state, "portal");
        assert_eq!(state.mode, Mode::Ended(Ending::Escaped));
    }

    #[test]
    fn missing_destination_stays_put() {
        let world = manor();
        let mut state = SessionState::start(&world);
        let steps = run(&world, &mut state, "hatch");
        assert_eq!(
            texts(&steps),
            vec!["> hatch", "That path leads nowhere (Error in game data)."]
        );
        assert_eq!(state.current_room, "Hall");
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn opening_shows_room_and_prompt() {
        let world = manor();
        let state = SessionState::start(&world);
        let steps = opening(&world, &state);
        assert_eq!(
            texts(&steps),
            vec!["[Hall]", "A dim **hall**.", narration::PROMPT]
        );
    }
}
