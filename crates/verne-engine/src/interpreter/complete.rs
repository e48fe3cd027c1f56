//! Tab completion and "did you mean" suggestions.

use strsim::jaro_winkler;
use verne_core::{Mode, SessionState, World};

use super::command::GLOBAL_WORDS;

/// Global commands offered by tab completion.
pub const GLOBAL_COMMANDS: [&str; 3] = ["help", "inventory", "quit"];

/// Minimum similarity for a suggestion (0.0-1.0).
const SUGGEST_THRESHOLD: f64 = 0.8;

/// Action words the current room offers, lower-cased and sorted.
pub fn available_actions(world: &World, state: &SessionState) -> Vec<String> {
    state
        .room(world)
        .map(|room| room.action_words())
        .unwrap_or_default()
}

fn candidates(world: &World, state: &SessionState) -> Vec<String> {
    let mut words = available_actions(world, state);
    words.extend(GLOBAL_COMMANDS.iter().map(|w| w.to_string()));
    words.sort();
    words.dedup();
    words
}

/// Complete a partial command.
///
/// Returns the single candidate starting with `partial`, or `None` when
/// there are zero or several. Nothing completes while a riddle waits for its
/// answer, after the game has ended, or for blank input.
pub fn complete(world: &World, state: &SessionState, partial: &str) -> Option<String> {
    if matches!(state.mode, Mode::AwaitingRiddleAnswer(_) | Mode::Ended(_)) {
        return None;
    }
    let partial = partial.trim().to_lowercase();
    if partial.is_empty() {
        return None;
    }
    let mut matches = candidates(world, state)
        .into_iter()
        .filter(|word| word.starts_with(&partial));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// The known word closest to `input`, if any is similar enough.
pub fn suggest(world: &World, state: &SessionState, input: &str) -> Option<String> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }
    let mut words = available_actions(world, state);
    words.extend(GLOBAL_WORDS.iter().map(|w| w.to_string()));

    let mut best: Option<(String, f64)> = None;
    for word in words {
        let score = jaro_winkler(&input, &word);
        if score < SUGGEST_THRESHOLD {
            continue;
        }
        match &best {
            Some((_, top)) if *top >= score => {}
            _ => best = Some((word, score)),
        }
    }
    best.map(|(word, _)| word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verne_core::{Exit, Item, ItemKind, RiddleRef, Room};

    fn world() -> World {
        let mut hall = Room::new("hall", "A hall.");
        hall.exits.push(Exit {
            name: "Hallway".into(),
            to: "study".into(),
            locked: false,
            key: None,
        });
        hall.exits.push(Exit {
            name: "hearth".into(),
            to: "study".into(),
            locked: false,
            key: None,
        });
        hall.items.push(Item {
            name: "Lamp".into(),
            kind: ItemKind::Hint {
                text: "Bright.".into(),
            },
        });
        World::new("hall", "END", vec![hall, Room::new("study", "Quiet.")]).unwrap()
    }

    #[test]
    fn unique_prefix_completes() {
        let world = world();
        let state = SessionState::start(&world);
        assert_eq!(complete(&world, &state, "hel").as_deref(), Some("help"));
        assert_eq!(complete(&world, &state, "HA").as_deref(), Some("hallway"));
        assert_eq!(complete(&world, &state, "l").as_deref(), Some("lamp"));
    }

    #[test]
    fn ambiguous_prefix_completes_nothing() {
        let world = world();
        let state = SessionState::start(&world);
        assert_eq!(complete(&world, &state, "he"), None);
        assert_eq!(complete(&world, &state, "h"), None);
    }

    #[test]
    fn no_match_or_blank() {
        let world = world();
        let state = SessionState::start(&world);
        assert_eq!(complete(&world, &state, "xyz"), None);
        assert_eq!(complete(&world, &state, "  "), None);
    }

    #[test]
    fn only_completion_globals_are_offered() {
        let world = world();
        let state = SessionState::start(&world);
        assert_eq!(complete(&world, &state, "sa"), None);
        assert_eq!(complete(&world, &state, "q").as_deref(), Some("quit"));
    }

    #[test]
    fn riddle_mode_disables_completion() {
        let world = world();
        let mut state = SessionState::start(&world);
        state.mode = Mode::AwaitingRiddleAnswer(RiddleRef {
            room: "hall".into(),
            index: 0,
        });
        assert_eq!(complete(&world, &state, "hel"), None);
    }

    #[test]
    fn actions_of_current_room() {
        let world = world();
        let state = SessionState::start(&world);
        assert_eq!(
            available_actions(&world, &state),
            vec!["hallway", "hearth", "lamp"]
        );
    }

    #[test]
    fn suggestions() {
        let world = world();
        let state = SessionState::start(&world);
        assert_eq!(suggest(&world, &state, "lamb").as_deref(), Some("lamp"));
        assert_eq!(suggest(&world, &state, "inventroy").as_deref(), Some("inventory"));
        assert_eq!(suggest(&world, &state, "zzz"), None);
    }
}
