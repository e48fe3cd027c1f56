//! Fixed player-facing text.

/// Shown after every room display.
pub const PROMPT: &str = "» Type a command to interact (or type **help**).";

/// Response to `help`.
pub const HELP: &str = "Commands:
  **look**       - describe the current room again
  **inventory**  - list the things you're carrying
  **help**       - this message
  **save**       - save your progress
  **load**       - load your saved progress
  **quit**       - leave the game
Otherwise type one of the **bolded** action words you see.";

/// Inventory listing when nothing is held.
pub const EMPTY_INVENTORY: &str = "You have nothing.";
/// Farewell on `quit`.
pub const GOODBYE: &str = "Goodbye!";
/// No global command, item, or exit matched.
pub const NOT_UNDERSTOOD: &str = "I don't understand that command.";
/// Wrong riddle answer.
pub const WRONG_ANSWER: &str = "That doesn't seem right.";
/// Locked exit without the key.
pub const LOCKED: &str = "It's locked.";
/// Exit whose destination is missing from the world.
pub const NOWHERE: &str = "That path leads nowhere (Error in game data).";
/// Shown when the player reaches the end room.
pub const VICTORY: &str = "\nYou step through the portal and feel reality twist…\nCongratulations! You have escaped the mansion!";
/// Item of a type the engine does not know.
pub const UNKNOWN_ITEM: &str = "[Unknown item type]";
/// The current room id does not resolve.
pub const MISSING_ROOM: &str = "Error: Cannot find the current room.";

/// Save succeeded.
pub const SAVED: &str = "Game saved.";
/// Store rejected the write.
pub const SAVE_FAILED: &str = "Failed to save game.";
/// Nothing stored under the save key.
pub const NO_SAVE: &str = "No saved game found.";
/// Restore succeeded.
pub const LOADED: &str = "Game loaded.";

/// Echo of a submitted line.
pub fn echo(input: &str) -> String {
    format!("> {input}")
}

/// Header line naming a room.
pub fn room_header(id: &str) -> String {
    format!("[{id}]")
}

/// Inventory listing.
pub fn carrying(listing: &str) -> String {
    format!("You are carrying: {listing}")
}

/// Item picked up from an inventory item.
pub fn take(item: &str) -> String {
    format!("(You take the {item})")
}

/// Inventory item whose gift is already held.
pub fn already_have(item: &str) -> String {
    format!("(You already have the {item})")
}

/// Riddle reward.
pub fn added(item: &str) -> String {
    format!("(Added {item} to inventory)")
}

/// A locked exit opens.
pub fn unlock(key: &str, exit: &str) -> String {
    format!("You use the {key} to unlock the {exit}.")
}

/// Leaving through an exit.
pub fn approach(exit: &str, destination: &str) -> String {
    format!("You approach the {exit} leading to the {destination}...\nPress ENTER to continue.")
}

/// A close match for an unknown command.
pub fn did_you_mean(word: &str) -> String {
    format!("Did you mean **{word}**?")
}

/// Restore failed.
pub fn load_failed(detail: &str) -> String {
    format!("Failed to load game: {detail}")
}
