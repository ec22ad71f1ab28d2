//! Remembers the last centered position between runs.
//!
//! The state file holds the position together with the item count it was
//! taken against; a saved position is only restored onto a list of the same
//! length.

use std::path::Path;

use anyhow::Context;

use crate::core::dial::SavedState;

pub fn save(path: &Path, state: SavedState, item_count: usize) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let contents = format!("position = {}\nitems = {item_count}\n", state.position);
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), position = state.position, "position saved");
    Ok(())
}

/// The saved position for a list of `item_count` items, if there is one.
pub fn load(path: &Path, item_count: usize) -> Option<SavedState> {
    let contents = std::fs::read_to_string(path).ok()?;
    let mut position = None;
    let mut items = None;
    for line in contents.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "position" => position = value.trim().parse::<usize>().ok(),
            "items" => items = value.trim().parse::<usize>().ok(),
            _ => {}
        }
    }

    if items != Some(item_count) {
        tracing::debug!(?items, item_count, "saved position is for a different list");
        return None;
    }
    position
        .filter(|&p| p < item_count)
        .map(|position| SavedState { position })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dial-picker").join("state");
        save(&path, SavedState { position: 7 }, 12).unwrap();
        assert_eq!(load(&path, 12), Some(SavedState { position: 7 }));
    }

    #[test]
    fn test_other_list_length_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");
        save(&path, SavedState { position: 3 }, 10).unwrap();
        assert_eq!(load(&path, 9), None);
    }

    #[test]
    fn test_missing_or_garbled_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");
        assert_eq!(load(&path, 5), None);

        std::fs::write(&path, "position = banana\nitems = 5\n").unwrap();
        assert_eq!(load(&path, 5), None);

        std::fs::write(&path, "position = 9\nitems = 5\n").unwrap();
        assert_eq!(load(&path, 5), None);
    }
}
