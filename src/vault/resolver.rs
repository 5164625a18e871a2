//! Picking one credential out of a site's list.
//!
//! Resolution order:
//! 1. no credentials -> `NotFound`
//! 2. exactly one -> it is selected, whatever the identifier says
//! 3. an identifier narrows the list to username/label matches first;
//!    none -> `NotFound`, one -> selected
//! 4. anything still ambiguous is handed back as candidates
//!
//! `resolve` never prompts.  `choose` runs the candidates through a
//! `Prompter` so any front end can supply its own selection loop.

use crate::errors::{CerberoError, Result};

use super::collab::Prompter;
use super::credential::Credential;

/// Outcome of resolving a lookup against one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Index of the single matching credential in the site's list.
    Selected(usize),
    /// Indices of the candidates the user must choose between.
    Ambiguous(Vec<usize>),
}

/// Resolve `identifier` against a site's credentials.
pub fn resolve(credentials: &[Credential], identifier: Option<&str>) -> Result<Resolution> {
    match credentials.len() {
        0 => return Err(not_found(identifier)),
        1 => return Ok(Resolution::Selected(0)),
        _ => {}
    }

    let candidates: Vec<usize> = match identifier {
        None => (0..credentials.len()).collect(),
        Some(id) => credentials
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matches(id))
            .map(|(i, _)| i)
            .collect(),
    };

    match candidates.as_slice() {
        [] => Err(not_found(identifier)),
        [only] => Ok(Resolution::Selected(*only)),
        _ => Ok(Resolution::Ambiguous(candidates)),
    }
}

/// Turn a `Resolution` into one index, asking `prompter` when ambiguous.
///
/// Returns `None` when the user cancels the selection.
pub fn choose(
    resolution: Resolution,
    credentials: &[Credential],
    message: &str,
    prompter: &mut dyn Prompter,
) -> Result<Option<usize>> {
    let candidates = match resolution {
        Resolution::Selected(idx) => return Ok(Some(idx)),
        Resolution::Ambiguous(candidates) => candidates,
    };

    let options: Vec<String> = candidates
        .iter()
        .map(|&i| credentials[i].display_name())
        .collect();

    match prompter.select(message, &options)? {
        Some(pick) if pick < candidates.len() => Ok(Some(candidates[pick])),
        Some(pick) => Err(CerberoError::InvalidInput(format!(
            "selection {} is out of range 1..={}",
            pick + 1,
            candidates.len()
        ))),
        None => Ok(None),
    }
}

fn not_found(identifier: Option<&str>) -> CerberoError {
    match identifier {
        Some(id) => CerberoError::NotFound(format!("'{id}'")),
        None => CerberoError::NotFound("this site".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::collab::ScriptedPrompter;

    fn sample() -> Vec<Credential> {
        vec![
            Credential::new("u1", "a", None),
            Credential::new("u1", "b", Some("work")),
            Credential::new("u2", "c", None),
        ]
    }

    #[test]
    fn empty_list_is_not_found() {
        assert!(matches!(resolve(&[], None), Err(CerberoError::NotFound(_))));
        assert!(matches!(
            resolve(&[], Some("x")),
            Err(CerberoError::NotFound(_))
        ));
    }

    #[test]
    fn single_entry_ignores_identifier() {
        let creds = vec![Credential::new("solo", "pw", None)];
        assert_eq!(resolve(&creds, None).unwrap(), Resolution::Selected(0));
        assert_eq!(
            resolve(&creds, Some("anything")).unwrap(),
            Resolution::Selected(0)
        );
    }

    #[test]
    fn label_picks_exactly_one() {
        assert_eq!(
            resolve(&sample(), Some("work")).unwrap(),
            Resolution::Selected(1)
        );
    }

    #[test]
    fn shared_username_is_ambiguous() {
        assert_eq!(
            resolve(&sample(), Some("u1")).unwrap(),
            Resolution::Ambiguous(vec![0, 1])
        );
    }

    #[test]
    fn no_identifier_with_many_is_ambiguous() {
        assert_eq!(
            resolve(&sample(), None).unwrap(),
            Resolution::Ambiguous(vec![0, 1, 2])
        );
    }

    #[test]
    fn unmatched_identifier_is_not_found() {
        assert!(matches!(
            resolve(&sample(), Some("nobody")),
            Err(CerberoError::NotFound(_))
        ));
    }

    #[test]
    fn choose_maps_pick_back_to_site_index() {
        let creds = sample();
        let mut prompter = ScriptedPrompter::new().with_select(Some(1));
        let picked = choose(
            Resolution::Ambiguous(vec![0, 2]),
            &creds,
            "pick",
            &mut prompter,
        )
        .unwrap();
        assert_eq!(picked, Some(2));
        assert_eq!(prompter.last_options(), &["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn choose_cancel_is_none() {
        let creds = sample();
        let mut prompter = ScriptedPrompter::new().with_select(None);
        let picked = choose(Resolution::Ambiguous(vec![0, 1]), &creds, "pick", &mut prompter)
            .unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn choose_selected_does_not_prompt() {
        let creds = sample();
        let mut prompter = ScriptedPrompter::new();
        let picked = choose(Resolution::Selected(2), &creds, "pick", &mut prompter).unwrap();
        assert_eq!(picked, Some(2));
        assert_eq!(prompter.prompts(), 0);
    }
}
