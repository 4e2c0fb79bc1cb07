//! Match roster and score rules.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::status::MatchType;
use crate::types::DbId;

/// Check both teams against the match format and the group roster.
///
/// Each team must field exactly [`MatchType::team_size`] players, nobody may
/// play on both sides (or twice on one), and every player must belong to the
/// group.
pub fn validate_teams(
    match_type: MatchType,
    team_one: &[DbId],
    team_two: &[DbId],
    group_members: &HashSet<DbId>,
) -> Result<(), CoreError> {
    let expected = match_type.team_size();
    if team_one.len() != expected || team_two.len() != expected {
        return Err(CoreError::Validation(format!(
            "{match_type} requires exactly {expected} player(s) per team"
        )));
    }

    let mut seen = HashSet::new();
    for id in team_one.iter().chain(team_two) {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Player {id} appears more than once"
            )));
        }
        if !group_members.contains(id) {
            return Err(CoreError::Validation(format!(
                "Player {id} is not a member of this group"
            )));
        }
    }
    Ok(())
}

/// Render a score as `"a-b"`; `None` unless both sides are present.
pub fn format_score(
    team_one: Option<i32>,
    team_two: Option<i32>,
) -> Result<Option<String>, CoreError> {
    match (team_one, team_two) {
        (Some(a), Some(b)) if a < 0 || b < 0 => {
            Err(CoreError::Validation("Scores cannot be negative".into()))
        }
        (Some(a), Some(b)) => Ok(Some(format!("{a}-{b}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn members() -> HashSet<DbId> {
        [1, 2, 3, 4].into_iter().collect()
    }

    #[test]
    fn singles_needs_one_per_side() {
        assert!(validate_teams(MatchType::Singles, &[1], &[2], &members()).is_ok());
        assert_matches!(
            validate_teams(MatchType::Singles, &[1, 3], &[2], &members()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn doubles_needs_two_per_side() {
        assert!(validate_teams(MatchType::Doubles, &[1, 2], &[3, 4], &members()).is_ok());
        assert_matches!(
            validate_teams(MatchType::Doubles, &[1], &[3], &members()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn player_cannot_be_on_both_teams() {
        assert_matches!(
            validate_teams(MatchType::Doubles, &[1, 2], &[2, 3], &members()),
            Err(CoreError::Validation(msg)) if msg.contains("more than once")
        );
    }

    #[test]
    fn players_must_be_group_members() {
        assert_matches!(
            validate_teams(MatchType::Singles, &[1], &[99], &members()),
            Err(CoreError::Validation(msg)) if msg.contains("not a member")
        );
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(Some(11), Some(7)).unwrap(), Some("11-7".to_string()));
        assert_eq!(format_score(Some(11), None).unwrap(), None);
        assert_matches!(format_score(Some(-1), Some(3)), Err(CoreError::Validation(_)));
    }
}
