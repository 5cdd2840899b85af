//! Phases of the workflow and the actions each one permits.

use cbhunt_core::MissionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching(MissionKind),
    Reviewing,
    TrendResultsReady,
    IpProfileReady,
    MatchResultsReady,
    CollectionList,
    CollectionDetail,
    Error,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Fetching(kind) => write!(f, "fetching {kind}"),
            Phase::Reviewing => write!(f, "reviewing"),
            Phase::TrendResultsReady => write!(f, "showing trend results"),
            Phase::IpProfileReady => write!(f, "showing an IP profile"),
            Phase::MatchResultsReady => write!(f, "showing match results"),
            Phase::CollectionList => write!(f, "listing collections"),
            Phase::CollectionDetail => write!(f, "viewing a collection"),
            Phase::Error => write!(f, "in error"),
        }
    }
}

/// User intents that change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartMission,
    ConfirmReview,
    DiscardReview,
    SaveTrends,
    DeepResearch,
    Reset,
    OpenCollectionList,
    OpenCollection,
    Back,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::StartMission => "start a mission",
            Action::ConfirmReview => "confirm a review",
            Action::DiscardReview => "discard a review",
            Action::SaveTrends => "save trends",
            Action::DeepResearch => "research a trend",
            Action::Reset => "reset",
            Action::OpenCollectionList => "open the collection list",
            Action::OpenCollection => "open a collection",
            Action::Back => "go back",
        };
        f.write_str(name)
    }
}

/// Whether `action` is legal in `phase`.
///
/// Starting a mission while one is fetching is allowed; the newer mission
/// supersedes the older one. Collections can be browsed from every phase
/// except a fetch.
#[must_use]
pub fn permits(phase: Phase, action: Action) -> bool {
    match action {
        Action::Reset => true,
        Action::StartMission => matches!(
            phase,
            Phase::Idle | Phase::Fetching(_) | Phase::CollectionList | Phase::CollectionDetail
        ),
        Action::ConfirmReview | Action::DiscardReview => phase == Phase::Reviewing,
        Action::SaveTrends | Action::DeepResearch => phase == Phase::TrendResultsReady,
        Action::OpenCollectionList | Action::OpenCollection => !matches!(phase, Phase::Fetching(_)),
        Action::Back => matches!(phase, Phase::CollectionList | Phase::CollectionDetail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_always_permitted() {
        for phase in [
            Phase::Idle,
            Phase::Fetching(MissionKind::Scout),
            Phase::Reviewing,
            Phase::Error,
            Phase::CollectionDetail,
        ] {
            assert!(permits(phase, Action::Reset), "{phase}");
        }
    }

    #[test]
    fn review_actions_need_reviewing() {
        assert!(permits(Phase::Reviewing, Action::ConfirmReview));
        assert!(!permits(Phase::TrendResultsReady, Action::ConfirmReview));
        assert!(!permits(Phase::Idle, Action::DiscardReview));
    }

    #[test]
    fn browsing_is_blocked_only_while_fetching() {
        assert!(permits(Phase::Reviewing, Action::OpenCollection));
        assert!(permits(Phase::Error, Action::OpenCollectionList));
        assert!(!permits(
            Phase::Fetching(MissionKind::Trend),
            Action::OpenCollectionList
        ));
    }

    #[test]
    fn a_second_start_supersedes_the_first() {
        assert!(permits(
            Phase::Fetching(MissionKind::BrandSearch),
            Action::StartMission
        ));
        assert!(!permits(Phase::Reviewing, Action::StartMission));
    }
}
