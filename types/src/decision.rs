use serde::{Deserialize, Serialize};

/// A terminal per-candidate decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Reject(Option<String>),
    Skip,
}

impl Decision {
    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Self::Confirm => Action::Confirmed,
            Self::Reject(_) => Action::Rejected,
            Self::Skip => Action::Skipped,
        }
    }

    /// The server-side verdict, if this decision is sent at all.
    ///
    /// Skip is purely local and has none.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Confirm => Some(Verdict::confirm()),
            Self::Reject(reason) => Some(Verdict::reject(reason.clone())),
            Self::Skip => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Reject(reason) => reason.as_deref(),
            Self::Confirm | Self::Skip => None,
        }
    }
}

/// What the history records for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Confirmed,
    Rejected,
    Skipped,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Skipped => "skipped",
        }
    }
}

/// Request body of the submit-decision call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub reject: bool,
    pub rejection_reason: Option<String>,
}

impl Verdict {
    #[must_use]
    pub fn confirm() -> Self {
        Self {
            reject: false,
            rejection_reason: None,
        }
    }

    #[must_use]
    pub fn reject(reason: Option<String>) -> Self {
        Self {
            reject: true,
            rejection_reason: reason,
        }
    }
}

/// Structured reasons offered when rejecting a pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotSameVehicle,
    NotSamePerson,
    DifferentClass,
    PoorImageQuality,
    ImpossibleTiming,
    Other(String),
}

impl RejectReason {
    /// Fixed options, in display order. `Other` is offered after these.
    pub const PRESETS: [Self; 5] = [
        Self::NotSameVehicle,
        Self::NotSamePerson,
        Self::DifferentClass,
        Self::PoorImageQuality,
        Self::ImpossibleTiming,
    ];

    /// Wire tag sent as `rejection_reason`.
    ///
    /// `Other` with blank text is still a valid tag.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::NotSameVehicle => "not_same_vehicle".to_string(),
            Self::NotSamePerson => "not_same_person".to_string(),
            Self::DifferentClass => "different_class".to_string(),
            Self::PoorImageQuality => "poor_image_quality".to_string(),
            Self::ImpossibleTiming => "impossible_timing".to_string(),
            Self::Other(text) => {
                let text = text.trim();
                if text.is_empty() {
                    "other".to_string()
                } else {
                    format!("other: {text}")
                }
            }
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotSameVehicle => "Not the same vehicle",
            Self::NotSamePerson => "Not the same person",
            Self::DifferentClass => "Different object class",
            Self::PoorImageQuality => "Crops too poor to tell",
            Self::ImpossibleTiming => "Timing is impossible",
            Self::Other(_) => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_confirm_and_reject_have_verdicts() {
        assert_eq!(Decision::Confirm.verdict(), Some(Verdict::confirm()));
        assert_eq!(
            Decision::Reject(Some("not_same_vehicle".into())).verdict(),
            Some(Verdict::reject(Some("not_same_vehicle".into())))
        );
        assert_eq!(Decision::Skip.verdict(), None);
    }

    #[test]
    fn verdict_wire_shape() {
        let body = serde_json::to_value(Verdict::confirm()).unwrap();
        assert_eq!(body, serde_json::json!({"reject": false, "rejection_reason": null}));

        let body = serde_json::to_value(Verdict::reject(Some("other".into()))).unwrap();
        assert_eq!(body, serde_json::json!({"reject": true, "rejection_reason": "other"}));
    }

    #[test]
    fn other_reason_tags() {
        assert_eq!(RejectReason::Other(String::new()).tag(), "other");
        assert_eq!(RejectReason::Other("   ".into()).tag(), "other");
        assert_eq!(
            RejectReason::Other(" parked car ".into()).tag(),
            "other: parked car"
        );
        assert_eq!(RejectReason::NotSameVehicle.tag(), "not_same_vehicle");
    }
}
