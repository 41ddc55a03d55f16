//! Domain role classification.

use kiln_core::split_words;
use kiln_ir::{ClassModel, DomainRole, RoleHint};

const USER_WORDS: &[&str] = &["User", "Account"];
const USER_FIELDS: &[&str] = &["email", "username"];
const SHIPMENT_WORDS: &[&str] = &["Shipment", "Parcel", "Package", "Delivery", "Colis"];
const TRACKING_PREFIX: &str = "tracking";

/// Structural signals the role classification looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSignals {
    pub user_name: bool,
    pub user_field: bool,
    pub shipment_name: bool,
    pub tracking_field: bool,
    pub stateful: bool,
}

impl RoleSignals {
    pub fn of(class: &ClassModel) -> Self {
        let last_word = split_words(&class.name).pop().unwrap_or_default();
        let names = || class.attributes.iter().map(|a| a.name.to_ascii_lowercase());

        Self {
            user_name: USER_WORDS.contains(&last_word.as_str()),
            user_field: names().any(|name| USER_FIELDS.contains(&name.as_str())),
            shipment_name: SHIPMENT_WORDS.contains(&last_word.as_str()),
            tracking_field: names().any(|name| name.starts_with(TRACKING_PREFIX)),
            stateful: class.is_stateful(),
        }
    }

    fn is_user(&self) -> bool {
        self.user_name && self.user_field
    }

    fn is_shipment(&self) -> bool {
        self.stateful && self.shipment_name && self.tracking_field
    }
}

/// Classify a class into a domain role.
///
/// Detection needs both a naming signal and a structural one. Anything
/// short of one full match yields [`DomainRole::Generic`]. An explicit
/// hint always wins.
pub fn detect_role(
    class: &ClassModel,
    hint: Option<RoleHint>,
    delivered_state: &str,
    picked_up_state: &str,
) -> DomainRole {
    let shipment = || DomainRole::ShipmentLike {
        delivered_state: delivered_state.to_string(),
        picked_up_state: picked_up_state.to_string(),
    };

    match hint {
        Some(RoleHint::Generic) => return DomainRole::Generic,
        Some(RoleHint::User) => return DomainRole::UserLike,
        Some(RoleHint::Shipment) => return shipment(),
        None => {}
    }

    let signals = RoleSignals::of(class);
    match (signals.is_user(), signals.is_shipment()) {
        (true, false) => DomainRole::UserLike,
        (false, true) => shipment(),
        _ => DomainRole::Generic,
    }
}

#[cfg(test)]
mod tests {
    use kiln_ir::{Attribute, SemanticType};

    use super::*;

    fn detect(class: &ClassModel) -> DomainRole {
        detect_role(class, None, "DELIVERED", "PICKED_UP")
    }

    fn attr(name: &str) -> Attribute {
        Attribute::new(name, SemanticType::String)
    }

    #[test]
    fn test_user_like() {
        let user = ClassModel::new("User").attribute(attr("email"));
        assert_eq!(detect(&user), DomainRole::UserLike);

        let account = ClassModel::new("CustomerAccount").attribute(attr("username"));
        assert_eq!(detect(&account), DomainRole::UserLike);
    }

    #[test]
    fn test_user_name_without_field_is_generic() {
        let user = ClassModel::new("User").attribute(attr("nickname"));
        assert_eq!(detect(&user), DomainRole::Generic);
    }

    #[test]
    fn test_composite_name_is_generic() {
        // "User" is not the last word
        let prefs = ClassModel::new("UserPreferences").attribute(attr("email"));
        assert_eq!(detect(&prefs), DomainRole::Generic);
    }

    #[test]
    fn test_shipment_like() {
        let parcel = ClassModel::new("Parcel")
            .attribute(attr("status"))
            .attribute(attr("trackingNumber"));
        assert_eq!(
            detect(&parcel),
            DomainRole::ShipmentLike {
                delivered_state: "DELIVERED".into(),
                picked_up_state: "PICKED_UP".into(),
            }
        );
    }

    #[test]
    fn test_shipment_requires_state() {
        let parcel = ClassModel::new("Parcel").attribute(attr("trackingNumber"));
        assert_eq!(detect(&parcel), DomainRole::Generic);
    }

    #[test]
    fn test_shipment_requires_tracking() {
        let parcel = ClassModel::new("Parcel").with_state(None);
        assert_eq!(detect(&parcel), DomainRole::Generic);
    }

    #[test]
    fn test_hint_wins() {
        let tag = ClassModel::new("Tag");
        assert_eq!(
            detect_role(&tag, Some(RoleHint::User), "D", "P"),
            DomainRole::UserLike
        );

        let user = ClassModel::new("User").attribute(attr("email"));
        assert_eq!(
            detect_role(&user, Some(RoleHint::Generic), "D", "P"),
            DomainRole::Generic
        );
    }
}
