//! # Option Lists
//!
//! The closed choice lists of the business-details step. Each enum is
//! serialized as its portal label (`"Private Limited Company"`, not
//! `"PrivateLimited"`) so that the record and the receipt read the same way
//! the user saw them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Declare a label-backed option enum with `ALL`, `label()`, `from_label()`,
/// `Display`, and label-based serde.
macro_rules! labelled_options {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The label shown to the user and used on the wire.
            pub fn label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Look up an option by its exact label.
            pub fn from_label(label: &str) -> Result<Self, ValidationError> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == label)
                    .ok_or_else(|| ValidationError::UnknownOption {
                        kind: $kind,
                        label: label.to_string(),
                    })
            }

            /// All labels, in display order.
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|option| option.label()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_label(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

labelled_options! {
    /// Legal form of the enterprise.
    pub enum OrganizationType ("organization type") {
        Proprietorship => "Proprietorship Firm",
        Partnership => "Partnership Firm",
        HinduUndividedFamily => "Hindu Undivided Family (HUF)",
        PrivateLimited => "Private Limited Company",
        PublicLimited => "Public Limited Company",
        LimitedLiabilityPartnership => "Limited Liability Partnership (LLP)",
        CooperativeSociety => "Cooperative Society",
        SelfHelpGroup => "Self Help Group",
    }
}

labelled_options! {
    /// Social category of the entrepreneur.
    pub enum SocialCategory ("social category") {
        General => "General/Open",
        ScheduledCaste => "Scheduled Caste (SC)",
        ScheduledTribe => "Scheduled Tribe (ST)",
        OtherBackwardClass => "Other Backward Class (OBC)",
    }
}

labelled_options! {
    /// Gender of the entrepreneur.
    pub enum Gender ("gender") {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

labelled_options! {
    /// Whether the entrepreneur is physically handicapped.
    pub enum DisabilityStatus ("disability status") {
        No => "No",
        Yes => "Yes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_counts() {
        assert_eq!(OrganizationType::ALL.len(), 8);
        assert_eq!(SocialCategory::ALL.len(), 4);
        assert_eq!(Gender::ALL.len(), 3);
        assert_eq!(DisabilityStatus::ALL.len(), 2);
    }

    #[test]
    fn labels_roundtrip_through_from_label() {
        for option in OrganizationType::ALL {
            assert_eq!(OrganizationType::from_label(option.label()).unwrap(), *option);
        }
        for option in SocialCategory::ALL {
            assert_eq!(SocialCategory::from_label(option.label()).unwrap(), *option);
        }
    }

    #[test]
    fn from_label_is_exact() {
        assert!(Gender::from_label("male").is_err());
        assert!(OrganizationType::from_label("").is_err());
        let err = SocialCategory::from_label("SC").unwrap_err();
        assert!(err.to_string().contains("social category"));
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&OrganizationType::HinduUndividedFamily).unwrap();
        assert_eq!(json, "\"Hindu Undivided Family (HUF)\"");
        let back: DisabilityStatus = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(back, DisabilityStatus::Yes);
    }

    #[test]
    fn deserialize_rejects_unknown_label() {
        let r: Result<Gender, _> = serde_json::from_str("\"Robot\"");
        assert!(r.is_err());
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(SocialCategory::OtherBackwardClass.to_string(), "Other Backward Class (OBC)");
    }
}
