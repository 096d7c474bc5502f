use std::collections::BTreeMap;

pub const PROFILE_KEY: &str = "healthHubProfile";
pub const KIT_KEY: &str = "healthHubKit";

/// What a helper needs to know about the child in an emergency.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SafetyProfile {
    pub name: String,
    /// Parent or guardian phone number.
    pub contact: String,
    /// Things that frighten or overwhelm the child.
    pub triggers: String,
    /// What helps the child calm down.
    pub calming: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Contact,
    Triggers,
    Calming,
}

impl ProfileField {
    /// Maps a form control `name` attribute to its field.
    pub fn from_input_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(ProfileField::Name),
            "contact" => Some(ProfileField::Contact),
            "triggers" => Some(ProfileField::Triggers),
            "calming" => Some(ProfileField::Calming),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl SafetyProfile {
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Contact => &mut self.contact,
            ProfileField::Triggers => &mut self.triggers,
            ProfileField::Calming => &mut self.calming,
        };
        *slot = value.into();
    }

    /// Name and emergency contact must be filled in before saving.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("name"));
        }
        if self.contact.trim().is_empty() {
            return Err(ProfileError::MissingField("contact"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitItem {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

pub const KIT_ITEMS: [KitItem; 8] = [
    KitItem {
        id: "bandages",
        name: "Plasters / Band-Aids",
        icon: "🩹",
    },
    KitItem {
        id: "wipes",
        name: "Antiseptic Wipes",
        icon: "🧻",
    },
    KitItem {
        id: "gauze",
        name: "Gauze Pads",
        icon: "⬜",
    },
    KitItem {
        id: "scissors",
        name: "Scissors",
        icon: "✂️",
    },
    KitItem {
        id: "gloves",
        name: "Disposable Gloves",
        icon: "🧤",
    },
    KitItem {
        id: "flashlight",
        name: "Flashlight",
        icon: "🔦",
    },
    KitItem {
        id: "thermometer",
        name: "Thermometer",
        icon: "🌡️",
    },
    KitItem {
        id: "icepack",
        name: "Instant Ice Pack",
        icon: "🧊",
    },
];

/// Which home first-aid kit items the child has found.
///
/// Persisted as a JSON object of item id to checked flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct KitChecklist {
    checked: BTreeMap<String, bool>,
}

impl KitChecklist {
    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.get(id).copied().unwrap_or(false)
    }

    /// Flips an item. Ids outside the kit are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !KIT_ITEMS.iter().any(|item| item.id == id) {
            return false;
        }
        let entry = self.checked.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        true
    }

    pub fn checked_count(&self) -> usize {
        KIT_ITEMS
            .iter()
            .filter(|item| self.is_checked(item.id))
            .count()
    }

    /// Share of the kit gathered, from 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        self.checked_count() as f64 / KIT_ITEMS.len() as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.checked_count() == KIT_ITEMS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_requires_name_and_contact() {
        let mut profile = SafetyProfile::default();
        assert_eq!(profile.validate(), Err(ProfileError::MissingField("name")));

        profile.set(ProfileField::Name, "Sam");
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MissingField("contact"))
        );

        profile.set(ProfileField::Contact, "555-0100");
        assert_eq!(profile.validate(), Ok(()));
    }

    #[test]
    fn form_names_map_to_fields() {
        assert_eq!(
            ProfileField::from_input_name("calming"),
            Some(ProfileField::Calming)
        );
        assert_eq!(ProfileField::from_input_name("email"), None);
    }

    #[test]
    fn profile_parses_partial_json() {
        let profile: SafetyProfile =
            serde_json::from_str(r#"{ "name": "Sam" }"#).expect("profile should parse");
        assert_eq!(profile.name, "Sam");
        assert!(profile.triggers.is_empty());
    }

    #[test]
    fn toggling_tracks_progress() {
        let mut kit = KitChecklist::default();
        assert!(kit.toggle("gloves"));
        assert!(kit.toggle("gauze"));
        assert_eq!(kit.progress_percent(), 25.0);

        assert!(kit.toggle("gloves"));
        assert!(!kit.is_checked("gloves"));
        assert_eq!(kit.checked_count(), 1);
    }

    #[test]
    fn unknown_items_are_ignored() {
        let mut kit = KitChecklist::default();
        assert!(!kit.toggle("defibrillator"));
        assert_eq!(kit.checked_count(), 0);
    }

    #[test]
    fn full_kit_is_complete() {
        let mut kit = KitChecklist::default();
        for item in &KIT_ITEMS {
            kit.toggle(item.id);
        }
        assert!(kit.is_complete());
        assert_eq!(kit.progress_percent(), 100.0);
    }

    #[test]
    fn checklist_uses_flat_json_object() {
        let kit: KitChecklist = serde_json::from_str(r#"{ "wipes": true, "scissors": false }"#)
            .expect("checklist should parse");
        assert!(kit.is_checked("wipes"));
        assert!(!kit.is_checked("scissors"));
        assert_eq!(
            serde_json::to_string(&kit).expect("checklist should serialize"),
            r#"{"scissors":false,"wipes":true}"#
        );
    }
}
