//! Prodrome symptom catalog and selection helpers

/// Bumped whenever symptoms are added, removed or re-keyed
pub const CATALOG_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProdromeSymptom {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SymptomCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub symptoms: &'static [ProdromeSymptom],
}

macro_rules! symptom {
    ($id:literal, $name:literal, $icon:literal, $desc:literal) => {
        ProdromeSymptom {
            id: $id,
            name: $name,
            icon: $icon,
            description: $desc,
        }
    };
}

pub static CATALOG: &[SymptomCategory] = &[
    SymptomCategory {
        id: "sensory",
        name: "Sensory",
        symptoms: &[
            symptom!("light_sensitivity", "Light sensitivity", "💡", "Bright light feels uncomfortable"),
            symptom!("sound_sensitivity", "Sound sensitivity", "🔊", "Normal sounds feel too loud"),
            symptom!("smell_sensitivity", "Smell sensitivity", "👃", "Odours feel stronger than usual"),
            symptom!("touch_sensitivity", "Skin sensitivity", "✋", "Touch or clothing feels irritating"),
            symptom!("ear_ringing", "Ringing ears", "🔔", "Buzzing or ringing in the ears"),
            symptom!("taste_change", "Altered taste", "👅", "Food tastes unusual or metallic"),
        ],
    },
    SymptomCategory {
        id: "mood_cognitive",
        name: "Mood & Cognitive",
        symptoms: &[
            symptom!("irritability", "Irritability", "😤", "Easily annoyed or short-tempered"),
            symptom!("anxiety", "Anxiety", "😟", "Restless, worried or on edge"),
            symptom!("depressed_mood", "Low mood", "😔", "Feeling down or flat"),
            symptom!("euphoria", "Unusual elation", "😃", "Feeling unusually energetic or happy"),
            symptom!("brain_fog", "Brain fog", "🌫", "Trouble thinking clearly"),
            symptom!("word_finding", "Word-finding trouble", "💬", "Struggling to find the right words"),
        ],
    },
    SymptomCategory {
        id: "physical",
        name: "Physical",
        symptoms: &[
            symptom!("neck_stiffness", "Neck stiffness", "🦒", "Tight or aching neck"),
            symptom!("shoulder_tension", "Shoulder tension", "💪", "Tension across the shoulders"),
            symptom!("muscle_aches", "Muscle aches", "🤕", "General aches in the body"),
            symptom!("cold_hands", "Cold hands or feet", "🧊", "Extremities feel cold"),
            symptom!("sweating", "Sweating", "💦", "Sweating more than usual"),
            symptom!("frequent_urination", "Frequent urination", "🚻", "Needing the bathroom more often"),
        ],
    },
    SymptomCategory {
        id: "digestive",
        name: "Digestive",
        symptoms: &[
            symptom!("food_cravings", "Food cravings", "🍫", "Craving sweet or salty food"),
            symptom!("nausea", "Nausea", "🤢", "Queasy or unsettled stomach"),
            symptom!("loss_of_appetite", "Loss of appetite", "🍽", "Not feeling like eating"),
            symptom!("thirst", "Increased thirst", "🥤", "Unusually thirsty"),
            symptom!("bloating", "Bloating", "🎈", "Full or swollen abdomen"),
            symptom!("constipation", "Constipation", "🚫", "Irregular digestion"),
        ],
    },
    SymptomCategory {
        id: "sleep_energy",
        name: "Sleep & Energy",
        symptoms: &[
            symptom!("fatigue", "Fatigue", "😩", "Tired despite normal rest"),
            symptom!("yawning", "Excessive yawning", "🥱", "Yawning repeatedly"),
            symptom!("insomnia", "Poor sleep", "🌙", "Trouble falling or staying asleep"),
            symptom!("oversleeping", "Oversleeping", "🛌", "Sleeping much longer than usual"),
            symptom!("restlessness", "Restlessness", "🔄", "Unable to settle or sit still"),
            symptom!("low_energy", "Low energy", "🔋", "Everything feels like an effort"),
        ],
    },
    SymptomCategory {
        id: "visual_neuro",
        name: "Visual & Neurological",
        symptoms: &[
            symptom!("blurred_vision", "Blurred vision", "👓", "Vision is hazy or unfocused"),
            symptom!("visual_spots", "Spots or flashes", "✨", "Seeing spots, sparkles or flashes"),
            symptom!("tingling", "Tingling", "🪡", "Pins and needles in face or limbs"),
            symptom!("dizziness", "Dizziness", "💫", "Light-headed or off balance"),
            symptom!("numbness", "Numbness", "🫥", "Loss of feeling in part of the body"),
            symptom!("clumsiness", "Clumsiness", "🫳", "Dropping things or bumping into things"),
        ],
    },
];

/// Total number of symptoms across all categories
pub fn catalog_len() -> usize {
    CATALOG.iter().map(|c| c.symptoms.len()).sum()
}

/// Iterate `(category, symptom)` pairs in display order
pub fn iter_symptoms() -> impl Iterator<Item = (&'static SymptomCategory, &'static ProdromeSymptom)> {
    CATALOG
        .iter()
        .flat_map(|c| c.symptoms.iter().map(move |s| (c, s)))
}

pub fn find_symptom(id: &str) -> Option<&'static ProdromeSymptom> {
    iter_symptoms().map(|(_, s)| s).find(|s| s.id == id)
}

/// Remove `id` if selected, otherwise append it. Returns the updated list.
pub fn toggle(selection: &[String], id: &str) -> Vec<String> {
    if selection.iter().any(|s| s == id) {
        selection.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut updated = Vec::with_capacity(selection.len() + 1);
        updated.extend_from_slice(selection);
        updated.push(id.to_string());
        updated
    }
}

#[inline]
pub fn is_selected(selection: &[String], id: &str) -> bool {
    selection.iter().any(|s| s == id)
}

/// Tip shown under the form once something is selected
pub fn tips_text(count: usize) -> Option<String> {
    if count == 0 {
        return None;
    }
    Some(format!(
        "You've noted {} warning sign{}. Logging these before a headache helps spot your personal early-warning pattern.",
        count,
        if count == 1 { "" } else { "s" }
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(CATALOG.len(), 6);
        assert_eq!(catalog_len(), 36);
        let ids: FxHashSet<&str> = iter_symptoms().map(|(_, s)| s.id).collect();
        assert_eq!(ids.len(), 36);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let original = vec!["nausea".to_string(), "fatigue".to_string()];
        let once = toggle(&original, "yawning");
        assert_eq!(once.len(), 3);
        assert!(is_selected(&once, "yawning"));
        let twice = toggle(&once, "yawning");
        assert_eq!(twice, original);
    }

    #[test]
    fn test_toggle_removes_existing_without_duplicates() {
        let selection = vec!["nausea".to_string(), "fatigue".to_string()];
        let removed = toggle(&selection, "nausea");
        assert_eq!(removed, vec!["fatigue".to_string()]);
        let readded = toggle(&removed, "nausea");
        assert_eq!(readded.iter().filter(|s| *s == "nausea").count(), 1);
    }

    #[test]
    fn test_tips_only_when_selected() {
        assert!(tips_text(0).is_none());
        assert!(tips_text(1).unwrap().contains("1 warning sign."));
        assert!(tips_text(4).unwrap().contains("4 warning signs"));
    }

    #[test]
    fn test_find_symptom() {
        assert_eq!(find_symptom("dizziness").map(|s| s.name), Some("Dizziness"));
        assert!(find_symptom("unknown").is_none());
    }
}
