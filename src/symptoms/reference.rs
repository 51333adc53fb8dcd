//! Built-in condition reference table

use crate::models::{ConditionRecord, ConditionTable};

/// Remedies returned for conditions missing from the table
pub const FALLBACK_REMEDIES: [&str; 3] = [
    "Rest and stay hydrated",
    "Take over-the-counter pain relievers if needed",
    "Monitor symptoms and seek medical attention if they worsen",
];

/// The five conditions shipped with the assistant, in tie-break order
pub fn default_table() -> crate::Result<ConditionTable> {
    ConditionTable::new(vec![
        ConditionRecord::new(
            "Common Cold",
            ["runny nose", "sore throat", "cough", "congestion", "sneezing"],
            [
                "Rest and get plenty of sleep",
                "Stay hydrated with warm fluids",
                "Use over-the-counter cold medications",
                "Try saline nasal drops",
                "Use a humidifier",
            ],
        )?,
        ConditionRecord::new(
            "Flu",
            ["fever", "body aches", "fatigue", "cough", "sore throat", "headache"],
            [
                "Rest and stay hydrated",
                "Take over-the-counter pain relievers",
                "Use a humidifier",
                "Stay home to prevent spreading",
                "Consider antiviral medications if prescribed",
            ],
        )?,
        ConditionRecord::new(
            "Allergies",
            ["sneezing", "itchy eyes", "runny nose", "congestion", "post-nasal drip"],
            [
                "Take antihistamines",
                "Use nasal sprays",
                "Avoid allergens",
                "Keep windows closed during high pollen times",
                "Use air purifiers",
            ],
        )?,
        ConditionRecord::new(
            "Migraine",
            ["severe headache", "nausea", "sensitivity to light", "sensitivity to sound"],
            [
                "Rest in a dark, quiet room",
                "Apply cold or warm compresses",
                "Stay hydrated",
                "Take prescribed migraine medications",
                "Practice stress management",
            ],
        )?,
        ConditionRecord::new(
            "Gastroenteritis",
            ["nausea", "vomiting", "diarrhea", "abdominal pain", "fever"],
            [
                "Stay hydrated with clear fluids",
                "Follow the BRAT diet (Bananas, Rice, Applesauce, Toast)",
                "Rest and avoid strenuous activity",
                "Avoid dairy and fatty foods",
                "Consider over-the-counter anti-diarrheal medications",
            ],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_shape() {
        let table = default_table().unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.get("Flu").unwrap().symptoms.len(), 6);
        assert_eq!(table.get("Migraine").unwrap().symptoms.len(), 4);
        assert!(table.iter().all(|r| r.remedies.len() == 5));
    }
}
