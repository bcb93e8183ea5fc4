//! Deterministic staff name generation using curated name lists.

use crate::rng::SeedRng;

/// Deterministic name generator using curated name lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically
    pub fn generate_full_name(rng: &mut SeedRng) -> String {
        let first_name = Self::generate_first_name(rng);
        let last_name = Self::generate_last_name(rng);
        format!("{} {}", first_name, last_name)
    }

    pub fn generate_first_name(rng: &mut SeedRng) -> &'static str {
        *rng.pick(Self::first_names())
    }

    pub fn generate_last_name(rng: &mut SeedRng) -> &'static str {
        *rng.pick(Self::last_names())
    }

    /// Work email derived from a full name; `serial` keeps it unique.
    pub fn work_email(full_name: &str, serial: usize) -> String {
        let local: Vec<String> = full_name
            .split_whitespace()
            .map(|part| {
                part.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
            })
            .filter(|part| !part.is_empty())
            .collect();
        format!("{}.{serial}@hospital.example", local.join("."))
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Sarah", "Jennifer", "Marcus", "Lisa", "Kevin", "James", "Maria", "Rachel",
            "David", "Anna", "Amanda", "Thomas", "Michelle", "Robert", "Priya", "Omar",
            "Grace", "Daniel", "Aisha", "Lucas", "Mei", "Samuel", "Elena", "Noah",
            "Fatima", "Ethan", "Olivia", "Mateo", "Hannah", "Kwame", "Sofia", "Liam",
            "Chloe", "Arjun", "Isabel", "Jonah", "Leah", "Tomas", "Nadia", "Victor",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Martinez", "Walsh", "Thompson", "Park", "Wilson", "Garcia", "Green", "Williams",
            "Kim", "Smith", "Foster", "Johnson", "Lee", "Chen", "Patel", "Okafor",
            "Nguyen", "Rossi", "Haddad", "Kowalski", "Silva", "Brown", "Andersen", "Mensah",
            "Ivanova", "Tanaka", "Murphy", "Cohen", "Rahman", "Dubois", "Schmidt", "Lopez",
        ]
    }
}
