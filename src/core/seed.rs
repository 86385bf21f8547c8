//! Built-in seed personas: the initial candidate pool

use tracing::{debug, info};

use crate::core::store::ProfileStore;
use crate::types::{
    ArenaResult, ConflictStyle, Energy, Humor, PersonalityTags, Planning, Profile,
};

struct SeedPersona {
    name: &'static str,
    values: [&'static str; 3],
    dealbreakers: [&'static str; 2],
    humor: Humor,
    energy: Energy,
    planning: Planning,
    conflict: ConflictStyle,
}

const SEED_PERSONAS: [SeedPersona; 10] = [
    SeedPersona {
        name: "Alex",
        values: ["Career", "Travel", "Independence"],
        dealbreakers: ["Smoking", "No ambition"],
        humor: Humor::Dry,
        energy: Energy::High,
        planning: Planning::Spontaneous,
        conflict: ConflictStyle::Direct,
    },
    SeedPersona {
        name: "Jordan",
        values: ["Family", "Stability", "Honesty"],
        dealbreakers: ["Dishonesty", "Reckless spending"],
        humor: Humor::Playful,
        energy: Energy::Balanced,
        planning: Planning::Planned,
        conflict: ConflictStyle::Collaborative,
    },
    SeedPersona {
        name: "Casey",
        values: ["Creativity", "Freedom", "Nature"],
        dealbreakers: ["Controlling behavior", "Close-mindedness"],
        humor: Humor::Silly,
        energy: Energy::Chill,
        planning: Planning::Spontaneous,
        conflict: ConflictStyle::Avoidant,
    },
    SeedPersona {
        name: "Morgan",
        values: ["Health", "Learning", "Community"],
        dealbreakers: ["Smoking", "Negativity"],
        humor: Humor::Sarcastic,
        energy: Energy::High,
        planning: Planning::Planned,
        conflict: ConflictStyle::Direct,
    },
    SeedPersona {
        name: "Riley",
        values: ["Adventure", "Authenticity", "Growth"],
        dealbreakers: ["Judgmental", "No sense of humor"],
        humor: Humor::Playful,
        energy: Energy::High,
        planning: Planning::Spontaneous,
        conflict: ConflictStyle::Collaborative,
    },
    SeedPersona {
        name: "Taylor",
        values: ["Art", "Connection", "Peace"],
        dealbreakers: ["Aggression", "Workaholism"],
        humor: Humor::Dry,
        energy: Energy::Chill,
        planning: Planning::Planned,
        conflict: ConflictStyle::Avoidant,
    },
    SeedPersona {
        name: "Sam",
        values: ["Success", "Loyalty", "Fitness"],
        dealbreakers: ["Cheating", "Laziness"],
        humor: Humor::Sarcastic,
        energy: Energy::High,
        planning: Planning::Planned,
        conflict: ConflictStyle::Direct,
    },
    SeedPersona {
        name: "Drew",
        values: ["Music", "Spirituality", "Animals"],
        dealbreakers: ["Animal cruelty", "Materialism"],
        humor: Humor::Silly,
        energy: Energy::Balanced,
        planning: Planning::Spontaneous,
        conflict: ConflictStyle::Collaborative,
    },
    SeedPersona {
        name: "Quinn",
        values: ["Technology", "Innovation", "Efficiency"],
        dealbreakers: ["Anti-science", "Drama"],
        humor: Humor::Dry,
        energy: Energy::Balanced,
        planning: Planning::Planned,
        conflict: ConflictStyle::Direct,
    },
    SeedPersona {
        name: "Avery",
        values: ["Kindness", "Family", "Food"],
        dealbreakers: ["Rudeness", "Picky eating"],
        humor: Humor::Playful,
        energy: Energy::Chill,
        planning: Planning::Spontaneous,
        conflict: ConflictStyle::Avoidant,
    },
];

impl SeedPersona {
    fn to_profile(&self) -> Profile {
        Profile::seed(format!("seed_{}", self.name.to_lowercase()), self.name)
            .with_values(self.values)
            .with_dealbreakers(self.dealbreakers)
            .with_tags(PersonalityTags {
                humor: Some(self.humor),
                energy: Some(self.energy),
                planning: Some(self.planning),
                conflict: Some(self.conflict),
            })
    }
}

/// The built-in personas as profiles
pub fn seed_profiles() -> Vec<Profile> {
    SEED_PERSONAS.iter().map(SeedPersona::to_profile).collect()
}

/// Insert any built-in persona whose display name is not already seeded.
/// Returns the number inserted.
pub async fn seed_personas<S>(store: &S) -> ArenaResult<usize>
where
    S: ProfileStore + ?Sized,
{
    let existing = store.list_seed_profiles(&Default::default()).await?;
    let mut inserted = 0;

    for profile in seed_profiles() {
        let taken = existing
            .iter()
            .any(|p| p.display_name.as_deref() == profile.display_name.as_deref());
        if taken {
            debug!(persona = profile.display_name_or_anonymous(), "persona already exists, skipping");
            continue;
        }
        store.save_profile(profile).await?;
        inserted += 1;
    }

    info!(inserted, "seed personas loaded");
    Ok(inserted)
}
