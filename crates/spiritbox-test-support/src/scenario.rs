//! Scenario fixture.

use spiritbox_content::domain::scenario::{
    FinalGoalDefinition, GhostDefinition, RitualDefinition, ScenarioDefinition,
};

/// A small but complete scenario: a lost child spirit haunted by a demon
/// that can be banished with a ritual phrase.
#[must_use]
pub fn sample_scenario() -> ScenarioDefinition {
    let banishment = RitualDefinition {
        name: "Banishment".to_owned(),
        description: "Drives Malkanar out of the attic".to_owned(),
        phrase: "Be gone, Malkanar!".to_owned(),
    };

    ScenarioDefinition {
        scenario_type: "lost spirit and evil secondary spirit".to_owned(),
        scenario_description: "A group of ghost hunters in a dusty attic.".to_owned(),
        primary_ghost: GhostDefinition {
            name: "Akar".to_owned(),
            personality: "Lost, frightened and shy".to_owned(),
            goals: "Remember what happened and leave the house".to_owned(),
            backstory: "A child who vanished from the house in 1911".to_owned(),
            hints: vec!["COLD".to_owned(), "DARK".to_owned(), "MUSIC".to_owned()],
            ritual: None,
            key_memories: Some(vec![
                "The music box".to_owned(),
                "The red door".to_owned(),
            ]),
        },
        secondary_ghost: GhostDefinition {
            name: "Malkanar".to_owned(),
            personality: "Ominous and patient".to_owned(),
            goals: "Keep Akar bound to the house".to_owned(),
            backstory: "A demon summoned by the previous owner".to_owned(),
            hints: vec!["MINE".to_owned(), "STAY".to_owned()],
            ritual: Some(banishment.clone()),
            key_memories: None,
        },
        shared_lore: "The house burned down in 1912 and was rebuilt.".to_owned(),
        final_goal: FinalGoalDefinition {
            description: "Banish Malkanar so Akar can leave.".to_owned(),
            ritual: Some(banishment),
        },
    }
}
