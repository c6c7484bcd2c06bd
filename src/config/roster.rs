/// Reference character roster
///
/// Players can pick a main character and a skin for their profile; the
/// roster itself is static data inserted by the `seed` command. Icon names
/// map to asset files served by the frontend.
#[derive(Debug, Clone)]
pub struct CharacterConfig {
    pub name: &'static str,
    pub icon_name: &'static str,
}

impl CharacterConfig {
    pub fn new(name: &'static str, icon_name: &'static str) -> Self {
        Self { name, icon_name }
    }
}

/// Get the list of playable characters to seed
pub fn get_roster() -> Vec<CharacterConfig> {
    vec![
        CharacterConfig::new("Akira", "akira"),
        CharacterConfig::new("Blaze", "blaze"),
        CharacterConfig::new("Cinder", "cinder"),
        CharacterConfig::new("Dune", "dune"),
        CharacterConfig::new("Echo", "echo"),
        CharacterConfig::new("Frost", "frost"),
        CharacterConfig::new("Gale", "gale"),
        CharacterConfig::new("Havoc", "havoc"),
        CharacterConfig::new("Iris", "iris"),
        CharacterConfig::new("Jolt", "jolt"),
        CharacterConfig::new("Kuro", "kuro"),
        CharacterConfig::new("Luna", "luna"),
    ]
}
