//! System prompt augmentation with the list of available skills

use super::SkillRegistry;

/// Heading of the skills block appended to the system message
pub const SKILLS_HEADER: &str = "## Available Skills";

/// Sentence closing the skills block
pub const SKILLS_INSTRUCTION: &str = "Use the load_skill tool when you need detailed information \
     about handling a specific type of request.";

/// Render one `- **name**: description` bullet per skill, newline separated.
pub fn format_skill_list(registry: &SkillRegistry) -> String {
    registry
        .describe_all()
        .into_iter()
        .map(|(name, description)| format!("- **{}**: {}", name, description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The block appended to a base system message, including its leading
/// separator. Empty when the registry is empty.
pub fn skills_addendum(registry: &SkillRegistry) -> String {
    if registry.is_empty() {
        return String::new();
    }

    format!(
        "\n\n{}\n\n{}\n\n{}",
        SKILLS_HEADER,
        format_skill_list(registry),
        SKILLS_INSTRUCTION
    )
}

/// Append the skills block to `base`.
///
/// `base` must be the original system message, never one that was already
/// augmented: the block is appended unconditionally.
pub fn augment(base: &str, registry: &SkillRegistry) -> String {
    let mut augmented = String::from(base);
    augmented.push_str(&skills_addendum(registry));
    augmented
}
